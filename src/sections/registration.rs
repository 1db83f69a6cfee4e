//! Bundle registration parsing
//!
//! Registration identifies the bundle to the OS and anchors the package
//! cache: the per-machine flag and the cache directory both come from here,
//! which is why this parser also receives the cache configuration.

use crate::state::CacheConfig;
use crate::xml::Element;
use crate::{BundleError, Result};
use serde::{Deserialize, Serialize};

/// Add/Remove Programs entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArpEntry {
    /// Whether the bundle registers in ARP at all
    pub register: bool,

    pub display_name: String,
    pub display_version: String,
}

/// Bundle registration descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// Bundle id; also names the package cache directory
    pub id: String,

    /// Upgrade-family tag shared by related bundles
    pub tag: String,

    /// Dependency provider key
    pub provider_key: String,

    /// Bundle version
    pub version: String,

    /// Name of the cached bundle executable
    pub executable_name: String,

    /// Per-machine rather than per-user registration
    pub per_machine: bool,

    /// ARP entry, when the manifest declares one
    pub arp: Option<ArpEntry>,
}

/// Parse the optional `Registration` element.
///
/// When present, mirrors the per-machine flag into the cache configuration
/// and derives the bundle cache directory from the registration id.
pub fn parse(root: &Element, cache: &mut CacheConfig) -> Result<Option<Registration>> {
    let Some(element) = root.optional_child("Registration") else {
        return Ok(None);
    };

    let id = element.require_attr("Id").map_err(err)?.to_string();
    let per_machine = element
        .yes_no_attr("PerMachine")
        .map_err(err)?
        .unwrap_or(false);

    let arp = match element.optional_child("Arp") {
        None => None,
        Some(arp) => Some(ArpEntry {
            register: arp.yes_no_attr("Register").map_err(err)?.unwrap_or(true),
            display_name: arp.require_attr("DisplayName").map_err(err)?.to_string(),
            display_version: arp
                .require_attr("DisplayVersion")
                .map_err(err)?
                .to_string(),
        }),
    };

    cache.per_machine = per_machine;
    cache.bundle_cache_dir = Some(id.clone());

    Ok(Some(Registration {
        id,
        tag: element.require_attr("Tag").map_err(err)?.to_string(),
        provider_key: element.require_attr("ProviderKey").map_err(err)?.to_string(),
        version: element.require_attr("Version").map_err(err)?.to_string(),
        executable_name: element
            .require_attr("ExecutableName")
            .map_err(err)?
            .to_string(),
        per_machine,
        arp,
    }))
}

fn err(e: impl std::fmt::Display) -> BundleError {
    BundleError::Registration(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Document;

    const REGISTRATION: &str = r#"<Bundle>
        <Registration Id="{7b27c507-5dc5-4fa1-8862-b3a1a45fa461}" Tag="app"
            ProviderKey="AppBundle" Version="1.2.0.0" ExecutableName="setup.exe"
            PerMachine="yes">
            <Arp Register="yes" DisplayName="App Setup" DisplayVersion="1.2.0.0" />
        </Registration>
    </Bundle>"#;

    #[test]
    fn test_absent_registration_leaves_cache_alone() {
        let doc = Document::parse("<Bundle />").unwrap();
        let mut cache = CacheConfig::default();

        assert!(parse(doc.root(), &mut cache).unwrap().is_none());
        assert!(!cache.per_machine);
        assert!(cache.bundle_cache_dir.is_none());
    }

    #[test]
    fn test_registration_refines_cache() {
        let doc = Document::parse(REGISTRATION).unwrap();
        let mut cache = CacheConfig::default();

        let registration = parse(doc.root(), &mut cache).unwrap().unwrap();
        assert_eq!(registration.version, "1.2.0.0");
        assert!(registration.per_machine);

        let arp = registration.arp.unwrap();
        assert!(arp.register);
        assert_eq!(arp.display_name, "App Setup");

        assert!(cache.per_machine);
        assert_eq!(
            cache.bundle_cache_dir.as_deref(),
            Some("{7b27c507-5dc5-4fa1-8862-b3a1a45fa461}")
        );
    }

    #[test]
    fn test_per_machine_defaults_to_per_user() {
        let doc = Document::parse(
            r#"<Bundle>
                <Registration Id="b0" Tag="app" ProviderKey="k" Version="1.0"
                    ExecutableName="setup.exe" />
            </Bundle>"#,
        )
        .unwrap();
        let mut cache = CacheConfig::default();

        let registration = parse(doc.root(), &mut cache).unwrap().unwrap();
        assert!(!registration.per_machine);
        assert!(registration.arp.is_none());
        assert!(!cache.per_machine);
    }

    #[test]
    fn test_missing_provider_key_fails() {
        let doc = Document::parse(
            r#"<Bundle>
                <Registration Id="b0" Tag="app" Version="1.0" ExecutableName="setup.exe" />
            </Bundle>"#,
        )
        .unwrap();
        let mut cache = CacheConfig::default();
        assert!(matches!(
            parse(doc.root(), &mut cache),
            Err(BundleError::Registration(_))
        ));
    }

    #[test]
    fn test_arp_missing_display_name_fails() {
        let doc = Document::parse(
            r#"<Bundle>
                <Registration Id="b0" Tag="app" ProviderKey="k" Version="1.0"
                    ExecutableName="setup.exe">
                    <Arp DisplayVersion="1.0" />
                </Registration>
            </Bundle>"#,
        )
        .unwrap();
        let mut cache = CacheConfig::default();
        assert!(matches!(
            parse(doc.root(), &mut cache),
            Err(BundleError::Registration(_))
        ));
    }
}
