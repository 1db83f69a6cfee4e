//! Bootstrapper user experience parsing
//!
//! The `UX` element carries the payloads of the bootstrapper application
//! itself. Its payload set is also the resolution scope for bundle extension
//! entry payloads, so it must be parsed before the extensions section.

use crate::xml::Element;
use crate::{BundleError, Result};
use serde::{Deserialize, Serialize};

/// A payload belonging to the bootstrapper application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UxPayload {
    /// Payload id, unique within the UX payload set
    pub id: String,

    /// Path of the payload relative to the UX working directory
    pub file_path: String,

    /// Path of the payload inside the attached container
    pub source_path: String,
}

/// Bootstrapper user experience descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserExperience {
    /// All UX payloads in manifest order
    pub payloads: Vec<UxPayload>,

    /// Id of the payload that is the bootstrapper application entry point
    pub primary_payload_id: Option<String>,
}

/// Parse the optional `UX` element and its `Payload` children.
///
/// When present, the element must carry at least one payload. The primary
/// payload defaults to the first one unless `@PrimaryPayloadId` selects
/// another member of the set.
pub fn parse(root: &Element) -> Result<UserExperience> {
    let Some(ux) = root.optional_child("UX") else {
        return Ok(UserExperience::default());
    };

    let mut payloads: Vec<UxPayload> = Vec::new();
    for element in ux.children_named("Payload") {
        let id = element.require_attr("Id").map_err(err)?.to_string();
        if payloads.iter().any(|p| p.id == id) {
            return Err(err(format!("duplicate UX payload id {:?}", id)));
        }

        payloads.push(UxPayload {
            id,
            file_path: element.require_attr("FilePath").map_err(err)?.to_string(),
            source_path: element.require_attr("SourcePath").map_err(err)?.to_string(),
        });
    }

    if payloads.is_empty() {
        return Err(err("UX element has no payloads"));
    }

    let primary_payload_id = match ux.attr("PrimaryPayloadId") {
        Some(id) => {
            if !payloads.iter().any(|p| p.id == id) {
                return Err(err(format!(
                    "primary payload {:?} is not a UX payload",
                    id
                )));
            }
            Some(id.to_string())
        }
        None => payloads.first().map(|p| p.id.clone()),
    };

    Ok(UserExperience {
        payloads,
        primary_payload_id,
    })
}

fn err(e: impl std::fmt::Display) -> BundleError {
    BundleError::UserExperience(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Document;

    #[test]
    fn test_absent_ux_is_default() {
        let doc = Document::parse("<Bundle />").unwrap();
        let ux = parse(doc.root()).unwrap();
        assert!(ux.payloads.is_empty());
        assert!(ux.primary_payload_id.is_none());
    }

    #[test]
    fn test_first_payload_is_primary_by_default() {
        let doc = Document::parse(
            r#"<Bundle>
                <UX>
                    <Payload Id="ba.dll" FilePath="ba.dll" SourcePath="u0" />
                    <Payload Id="ba.config" FilePath="ba.dll.config" SourcePath="u1" />
                </UX>
            </Bundle>"#,
        )
        .unwrap();

        let ux = parse(doc.root()).unwrap();
        assert_eq!(ux.payloads.len(), 2);
        assert_eq!(ux.primary_payload_id.as_deref(), Some("ba.dll"));
    }

    #[test]
    fn test_explicit_primary_payload() {
        let doc = Document::parse(
            r#"<Bundle>
                <UX PrimaryPayloadId="mba.exe">
                    <Payload Id="host.dll" FilePath="host.dll" SourcePath="u0" />
                    <Payload Id="mba.exe" FilePath="mba.exe" SourcePath="u1" />
                </UX>
            </Bundle>"#,
        )
        .unwrap();

        let ux = parse(doc.root()).unwrap();
        assert_eq!(ux.primary_payload_id.as_deref(), Some("mba.exe"));
    }

    #[test]
    fn test_primary_payload_must_exist() {
        let doc = Document::parse(
            r#"<Bundle>
                <UX PrimaryPayloadId="missing">
                    <Payload Id="ba.dll" FilePath="ba.dll" SourcePath="u0" />
                </UX>
            </Bundle>"#,
        )
        .unwrap();
        assert!(matches!(
            parse(doc.root()),
            Err(BundleError::UserExperience(_))
        ));
    }

    #[test]
    fn test_empty_ux_fails() {
        let doc = Document::parse("<Bundle><UX></UX></Bundle>").unwrap();
        assert!(matches!(
            parse(doc.root()),
            Err(BundleError::UserExperience(_))
        ));
    }

    #[test]
    fn test_payload_missing_source_path_fails() {
        let doc = Document::parse(
            r#"<Bundle><UX><Payload Id="ba.dll" FilePath="ba.dll" /></UX></Bundle>"#,
        )
        .unwrap();
        assert!(matches!(
            parse(doc.root()),
            Err(BundleError::UserExperience(_))
        ));
    }
}
