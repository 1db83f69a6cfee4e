//! Container parsing

use crate::xml::Element;
use crate::{BundleError, Result};
use serde::{Deserialize, Serialize};

/// An archive holding embedded payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Container id, unique within the bundle
    pub id: String,

    /// Container file name on disk
    pub file_path: String,

    /// Source for detached containers
    pub download_url: Option<String>,

    /// Attached containers travel inside the bundle executable
    pub attached: bool,

    /// Position of an attached container within the bundle executable
    pub attached_index: Option<u64>,
}

/// Parse all `Container` elements under the bundle root.
pub fn parse(root: &Element) -> Result<Vec<Container>> {
    let mut containers: Vec<Container> = Vec::new();

    for element in root.children_named("Container") {
        let id = element.require_attr("Id").map_err(err)?.to_string();
        if containers.iter().any(|c| c.id == id) {
            return Err(err(format!("duplicate container id {:?}", id)));
        }

        let attached = element.yes_no_attr("Attached").map_err(err)?.unwrap_or(false);
        let attached_index = element.u64_attr("AttachedIndex").map_err(err)?;
        if attached && attached_index.is_none() {
            return Err(err(format!(
                "attached container {:?} has no attached index",
                id
            )));
        }

        containers.push(Container {
            id,
            file_path: element.require_attr("FilePath").map_err(err)?.to_string(),
            download_url: element.attr("DownloadUrl").map(str::to_string),
            attached,
            attached_index,
        });
    }

    Ok(containers)
}

fn err(e: impl std::fmt::Display) -> BundleError {
    BundleError::Containers(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Document;

    #[test]
    fn test_no_containers_is_empty() {
        let doc = Document::parse("<Bundle />").unwrap();
        assert!(parse(doc.root()).unwrap().is_empty());
    }

    #[test]
    fn test_attached_and_detached_containers() {
        let doc = Document::parse(
            r#"<Bundle>
                <Container Id="WixAttachedContainer" FilePath="bundle.cab"
                    Attached="yes" AttachedIndex="0" />
                <Container Id="Web" FilePath="web.cab"
                    DownloadUrl="https://example.com/web.cab" />
            </Bundle>"#,
        )
        .unwrap();

        let containers = parse(doc.root()).unwrap();
        assert_eq!(containers.len(), 2);

        assert!(containers[0].attached);
        assert_eq!(containers[0].attached_index, Some(0));

        assert!(!containers[1].attached);
        assert_eq!(
            containers[1].download_url.as_deref(),
            Some("https://example.com/web.cab")
        );
    }

    #[test]
    fn test_attached_without_index_fails() {
        let doc = Document::parse(
            r#"<Bundle><Container Id="c0" FilePath="b.cab" Attached="yes" /></Bundle>"#,
        )
        .unwrap();
        assert!(matches!(
            parse(doc.root()),
            Err(BundleError::Containers(_))
        ));
    }

    #[test]
    fn test_duplicate_id_fails() {
        let doc = Document::parse(
            r#"<Bundle>
                <Container Id="c0" FilePath="a.cab" />
                <Container Id="c0" FilePath="b.cab" />
            </Bundle>"#,
        )
        .unwrap();
        assert!(matches!(
            parse(doc.root()),
            Err(BundleError::Containers(_))
        ));
    }
}
