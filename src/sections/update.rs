//! Update feed parsing

use crate::xml::Element;
use crate::{BundleError, Result};
use serde::{Deserialize, Serialize};

/// Where the engine checks for a newer bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSource {
    /// Feed or download location
    pub location: String,
}

/// Parse the optional `Update` element.
pub fn parse(root: &Element) -> Result<Option<UpdateSource>> {
    let Some(element) = root.optional_child("Update") else {
        return Ok(None);
    };

    Ok(Some(UpdateSource {
        location: element
            .require_attr("Location")
            .map_err(|e| BundleError::Update(e.to_string()))?
            .to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Document;

    #[test]
    fn test_absent_update_is_none() {
        let doc = Document::parse("<Bundle />").unwrap();
        assert_eq!(parse(doc.root()).unwrap(), None);
    }

    #[test]
    fn test_update_location() {
        let doc = Document::parse(
            r#"<Bundle><Update Location="https://example.com/feed" /></Bundle>"#,
        )
        .unwrap();
        assert_eq!(
            parse(doc.root()).unwrap().unwrap().location,
            "https://example.com/feed"
        );
    }

    #[test]
    fn test_update_without_location_fails() {
        let doc = Document::parse("<Bundle><Update /></Bundle>").unwrap();
        assert!(matches!(parse(doc.root()), Err(BundleError::Update(_))));
    }
}
