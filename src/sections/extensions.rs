//! Bundle extension parsing

use crate::sections::UxPayload;
use crate::xml::Element;
use crate::{BundleError, Result};
use serde::{Deserialize, Serialize};

/// An engine extension shipped with the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleExtension {
    /// Extension id, unique within the bundle
    pub id: String,

    /// UX payload holding the extension binary
    pub entry_payload_id: String,
}

/// Parse all `BundleExtension` elements under the bundle root.
///
/// Entry payloads live in the UX payload set, so the user experience section
/// must already be populated.
pub fn parse(root: &Element, ux_payloads: &[UxPayload]) -> Result<Vec<BundleExtension>> {
    let mut extensions: Vec<BundleExtension> = Vec::new();

    for element in root.children_named("BundleExtension") {
        let id = element.require_attr("Id").map_err(err)?.to_string();
        if extensions.iter().any(|x| x.id == id) {
            return Err(err(format!("duplicate extension id {:?}", id)));
        }

        let entry_payload_id = element
            .require_attr("EntryPayloadId")
            .map_err(err)?
            .to_string();
        if !ux_payloads.iter().any(|p| p.id == entry_payload_id) {
            return Err(err(format!(
                "extension {:?} entry payload {:?} is not a UX payload",
                id, entry_payload_id
            )));
        }

        extensions.push(BundleExtension {
            id,
            entry_payload_id,
        });
    }

    Ok(extensions)
}

fn err(e: impl std::fmt::Display) -> BundleError {
    BundleError::Extensions(e.to_string())
}
