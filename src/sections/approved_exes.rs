//! Approved executables for elevation

use crate::xml::Element;
use crate::{BundleError, Result};
use serde::{Deserialize, Serialize};

/// An executable the elevated engine may launch on behalf of the UX
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovedExe {
    /// Approval id, unique within the bundle
    pub id: String,

    /// Registry key holding the approved executable path
    pub key: String,

    /// Registry value name; default value when absent
    pub value_name: Option<String>,
}

/// Parse all `ApprovedExeForElevation` elements under the bundle root.
pub fn parse(root: &Element) -> Result<Vec<ApprovedExe>> {
    let mut approved_exes: Vec<ApprovedExe> = Vec::new();

    for element in root.children_named("ApprovedExeForElevation") {
        let id = element.require_attr("Id").map_err(err)?.to_string();
        if approved_exes.iter().any(|a| a.id == id) {
            return Err(err(format!("duplicate approved exe id {:?}", id)));
        }

        approved_exes.push(ApprovedExe {
            id,
            key: element.require_attr("Key").map_err(err)?.to_string(),
            value_name: element.attr("ValueName").map(str::to_string),
        });
    }

    Ok(approved_exes)
}

fn err(e: impl std::fmt::Display) -> BundleError {
    BundleError::ApprovedExes(e.to_string())
}
