//! Search parsing
//!
//! Searches probe the machine during detection and store their result in a
//! variable. Extension searches delegate to a bundle extension, so the
//! extensions section must already be populated.

use crate::sections::BundleExtension;
use crate::xml::Element;
use crate::{BundleError, Result};
use serde::{Deserialize, Serialize};

/// What a search probes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchKind {
    /// Existence/metadata of a file at a path
    File { path: String },

    /// A registry value
    Registry {
        root: String,
        key: String,
        value_name: Option<String>,
    },

    /// A search handled by a bundle extension
    Extension { extension_id: String },
}

/// One search evaluated during detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Search {
    /// Search id, unique within the bundle
    pub id: String,

    /// Variable that receives the search result
    pub variable: String,

    /// Condition gating whether the search runs
    pub condition: Option<String>,

    pub kind: SearchKind,
}

/// Parse all search elements under the bundle root.
pub fn parse(root: &Element, extensions: &[BundleExtension]) -> Result<Vec<Search>> {
    let mut searches: Vec<Search> = Vec::new();

    for element in root.children() {
        let kind = match element.name() {
            "FileSearch" => SearchKind::File {
                path: element.require_attr("Path").map_err(err)?.to_string(),
            },
            "RegistrySearch" => SearchKind::Registry {
                root: element.require_attr("Root").map_err(err)?.to_string(),
                key: element.require_attr("Key").map_err(err)?.to_string(),
                value_name: element.attr("ValueName").map(str::to_string),
            },
            "ExtensionSearch" => {
                let extension_id = element
                    .require_attr("ExtensionId")
                    .map_err(err)?
                    .to_string();
                if !extensions.iter().any(|x| x.id == extension_id) {
                    return Err(err(format!(
                        "extension search references unknown extension {:?}",
                        extension_id
                    )));
                }
                SearchKind::Extension { extension_id }
            }
            _ => continue,
        };

        let id = element.require_attr("Id").map_err(err)?.to_string();
        if searches.iter().any(|s| s.id == id) {
            return Err(err(format!("duplicate search id {:?}", id)));
        }

        searches.push(Search {
            id,
            variable: element.require_attr("Variable").map_err(err)?.to_string(),
            condition: element.attr("Condition").map(str::to_string),
            kind,
        });
    }

    Ok(searches)
}

fn err(e: impl std::fmt::Display) -> BundleError {
    BundleError::Searches(e.to_string())
}
