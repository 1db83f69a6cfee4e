//! Payload parsing
//!
//! Payloads are the files the engine caches and verifies. Embedded payloads
//! live inside a container parsed by the containers section, so that section
//! must already be populated. Layout-only payloads are additionally collected
//! into a separate id list consumed by layout runs.

use crate::sections::Container;
use crate::xml::Element;
use crate::{BundleError, Result};
use serde::{Deserialize, Serialize};

/// How a payload is carried by the bundle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
    /// Shipped next to the bundle or downloaded
    #[default]
    External,

    /// Carried inside a container
    Embedded,
}

/// One file the engine acquires and verifies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Payload id, unique within the bundle
    pub id: String,

    /// Destination path relative to the package working directory
    pub file_path: String,

    /// Path within the container or relative to the bundle
    pub source_path: String,

    /// Source for externally acquired payloads
    pub download_url: Option<String>,

    /// Expected size in bytes; zero when the manifest omits it
    pub file_size: u64,

    /// Expected content hash
    pub hash: Option<String>,

    pub packaging: Packaging,

    /// Container holding this payload, for embedded packaging
    pub container: Option<String>,

    /// Layout-only payloads are not installed, only laid out
    pub layout_only: bool,
}

/// Parse all `Payload` elements under the bundle root.
///
/// Returns the payload list plus the ids of layout-only payloads.
pub fn parse(root: &Element, containers: &[Container]) -> Result<(Vec<Payload>, Vec<String>)> {
    let mut payloads: Vec<Payload> = Vec::new();
    let mut layout_payloads: Vec<String> = Vec::new();

    for element in root.children_named("Payload") {
        let id = element.require_attr("Id").map_err(err)?.to_string();
        if payloads.iter().any(|p| p.id == id) {
            return Err(err(format!("duplicate payload id {:?}", id)));
        }

        let packaging = match element.attr("Packaging") {
            None => Packaging::default(),
            Some("external") => Packaging::External,
            Some("embedded") => Packaging::Embedded,
            Some(other) => {
                return Err(err(format!(
                    "unknown packaging {:?} for payload {:?}",
                    other, id
                )));
            }
        };

        let container = match element.attr("Container") {
            None => None,
            Some(container_id) => {
                if !containers.iter().any(|c| c.id == container_id) {
                    return Err(err(format!(
                        "payload {:?} references unknown container {:?}",
                        id, container_id
                    )));
                }
                Some(container_id.to_string())
            }
        };

        if packaging == Packaging::Embedded && container.is_none() {
            return Err(err(format!(
                "embedded payload {:?} has no container",
                id
            )));
        }

        let layout_only = element
            .yes_no_attr("LayoutOnly")
            .map_err(err)?
            .unwrap_or(false);
        if layout_only {
            layout_payloads.push(id.clone());
        }

        payloads.push(Payload {
            id,
            file_path: element.require_attr("FilePath").map_err(err)?.to_string(),
            source_path: element.require_attr("SourcePath").map_err(err)?.to_string(),
            download_url: element.attr("DownloadUrl").map(str::to_string),
            file_size: element.u64_attr("FileSize").map_err(err)?.unwrap_or(0),
            hash: element.attr("Hash").map(str::to_string),
            packaging,
            container,
            layout_only,
        });
    }

    Ok((payloads, layout_payloads))
}

fn err(e: impl std::fmt::Display) -> BundleError {
    BundleError::Payloads(e.to_string())
}
