//! Chained package parsing
//!
//! Packages are the children of the `Chain` element, in execution order.
//! Their payload references resolve against the payload list, so the payloads
//! section must already be populated.

use crate::sections::Payload;
use crate::xml::Element;
use crate::{BundleError, Result};
use serde::{Deserialize, Serialize};

/// Installer technology of a chained package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    Msi,
    Msp,
    Msu,
    Exe,
}

/// One package in the install chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Package id, unique within the bundle
    pub id: String,

    pub kind: PackageKind,

    /// Whether the package is cached for repair
    pub cache: bool,

    /// Cache directory name; defaults to the package id
    pub cache_id: Option<String>,

    /// Estimated installed size in bytes
    pub install_size: u64,

    pub per_machine: bool,

    /// Permanent packages are never uninstalled by the bundle
    pub permanent: bool,

    /// A vital package failure fails the whole chain
    pub vital: bool,

    /// Variable that receives the package log path
    pub log_path_variable: Option<String>,

    /// Condition gating whether the package installs
    pub install_condition: Option<String>,

    /// Ids of the payloads this package needs, first one is the package itself
    pub payload_refs: Vec<String>,
}

/// Parse the packages of the optional `Chain` element.
pub fn parse(root: &Element, payloads: &[Payload]) -> Result<Vec<Package>> {
    let Some(chain) = root.optional_child("Chain") else {
        return Ok(Vec::new());
    };

    let mut packages: Vec<Package> = Vec::new();

    for element in chain.children() {
        let kind = match element.name() {
            "MsiPackage" => PackageKind::Msi,
            "MspPackage" => PackageKind::Msp,
            "MsuPackage" => PackageKind::Msu,
            "ExePackage" => PackageKind::Exe,
            _ => continue,
        };

        let id = element.require_attr("Id").map_err(err)?.to_string();
        if packages.iter().any(|p| p.id == id) {
            return Err(err(format!("duplicate package id {:?}", id)));
        }

        let mut payload_refs: Vec<String> = Vec::new();
        for payload_ref in element.children_named("PayloadRef") {
            let payload_id = payload_ref.require_attr("Id").map_err(err)?.to_string();
            if !payloads.iter().any(|p| p.id == payload_id) {
                return Err(err(format!(
                    "package {:?} references unknown payload {:?}",
                    id, payload_id
                )));
            }
            payload_refs.push(payload_id);
        }

        packages.push(Package {
            id,
            kind,
            cache: element.yes_no_attr("Cache").map_err(err)?.unwrap_or(true),
            cache_id: element.attr("CacheId").map(str::to_string),
            install_size: element.u64_attr("InstallSize").map_err(err)?.unwrap_or(0),
            per_machine: element
                .yes_no_attr("PerMachine")
                .map_err(err)?
                .unwrap_or(false),
            permanent: element
                .yes_no_attr("Permanent")
                .map_err(err)?
                .unwrap_or(false),
            vital: element.yes_no_attr("Vital").map_err(err)?.unwrap_or(true),
            log_path_variable: element.attr("LogPathVariable").map(str::to_string),
            install_condition: element.attr("InstallCondition").map(str::to_string),
            payload_refs,
        });
    }

    Ok(packages)
}

fn err(e: impl std::fmt::Display) -> BundleError {
    BundleError::Packages(e.to_string())
}
