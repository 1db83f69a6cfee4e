//! Section sub-parsers for the bundle manifest
//!
//! Each module owns one top-level slice of engine state and parses it from
//! the `Bundle` root element. Every section is optional at this level; a
//! parser returns its slice fully populated or fails with its own section
//! error, which the orchestrator treats as fatal. Three of the parsers read
//! collections populated by earlier sections, which is why the orchestrator
//! invokes them in a fixed order.

pub mod approved_exes;
pub mod condition;
pub mod containers;
pub mod extensions;
pub mod packages;
pub mod payloads;
pub mod registration;
pub mod searches;
pub mod update;
pub mod user_experience;
pub mod variables;

pub use approved_exes::ApprovedExe;
pub use containers::Container;
pub use extensions::BundleExtension;
pub use packages::{Package, PackageKind};
pub use payloads::{Packaging, Payload};
pub use registration::{ArpEntry, Registration};
pub use searches::{Search, SearchKind};
pub use update::UpdateSource;
pub use user_experience::{UserExperience, UxPayload};
pub use variables::{Variable, VariableType};
