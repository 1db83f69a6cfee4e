//! Burnish - Bundle Manifest Decoder
//!
//! Burnish turns an installer bundle's manifest, a single XML document
//! describing its chain of packages, payloads, conditions, and settings, into
//! the in-memory [`state::EngineState`] that later installation-execution
//! phases run against. Every top-level section is optional by design; absence
//! means defaults, and only malformed content is fatal.
//!
//! # Architecture
//!
//! - **xml**: Document acquisition and node/attribute access primitives
//! - **state**: The engine state aggregate populated from the manifest
//! - **sections**: One sub-parser per manifest section (variables, payloads, ...)
//! - **manifest**: The orchestrator driving the sections in their fixed order
//! - **error**: The terminal error taxonomy for a load attempt
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;
pub mod manifest;
pub mod sections;
pub mod state;
pub mod xml;

pub use error::{BundleError, Result};
