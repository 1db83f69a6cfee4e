//! Engine state populated from the bundle manifest
//!
//! One mutable aggregate owned by the caller. The manifest orchestrator and
//! the section parsers only mutate fields in place; the aggregate itself is
//! never replaced, and it outlives the load call so later engine phases can
//! consume it.

use crate::sections::{
    ApprovedExe, BundleExtension, Container, Package, Payload, Registration, Search,
    UpdateSource, UserExperience, Variable,
};
use serde::{Deserialize, Serialize};

/// Log customization read from the optional `Log` element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Variable that receives the resolved log path, when requested
    pub path_variable: Option<String>,

    /// Log file name prefix
    pub prefix: String,

    /// Log file extension
    pub extension: String,
}

/// Package cache configuration, refined by the registration section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether the cache lives in the per-machine location
    pub per_machine: bool,

    /// Cache directory name derived from the bundle registration id
    pub bundle_cache_dir: Option<String>,
}

/// The in-memory configuration the installation engine executes against
///
/// Created once per bundle-load attempt. On a failed load the state is
/// partially populated and must be discarded by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    /// Log settings from the optional `Log` element
    pub log: LogSettings,

    /// Rollback disabled for the whole chain (`Chain/@DisableRollback`)
    pub disable_rollback: bool,

    /// System restore point suppressed (`Chain/@DisableSystemRestore`)
    pub disable_system_restore: bool,

    /// Cache and execute phases may overlap (`Chain/@ParallelCache`)
    pub parallel_cache_and_execute: bool,

    /// Global install condition, when the manifest declares one
    pub condition: Option<String>,

    /// Variable table seeded from the manifest
    pub variables: Vec<Variable>,

    /// Bootstrapper user experience descriptor
    pub user_experience: UserExperience,

    /// Bundle extensions
    pub extensions: Vec<BundleExtension>,

    /// Searches evaluated during detection
    pub searches: Vec<Search>,

    /// Bundle registration, when the manifest declares one
    pub registration: Option<Registration>,

    /// Package cache configuration
    pub cache: CacheConfig,

    /// Update feed location, when the manifest declares one
    pub update: Option<UpdateSource>,

    /// Containers holding embedded payloads
    pub containers: Vec<Container>,

    /// All payloads in the bundle
    pub payloads: Vec<Payload>,

    /// Ids of payloads that participate in layout
    pub layout_payloads: Vec<String>,

    /// Chained packages in execution order
    pub packages: Vec<Package>,

    /// Executables approved to run elevated
    pub approved_exes: Vec<ApprovedExe>,
}
