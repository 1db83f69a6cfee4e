//! Error types for Burnish
//!
//! One terminal error per manifest load attempt: the first failing step wins
//! and the variant identifies where parsing stopped. Absence of an optional
//! element or attribute is never represented here.
//! Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Result type alias for Burnish operations
pub type Result<T> = std::result::Result<T, BundleError>;

/// Terminal error for a bundle manifest load
#[derive(Error, Debug)]
pub enum BundleError {
    /// The manifest file or buffer could not be parsed as an XML document
    #[error("Failed to load manifest as XML document: {0}")]
    DocumentLoad(String),

    /// The document parsed but its root element is not `Bundle`
    #[error("Manifest root element is not Bundle")]
    MissingRootElement,

    /// Log element settings are malformed
    #[error("Invalid Log settings: {0}")]
    InvalidLogSettings(String),

    /// Chain element settings are malformed
    #[error("Invalid Chain settings: {0}")]
    InvalidChainSettings(String),

    /// Global condition section failed to parse
    #[error("Failed to parse global condition: {0}")]
    Condition(String),

    /// Variables section failed to parse
    #[error("Failed to parse variables: {0}")]
    Variables(String),

    /// User experience section failed to parse
    #[error("Failed to parse user experience: {0}")]
    UserExperience(String),

    /// Extensions section failed to parse
    #[error("Failed to parse extensions: {0}")]
    Extensions(String),

    /// Searches section failed to parse
    #[error("Failed to parse searches: {0}")]
    Searches(String),

    /// Registration section failed to parse
    #[error("Failed to parse registration: {0}")]
    Registration(String),

    /// Update section failed to parse
    #[error("Failed to parse update feed: {0}")]
    Update(String),

    /// Containers section failed to parse
    #[error("Failed to parse containers: {0}")]
    Containers(String),

    /// Payloads section failed to parse
    #[error("Failed to parse payloads: {0}")]
    Payloads(String),

    /// Packages section failed to parse
    #[error("Failed to parse packages: {0}")]
    Packages(String),

    /// Approved exes section failed to parse
    #[error("Failed to parse approved exes: {0}")]
    ApprovedExes(String),
}
