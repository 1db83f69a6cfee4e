//! Bundle manifest loading
//!
//! Decodes the single XML document describing an installer bundle into the
//! engine state consumed by later execution phases. Loading is all-or-nothing
//! from the caller's perspective: the first failing step produces the one
//! terminal error, and a partially populated state must be discarded.
//!
//! # Example Manifest
//!
//! ```xml
//! <Bundle>
//!   <Log Prefix="AppSetup" Extension="log" />
//!   <Chain DisableRollback="no">
//!     <MsiPackage Id="app"><PayloadRef Id="app.msi" /></MsiPackage>
//!   </Chain>
//!   <Registration Id="{...}" Tag="app" ProviderKey="App" Version="1.0"
//!                 ExecutableName="setup.exe" />
//!   <Payload Id="app.msi" FilePath="app.msi" SourcePath="a0" />
//! </Bundle>
//! ```

mod loader;

pub use loader::{load_from_buffer, load_from_file};
