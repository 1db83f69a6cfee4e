//! Manifest orchestrator
//!
//! Owns the contract between the document and the section sub-parsers: locate
//! the `Bundle` root, read the `Log` and `Chain` scalar settings inline, then
//! drive the eleven section parsers in a fixed order. Later sections resolve
//! references against collections populated by earlier ones (extensions
//! against UX payloads, searches against extensions, payloads against
//! containers, packages against payloads, registration refines the cache), so
//! the sequence below is a contract, not an optimization. The first error
//! aborts the remainder and propagates unchanged.

use crate::sections::{
    approved_exes, condition, containers, extensions, packages, payloads, registration,
    searches, update, user_experience, variables,
};
use crate::state::EngineState;
use crate::xml::{Document, Element, XmlError};
use crate::{BundleError, Result};
use std::path::Path;
use tracing::debug;

const ROOT_ELEMENT: &str = "Bundle";

/// Load a bundle manifest from a file on disk into `state`.
///
/// On failure `state` is partially populated and must be discarded.
pub fn load_from_file(path: &Path, state: &mut EngineState) -> Result<()> {
    debug!(path = %path.display(), "loading bundle manifest from file");
    let document = Document::from_file(path).map_err(document_load)?;
    parse_document(&document, state)
}

/// Load a bundle manifest from an in-memory buffer into `state`.
///
/// Used when the manifest is embedded in the bundle executable rather than
/// standalone. Same semantics as [`load_from_file`].
pub fn load_from_buffer(buffer: &[u8], state: &mut EngineState) -> Result<()> {
    debug!(len = buffer.len(), "loading bundle manifest from buffer");
    let document = Document::from_bytes(buffer).map_err(document_load)?;
    parse_document(&document, state)
}

fn document_load(e: XmlError) -> BundleError {
    BundleError::DocumentLoad(e.to_string())
}

fn parse_document(document: &Document, state: &mut EngineState) -> Result<()> {
    parse_with(document, state, &mut DefaultSections)
}

fn parse_with<S: Sections>(
    document: &Document,
    state: &mut EngineState,
    sections: &mut S,
) -> Result<()> {
    let root = document.root();
    if root.name() != ROOT_ELEMENT {
        return Err(BundleError::MissingRootElement);
    }

    parse_log_settings(root, state)?;
    parse_chain_settings(root, state)?;

    // Fixed section order; see the module comment.
    sections.condition(root, state)?;
    sections.variables(root, state)?;
    sections.user_experience(root, state)?;
    sections.extensions(root, state)?;
    sections.searches(root, state)?;
    sections.registration(root, state)?;
    sections.update(root, state)?;
    sections.containers(root, state)?;
    sections.payloads(root, state)?;
    sections.packages(root, state)?;
    sections.approved_exes(root, state)?;

    debug!(
        variables = state.variables.len(),
        payloads = state.payloads.len(),
        packages = state.packages.len(),
        "bundle manifest loaded"
    );
    Ok(())
}

/// Read the optional `Log` element's scalar attributes.
///
/// `PathVariable` is optional even when the element is present; `Prefix` and
/// `Extension` are required once it is.
fn parse_log_settings(root: &Element, state: &mut EngineState) -> Result<()> {
    let Some(log) = root.optional_child("Log") else {
        return Ok(());
    };

    state.log.path_variable = log.attr("PathVariable").map(str::to_string);
    state.log.prefix = log
        .require_attr("Prefix")
        .map_err(invalid_log)?
        .to_string();
    state.log.extension = log
        .require_attr("Extension")
        .map_err(invalid_log)?
        .to_string();
    Ok(())
}

fn invalid_log(e: XmlError) -> BundleError {
    BundleError::InvalidLogSettings(e.to_string())
}

/// Read the optional `Chain` element's boolean attributes.
///
/// Each flag keeps its caller-supplied default when its attribute is absent;
/// only a present-but-malformed token is fatal.
fn parse_chain_settings(root: &Element, state: &mut EngineState) -> Result<()> {
    let Some(chain) = root.optional_child("Chain") else {
        return Ok(());
    };

    if let Some(value) = chain.yes_no_attr("DisableRollback").map_err(invalid_chain)? {
        state.disable_rollback = value;
    }
    if let Some(value) = chain
        .yes_no_attr("DisableSystemRestore")
        .map_err(invalid_chain)?
    {
        state.disable_system_restore = value;
    }
    if let Some(value) = chain.yes_no_attr("ParallelCache").map_err(invalid_chain)? {
        state.parallel_cache_and_execute = value;
    }
    Ok(())
}

fn invalid_chain(e: XmlError) -> BundleError {
    BundleError::InvalidChainSettings(e.to_string())
}

/// Seam between the orchestrator and the section sub-parsers.
///
/// The real implementation delegates to the `sections` modules; tests swap in
/// a recording double to pin the invocation order and the short-circuit
/// behavior.
trait Sections {
    fn condition(&mut self, root: &Element, state: &mut EngineState) -> Result<()>;
    fn variables(&mut self, root: &Element, state: &mut EngineState) -> Result<()>;
    fn user_experience(&mut self, root: &Element, state: &mut EngineState) -> Result<()>;
    fn extensions(&mut self, root: &Element, state: &mut EngineState) -> Result<()>;
    fn searches(&mut self, root: &Element, state: &mut EngineState) -> Result<()>;
    fn registration(&mut self, root: &Element, state: &mut EngineState) -> Result<()>;
    fn update(&mut self, root: &Element, state: &mut EngineState) -> Result<()>;
    fn containers(&mut self, root: &Element, state: &mut EngineState) -> Result<()>;
    fn payloads(&mut self, root: &Element, state: &mut EngineState) -> Result<()>;
    fn packages(&mut self, root: &Element, state: &mut EngineState) -> Result<()>;
    fn approved_exes(&mut self, root: &Element, state: &mut EngineState) -> Result<()>;
}

struct DefaultSections;

impl Sections for DefaultSections {
    fn condition(&mut self, root: &Element, state: &mut EngineState) -> Result<()> {
        state.condition = condition::parse(root)?;
        Ok(())
    }

    fn variables(&mut self, root: &Element, state: &mut EngineState) -> Result<()> {
        state.variables = variables::parse(root)?;
        Ok(())
    }

    fn user_experience(&mut self, root: &Element, state: &mut EngineState) -> Result<()> {
        state.user_experience = user_experience::parse(root)?;
        Ok(())
    }

    fn extensions(&mut self, root: &Element, state: &mut EngineState) -> Result<()> {
        state.extensions = extensions::parse(root, &state.user_experience.payloads)?;
        Ok(())
    }

    fn searches(&mut self, root: &Element, state: &mut EngineState) -> Result<()> {
        state.searches = searches::parse(root, &state.extensions)?;
        Ok(())
    }

    fn registration(&mut self, root: &Element, state: &mut EngineState) -> Result<()> {
        state.registration = registration::parse(root, &mut state.cache)?;
        Ok(())
    }

    fn update(&mut self, root: &Element, state: &mut EngineState) -> Result<()> {
        state.update = update::parse(root)?;
        Ok(())
    }

    fn containers(&mut self, root: &Element, state: &mut EngineState) -> Result<()> {
        state.containers = containers::parse(root)?;
        Ok(())
    }

    fn payloads(&mut self, root: &Element, state: &mut EngineState) -> Result<()> {
        let (payloads, layout_payloads) = payloads::parse(root, &state.containers)?;
        state.payloads = payloads;
        state.layout_payloads = layout_payloads;
        Ok(())
    }

    fn packages(&mut self, root: &Element, state: &mut EngineState) -> Result<()> {
        state.packages = packages::parse(root, &state.payloads)?;
        Ok(())
    }

    fn approved_exes(&mut self, root: &Element, state: &mut EngineState) -> Result<()> {
        state.approved_exes = approved_exes::parse(root)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test double that records which sections run, optionally failing one.
    #[derive(Default)]
    struct RecordingSections {
        calls: Vec<&'static str>,
        fail_at: Option<&'static str>,
    }

    impl RecordingSections {
        fn visit(&mut self, name: &'static str) -> Result<()> {
            self.calls.push(name);
            if self.fail_at == Some(name) {
                Err(BundleError::Packages("injected failure".to_string()))
            } else {
                Ok(())
            }
        }
    }

    macro_rules! record {
        ($($method:ident),* $(,)?) => {
            $(
                fn $method(&mut self, _root: &Element, _state: &mut EngineState) -> Result<()> {
                    self.visit(stringify!($method))
                }
            )*
        };
    }

    impl Sections for RecordingSections {
        record!(
            condition,
            variables,
            user_experience,
            extensions,
            searches,
            registration,
            update,
            containers,
            payloads,
            packages,
            approved_exes,
        );
    }

    fn parse_str(xml: &str, state: &mut EngineState) -> Result<()> {
        let document = Document::parse(xml).map_err(document_load)?;
        parse_document(&document, state)
    }

    #[test]
    fn test_sections_run_in_fixed_order() {
        let document = Document::parse("<Bundle />").unwrap();
        let mut state = EngineState::default();
        let mut sections = RecordingSections::default();

        parse_with(&document, &mut state, &mut sections).unwrap();

        assert_eq!(
            sections.calls,
            vec![
                "condition",
                "variables",
                "user_experience",
                "extensions",
                "searches",
                "registration",
                "update",
                "containers",
                "payloads",
                "packages",
                "approved_exes",
            ]
        );
    }

    #[test]
    fn test_first_failure_short_circuits() {
        let document = Document::parse("<Bundle />").unwrap();
        let mut state = EngineState::default();
        let mut sections = RecordingSections {
            fail_at: Some("packages"),
            ..Default::default()
        };

        let err = parse_with(&document, &mut state, &mut sections).unwrap_err();
        assert!(matches!(err, BundleError::Packages(_)));

        assert_eq!(sections.calls.last(), Some(&"packages"));
        assert!(!sections.calls.contains(&"approved_exes"));
    }

    #[test]
    fn test_wrong_root_element_runs_no_sections() {
        let document = Document::parse("<NotBundle />").unwrap();
        let mut state = EngineState::default();
        let mut sections = RecordingSections::default();

        let err = parse_with(&document, &mut state, &mut sections).unwrap_err();
        assert!(matches!(err, BundleError::MissingRootElement));
        assert!(sections.calls.is_empty());
    }

    #[test]
    fn test_no_log_element_keeps_defaults() {
        let mut state = EngineState::default();
        parse_str("<Bundle />", &mut state).unwrap();

        assert!(state.log.path_variable.is_none());
        assert!(state.log.prefix.is_empty());
        assert!(state.log.extension.is_empty());
    }

    #[test]
    fn test_log_path_variable_is_optional() {
        let mut state = EngineState::default();
        parse_str(
            r#"<Bundle><Log Prefix="AppSetup" Extension="log" /></Bundle>"#,
            &mut state,
        )
        .unwrap();

        assert!(state.log.path_variable.is_none());
        assert_eq!(state.log.prefix, "AppSetup");
        assert_eq!(state.log.extension, "log");
    }

    #[test]
    fn test_log_path_variable_is_read_when_present() {
        let mut state = EngineState::default();
        parse_str(
            r#"<Bundle><Log PathVariable="WixBundleLog" Prefix="AppSetup" Extension="log" /></Bundle>"#,
            &mut state,
        )
        .unwrap();

        assert_eq!(state.log.path_variable.as_deref(), Some("WixBundleLog"));
    }

    #[test]
    fn test_log_missing_prefix_is_fatal() {
        let mut state = EngineState::default();
        let err = parse_str(r#"<Bundle><Log Extension="log" /></Bundle>"#, &mut state)
            .unwrap_err();
        assert!(matches!(err, BundleError::InvalidLogSettings(_)));
    }

    #[test]
    fn test_log_missing_extension_is_fatal() {
        let mut state = EngineState::default();
        let err = parse_str(r#"<Bundle><Log Prefix="AppSetup" /></Bundle>"#, &mut state)
            .unwrap_err();
        assert!(matches!(err, BundleError::InvalidLogSettings(_)));
    }

    #[test]
    fn test_no_chain_element_keeps_caller_defaults() {
        let mut state = EngineState {
            disable_rollback: true,
            ..Default::default()
        };
        parse_str("<Bundle />", &mut state).unwrap();
        assert!(state.disable_rollback);
    }

    #[test]
    fn test_chain_flags_absent_keep_defaults() {
        let mut state = EngineState::default();
        parse_str(r#"<Bundle><Chain DisableRollback="yes" /></Bundle>"#, &mut state).unwrap();

        assert!(state.disable_rollback);
        assert!(!state.disable_system_restore);
        assert!(!state.parallel_cache_and_execute);
    }

    #[test]
    fn test_chain_malformed_token_is_fatal() {
        let mut state = EngineState::default();
        let err = parse_str(
            r#"<Bundle><Chain DisableRollback="maybe" /></Bundle>"#,
            &mut state,
        )
        .unwrap_err();
        assert!(matches!(err, BundleError::InvalidChainSettings(_)));
    }

    #[test]
    fn test_all_chain_flags_parse() {
        let mut state = EngineState::default();
        parse_str(
            r#"<Bundle><Chain DisableRollback="yes" DisableSystemRestore="yes" ParallelCache="yes" /></Bundle>"#,
            &mut state,
        )
        .unwrap();

        assert!(state.disable_rollback);
        assert!(state.disable_system_restore);
        assert!(state.parallel_cache_and_execute);
    }

    #[test]
    fn test_section_failure_skips_later_sections() {
        // Packages fail on an unknown payload ref; approved exes stay empty
        // even though the manifest declares one.
        let mut state = EngineState::default();
        let err = parse_str(
            r#"<Bundle>
                <Chain>
                    <MsiPackage Id="app"><PayloadRef Id="missing.msi" /></MsiPackage>
                </Chain>
                <ApprovedExeForElevation Id="ax0" Key="SOFTWARE\Vendor\App" />
            </Bundle>"#,
            &mut state,
        )
        .unwrap_err();

        assert!(matches!(err, BundleError::Packages(_)));
        assert!(state.approved_exes.is_empty());
    }

    #[test]
    fn test_document_load_error_from_buffer() {
        let mut state = EngineState::default();
        let err = load_from_buffer(b"<Bundle", &mut state).unwrap_err();
        assert!(matches!(err, BundleError::DocumentLoad(_)));
    }
}
