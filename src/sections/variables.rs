//! Variable table parsing

use crate::xml::Element;
use crate::{BundleError, Result};
use serde::{Deserialize, Serialize};

/// Declared type of a bundle variable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    String,
    Formatted,
    Numeric,
    Version,
}

/// One entry of the engine variable table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name, unique within the bundle
    pub id: String,

    /// Initial value, when the manifest declares one
    pub value: Option<String>,

    /// Declared type; defaults to string
    pub variable_type: VariableType,

    /// Hidden variables are kept out of logs
    pub hidden: bool,

    /// Persisted variables survive across engine runs
    pub persisted: bool,
}

/// Parse all `Variable` elements under the bundle root.
pub fn parse(root: &Element) -> Result<Vec<Variable>> {
    let mut variables: Vec<Variable> = Vec::new();

    for element in root.children_named("Variable") {
        let id = element.require_attr("Id").map_err(err)?.to_string();
        if variables.iter().any(|v| v.id == id) {
            return Err(err(format!("duplicate variable id {:?}", id)));
        }

        let variable_type = match element.attr("Type") {
            None => VariableType::default(),
            Some("string") => VariableType::String,
            Some("formatted") => VariableType::Formatted,
            Some("numeric") => VariableType::Numeric,
            Some("version") => VariableType::Version,
            Some(other) => {
                return Err(err(format!(
                    "unknown type {:?} for variable {:?}",
                    other, id
                )));
            }
        };

        variables.push(Variable {
            id,
            value: element.attr("Value").map(str::to_string),
            variable_type,
            hidden: element.yes_no_attr("Hidden").map_err(err)?.unwrap_or(false),
            persisted: element
                .yes_no_attr("Persisted")
                .map_err(err)?
                .unwrap_or(false),
        });
    }

    Ok(variables)
}

fn err(e: impl std::fmt::Display) -> BundleError {
    BundleError::Variables(e.to_string())
}
