//! Global install condition

use crate::xml::Element;
use crate::{BundleError, Result};

/// Parse the optional `Condition` element into the global bundle condition.
///
/// The condition expression is the element's text content. Evaluation happens
/// in a later engine phase; this parser only captures the expression.
pub fn parse(root: &Element) -> Result<Option<String>> {
    let Some(element) = root.optional_child("Condition") else {
        return Ok(None);
    };

    let expression = element.text().trim();
    if expression.is_empty() {
        return Err(BundleError::Condition(
            "Condition element has no expression text".to_string(),
        ));
    }

    Ok(Some(expression.to_string()))
}
