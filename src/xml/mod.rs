//! XML document acquisition and node access primitives
//!
//! Builds a small owned element tree from quick-xml events so the manifest
//! orchestrator and the section parsers can look nodes up in any order.
//! Attribute reads are tri-state: `Ok(Some(..))` present-with-value,
//! `Ok(None)` absent (a normal outcome, never an error), `Err(..)` malformed.
//! Callers must handle `None` before treating any other outcome as fatal.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use thiserror::Error;

/// Failure in the XML layer, distinct from normal absence of a node or
/// attribute
#[derive(Error, Debug)]
pub enum XmlError {
    /// The manifest file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The input is not well-formed XML
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// The document contains no root element
    #[error("document has no root element")]
    Empty,

    /// A required attribute is missing from an element that is present
    #[error("missing required attribute {element}/@{attribute}")]
    MissingAttribute { element: String, attribute: String },

    /// An attribute is present but its value is not a canonical yes/no token
    #[error("invalid yes/no value {value:?} for {element}/@{attribute}")]
    InvalidYesNo {
        element: String,
        attribute: String,
        value: String,
    },

    /// An attribute is present but its value is not an unsigned number
    #[error("invalid numeric value {value:?} for {element}/@{attribute}")]
    InvalidNumber {
        element: String,
        attribute: String,
        value: String,
    },
}

/// One node of the parsed manifest tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// Element name as written in the document
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Concatenated, unescaped text content of this element
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All child elements in document order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Select the first child element with the given name
    ///
    /// Absence is a normal outcome, not an error.
    pub fn optional_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Read a string attribute; `None` means the attribute is absent
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Read a string attribute that must be present
    pub fn require_attr(&self, name: &str) -> Result<&str, XmlError> {
        self.attr(name).ok_or_else(|| XmlError::MissingAttribute {
            element: self.name.clone(),
            attribute: name.to_string(),
        })
    }

    /// Read a boolean attribute holding a canonical "yes"/"no" token
    ///
    /// `Ok(None)` when the attribute is absent; any other token than the two
    /// canonical ones is an error.
    pub fn yes_no_attr(&self, name: &str) -> Result<Option<bool>, XmlError> {
        match self.attr(name) {
            None => Ok(None),
            Some("yes") => Ok(Some(true)),
            Some("no") => Ok(Some(false)),
            Some(other) => Err(XmlError::InvalidYesNo {
                element: self.name.clone(),
                attribute: name.to_string(),
                value: other.to_string(),
            }),
        }
    }

    /// Read an unsigned numeric attribute; `Ok(None)` when absent
    pub fn u64_attr(&self, name: &str) -> Result<Option<u64>, XmlError> {
        match self.attr(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| XmlError::InvalidNumber {
                    element: self.name.clone(),
                    attribute: name.to_string(),
                    value: raw.to_string(),
                }),
        }
    }
}

/// An immutable parsed manifest document
///
/// Owns the whole element tree; node access hands out shared borrows that are
/// released with the document itself.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse a document from a file on disk
    pub fn from_file(path: &Path) -> Result<Self, XmlError> {
        let bytes = std::fs::read(path).map_err(|source| XmlError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a document from an in-memory byte buffer
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, XmlError> {
        let xml = std::str::from_utf8(bytes)
            .map_err(|e| XmlError::Malformed(format!("input is not valid UTF-8: {}", e)))?;
        Self::parse(xml)
    }

    /// Parse a document from XML text
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    stack.push(element_from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = element_from_start(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| XmlError::Malformed("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(ref t)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = t.decode().map_err(|e| {
                            XmlError::Malformed(format!("invalid text content: {}", e))
                        })?;
                        parent.text.push_str(&text);
                    }
                }
                Ok(Event::CData(ref c)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.text.push_str(&String::from_utf8_lossy(c));
                    }
                }
                Ok(Event::GeneralRef(ref r)) => {
                    if let Some(parent) = stack.last_mut() {
                        let name = String::from_utf8_lossy(r);
                        parent.text.push(resolve_entity(&name)?);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XmlError::Malformed(e.to_string())),
                // Comments, processing instructions, declarations
                Ok(_) => {}
            }
        }

        if !stack.is_empty() {
            return Err(XmlError::Malformed("unclosed element".to_string()));
        }

        root.map(|root| Document { root }).ok_or(XmlError::Empty)
    }

    /// The document's root element
    pub fn root(&self) -> &Element {
        &self.root
    }
}

/// Resolve a predefined or character entity reference to its character
fn resolve_entity(name: &str) -> Result<char, XmlError> {
    match name {
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "amp" => Ok('&'),
        "apos" => Ok('\''),
        "quot" => Ok('"'),
        _ => {
            let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => name.strip_prefix('#').and_then(|dec| dec.parse().ok()),
            };
            code.and_then(char::from_u32)
                .ok_or_else(|| XmlError::Malformed(format!("unresolved entity &{};", name)))
        }
    }
}

fn element_from_start(e: &BytesStart) -> Result<Element, XmlError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr
            .map_err(|err| XmlError::Malformed(format!("invalid attribute on <{}>: {}", name, err)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::Malformed(format!("invalid value for {}/@{}: {}", name, key, err)))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(XmlError::Malformed(
            "multiple root elements".to_string(),
        ))
    }
}
