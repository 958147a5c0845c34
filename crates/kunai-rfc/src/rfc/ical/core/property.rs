//! iCalendar property and content line types (RFC 5545 §3.1, §3.8).

use std::borrow::Cow;

use super::Parameter;
use crate::rfc::ical::build::{escape_text, unescape_text};

/// A raw content line as produced by the lexer.
///
/// `BEGIN`/`END` markers are content lines too; the parser turns everything
/// else into [`Property`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Raw value string (after unfolding, before unescaping).
    pub raw_value: String,
}

impl ContentLine {
    /// Creates a new content line.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            raw_value: value.into(),
        }
    }
}

/// An iCalendar property.
///
/// The value is stored exactly as it appears on the wire (escaped, unfolded).
/// Use [`Property::text`] to read a TEXT value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: Vec<Parameter>,
    /// Escaped value string.
    pub raw_value: String,
}

impl Property {
    /// Creates a property from an already-escaped value.
    #[must_use]
    pub fn raw(name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            raw_value: raw_value.into(),
        }
    }

    /// Creates a property holding a TEXT value, escaping it.
    #[must_use]
    pub fn text_value(name: impl Into<String>, text: &str) -> Self {
        Self::raw(name, escape_text(text))
    }

    /// Adds a parameter, returning the property.
    #[must_use]
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Returns the parameter with the given name.
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        self.get_param(name)?.value()
    }

    /// Returns the value decoded as TEXT (RFC 5545 §3.3.11).
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        unescape_text(&self.raw_value)
    }
}

impl From<ContentLine> for Property {
    fn from(cl: ContentLine) -> Self {
        Self {
            name: cl.name,
            params: cl.params,
            raw_value: cl.raw_value,
        }
    }
}
