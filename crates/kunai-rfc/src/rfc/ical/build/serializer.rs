//! iCalendar serializer (RFC 5545).
//!
//! Components and properties are written in the order they are held, so a
//! parsed object serializes back to the same content lines.

use super::fold::fold_line;
use crate::rfc::ical::core::{Component, ICalendar, Property};

/// Serializes an iCalendar document to a string.
#[must_use]
pub fn serialize(ical: &ICalendar) -> String {
    serialize_component(&ical.root)
}

/// Serializes a component and its children to a string.
#[must_use]
pub fn serialize_component(component: &Component) -> String {
    let mut result = String::new();

    result.push_str(&fold_line(&format!("BEGIN:{}", component.name)));

    for prop in &component.properties {
        result.push_str(&serialize_property(prop));
    }

    for child in &component.children {
        result.push_str(&serialize_component(child));
    }

    result.push_str(&fold_line(&format!("END:{}", component.name)));

    result
}

/// Serializes a property to a folded, CRLF-terminated content line.
#[must_use]
pub fn serialize_property(prop: &Property) -> String {
    let mut line = prop.name.clone();

    for param in &prop.params {
        line.push(';');
        line.push_str(&param.to_string());
    }

    line.push(':');
    line.push_str(&prop.raw_value);

    fold_line(&line)
}
