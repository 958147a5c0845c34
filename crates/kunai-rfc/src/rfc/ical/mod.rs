//! iCalendar object model, parser and serializer.
//!
//! Only the structure needed to carry scheduling messages is modelled:
//! components, properties and parameters. Property values are kept in their
//! escaped wire form so that serialization reproduces the input.

pub mod build;
pub mod core;
pub mod itip;
pub mod parse;
