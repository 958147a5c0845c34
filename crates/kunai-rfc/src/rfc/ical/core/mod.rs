//! iCalendar core models (RFC 5545).

mod component;
mod parameter;
mod property;

pub use component::{Component, ComponentKind, ICalendar};
pub use parameter::Parameter;
pub use property::{ContentLine, Property};
