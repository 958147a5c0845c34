//! iTIP scheduling messages (RFC 5546).

use std::fmt;

use super::core::ICalendar;

/// iTIP scheduling method carried in the calendar's `METHOD` property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// Invitation or update sent by the organizer.
    Request,
    /// Attendee response to the organizer.
    Reply,
    /// Cancellation sent by the organizer.
    Cancel,
    /// Any other method (`PUBLISH`, `COUNTER`, ...), stored upper-cased.
    /// Empty when the calendar carries no `METHOD`.
    Other(String),
}

impl Method {
    /// Parses a method name (case-insensitive, surrounding whitespace ignored).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "REQUEST" => Self::Request,
            "REPLY" => Self::Reply,
            "CANCEL" => Self::Cancel,
            _ => Self::Other(upper),
        }
    }

    /// Reads the method of a calendar object. A missing `METHOD` yields
    /// `Other("")`.
    #[must_use]
    pub fn of(calendar: &ICalendar) -> Self {
        calendar
            .method()
            .map_or_else(|| Self::Other(String::new()), Self::parse)
    }

    /// Returns the upper-cased wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Request => "REQUEST",
            Self::Reply => "REPLY",
            Self::Cancel => "CANCEL",
            Self::Other(name) => name,
        }
    }

    /// Returns `true` when there is no method name to advertise.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// True when the wire name is an RFC 5545 `iana-token` (letters, digits
    /// and `-`).
    #[must_use]
    pub fn is_token(&self) -> bool {
        let name = self.as_str();
        !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduling message produced by the scheduling engine.
///
/// Addresses are calendar-user addresses, usually `mailto:` URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItipMessage {
    pub method: Method,
    pub originator: String,
    pub recipients: Vec<String>,
    pub message: ICalendar,
}

impl ItipMessage {
    /// Creates a message, taking the method from the calendar object.
    #[must_use]
    pub fn new(originator: impl Into<String>, recipients: Vec<String>, message: ICalendar) -> Self {
        Self {
            method: Method::of(&message),
            originator: originator.into(),
            recipients,
            message,
        }
    }
}
