//! Mail transport contract used by the iMIP dispatcher.

use std::fmt;

/// A single mail header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailHeader {
    pub name: String,
    pub value: String,
}

impl MailHeader {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Renders as `Name: value`.
impl fmt::Display for MailHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// One message to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    /// Bare e-mail address.
    pub to: String,
    pub subject: String,
    pub body: String,
    pub headers: Vec<MailHeader>,
}

impl OutboundMail {
    /// Returns the first header with the given name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

/// Delivers outbound mail.
///
/// Errors are reported to the dispatcher unchanged.
pub trait MailTransport: Send + Sync {
    fn send(&self, mail: &OutboundMail) -> impl Future<Output = anyhow::Result<()>> + Send;
}
