//! Kunai integration test support.
//!
//! Re-exports the workspace crates and provides in-process mail transports
//! that record or reject what the iMIP dispatcher hands them.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use kunai_core;
pub use kunai_rfc;
pub use kunai_service;

use kunai_service::caldav::schedule::{MailTransport, OutboundMail};

/// Records every message instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutboundMail>>,
    reject: BTreeSet<String>,
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every message addressed to `address`.
    #[must_use]
    pub fn rejecting(mut self, address: impl Into<String>) -> Self {
        self.reject.insert(address.into());
        self
    }

    fn lock(&self) -> MutexGuard<'_, Vec<OutboundMail>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Messages accepted so far, in send order.
    #[must_use]
    pub fn sent(&self) -> Vec<OutboundMail> {
        self.lock().clone()
    }
}

impl MailTransport for RecordingTransport {
    async fn send(&self, mail: &OutboundMail) -> anyhow::Result<()> {
        if self.reject.contains(&mail.to) {
            anyhow::bail!("mailbox {} unavailable", mail.to);
        }
        tracing::debug!(to = %mail.to, "Recording outbound mail");
        self.lock().push(mail.clone());
        Ok(())
    }
}

/// Never answers; used to exercise the dispatcher's timeout and cancellation.
#[derive(Debug, Default)]
pub struct StalledTransport;

impl MailTransport for StalledTransport {
    async fn send(&self, _mail: &OutboundMail) -> anyhow::Result<()> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Scheduling messages and vCards used across the integration tests.
pub mod fixtures {
    pub const TEAM_SYNC_REQUEST: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Example Corp//Calendar 1.0//EN\r
METHOD:REQUEST\r
BEGIN:VEVENT\r
UID:team-sync-42@example.com\r
DTSTAMP:20260301T090000Z\r
DTSTART:20260305T150000Z\r
DTEND:20260305T153000Z\r
SUMMARY:Team Sync\r
ORGANIZER:mailto:alice@example.com\r
ATTENDEE:mailto:bob@example.com\r
ATTENDEE:mailto:carol@example.com\r
END:VEVENT\r
END:VCALENDAR\r
";

    pub const UNTITLED_REQUEST: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Example Corp//Calendar 1.0//EN\r
METHOD:REQUEST\r
BEGIN:VEVENT\r
UID:untitled-7@example.com\r
DTSTAMP:20260301T090000Z\r
DTSTART:20260306T090000Z\r
ORGANIZER:mailto:alice@example.com\r
ATTENDEE:mailto:bob@example.com\r
END:VEVENT\r
END:VCALENDAR\r
";

    /// Summary and method carry escaped line breaks aimed at mail headers.
    pub const HEADER_INJECTION_REQUEST: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Example Corp//Calendar 1.0//EN\r
METHOD:REQUEST\r
BEGIN:VEVENT\r
UID:team-sync-43@example.com\r
DTSTAMP:20260301T090000Z\r
DTSTART:20260305T150000Z\r
SUMMARY:Team Sync\\nBcc: victim@evil.example\r
ORGANIZER:mailto:alice@example.com\r
ATTENDEE:mailto:bob@example.com\r
END:VEVENT\r
END:VCALENDAR\r
";

    pub const VCARD_BOB: &str = "BEGIN:VCARD\r
VERSION:3.0\r
FN:Bob Doe\r
N:Doe;Bob;;;\r
EMAIL:bob@example.com\r
END:VCARD\r
";

    pub const VCARD_BOB_UPDATED: &str = "BEGIN:VCARD\r
VERSION:3.0\r
FN:Bob Doe\r
N:Doe;Bob;;;\r
EMAIL:bob@example.com\r
TEL;TYPE=CELL:+49 170 0000000\r
END:VCARD\r
";
}
