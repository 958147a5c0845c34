//! CalDAV scheduling (RFC 6638): the free-busy outbox and iMIP delivery of
//! scheduling messages.

pub mod imip;
pub mod outbox;
pub mod smtp;
pub mod transport;

pub use imip::{DeliveryReport, DeliveryStatus, ImipDispatcher, RecipientOutcome, VersionExposure};
pub use outbox::Outbox;
pub use smtp::SmtpTransport;
pub use transport::{MailHeader, MailTransport, OutboundMail};
