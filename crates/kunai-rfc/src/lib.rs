//! RFC data models used by Kunai: iCalendar (RFC 5545), iTIP (RFC 5546)
//! and the `WebDAV` ACL vocabulary (RFC 3744, RFC 6638).

pub mod error;
pub mod rfc;
