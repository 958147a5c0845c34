//! Node implementations plugged into a DAV server: CardDAV address books and
//! cards, the scheduling outbox, and iMIP delivery of scheduling messages.

pub mod auth;
pub mod caldav;
pub mod carddav;
pub mod dav;
pub mod error;
