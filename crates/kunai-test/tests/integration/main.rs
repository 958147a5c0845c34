//! Integration tests for the Kunai CardDAV and scheduling nodes.

mod address_book;
mod card;
mod helpers;
mod imip;
mod outbox;
