#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides:
//! - An address-book home over a fresh in-memory backend
//! - Seeding of address books and cards through the node API
//! - Parsing of the shared iCalendar fixtures

use std::collections::BTreeMap;
use std::sync::Arc;

pub use kunai_test::fixtures;
pub use kunai_test::kunai_rfc::rfc::dav::core::{Privilege, Principal, QName};
pub use kunai_test::kunai_rfc::rfc::ical::core::ICalendar;
pub use kunai_test::kunai_service::caldav::schedule::{
    DeliveryStatus, ImipDispatcher, Outbox, VersionExposure,
};
pub use kunai_test::kunai_service::carddav::{AddressBook, AddressBookHome, Card, MemoryBackend};
pub use kunai_test::kunai_service::dav::node::{
    AclNode, Collection, ExtendedCollection, File, Node, Payload,
};
pub use kunai_test::kunai_service::error::ServiceError;
pub use kunai_test::{RecordingTransport, StalledTransport};

pub const ALICE: &str = "principals/users/alice";
pub const SENDER: &str = "calendar@example.com";

/// The resource type of an address book.
#[must_use]
pub fn addressbook_type() -> Vec<QName> {
    vec![QName::dav("collection"), QName::carddav("addressbook")]
}

/// Address-book home of `principal` over an empty backend.
#[must_use]
pub fn home(principal: &str) -> AddressBookHome<MemoryBackend> {
    AddressBookHome::new(Arc::new(MemoryBackend::new()), principal)
}

/// Creates an address book named `name` and returns it.
pub async fn seed_address_book(
    home: &AddressBookHome<MemoryBackend>,
    name: &str,
) -> AddressBook<MemoryBackend> {
    home.create_extended_collection(name, &addressbook_type(), &BTreeMap::new())
        .await
        .expect("Failed to create address book");
    home.child(name).await.expect("Failed to fetch address book")
}

/// Stores `data` as `uri` in `book` and returns the card node.
pub async fn seed_card(
    book: &AddressBook<MemoryBackend>,
    uri: &str,
    data: &str,
) -> Card<MemoryBackend> {
    book.create_file(uri, Payload::from(data))
        .await
        .expect("Failed to create card");
    book.child(uri).await.expect("Failed to fetch card")
}

/// Reads the full body of a file node.
#[must_use]
pub fn body<F: File>(file: &F) -> Vec<u8> {
    file.get().into_inner()
}

/// Parses an iCalendar fixture.
#[must_use]
pub fn calendar(input: &str) -> ICalendar {
    kunai_test::kunai_rfc::rfc::ical::parse::parse(input).expect("Failed to parse fixture")
}

/// Dispatcher over a recording transport that hides the server version.
#[must_use]
pub fn dispatcher() -> ImipDispatcher<RecordingTransport> {
    ImipDispatcher::new(RecordingTransport::new(), SENDER, VersionExposure::Hidden)
}
