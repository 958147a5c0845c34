//! Integration tests for the address-book home.
//!
//! Tests:
//! - Extended MKCOL resource-type validation
//! - Child lookup against the backend
//! - Property handling on creation

use std::collections::BTreeMap;

use super::helpers::*;

/// ## Summary
/// Only the exact `{DAV:collection, CARDDAV:addressbook}` set creates a book.
#[test_log::test(tokio::test)]
async fn extended_mkcol_requires_addressbook_type() {
    let home = home(ALICE);

    let rejected: [Vec<QName>; 4] = [
        vec![QName::dav("collection")],
        vec![QName::dav("collection"), QName::caldav("calendar")],
        vec![QName::carddav("addressbook")],
        vec![
            QName::dav("collection"),
            QName::carddav("addressbook"),
            QName::caldav("calendar"),
        ],
    ];
    for types in &rejected {
        let result = home
            .create_extended_collection("book", types, &BTreeMap::new())
            .await;
        let Err(err) = result else {
            panic!("resource type {types:?} was accepted");
        };
        assert!(matches!(err, ServiceError::InvalidResourceType(_)));
        assert_eq!(err.status(), 400);
    }
    assert!(home.children().await.expect("Failed to list").is_empty());

    home.create_extended_collection("book", &addressbook_type(), &BTreeMap::new())
        .await
        .expect("Failed to create address book");
    assert!(home.child_exists("book").await.expect("Failed to look up"));
}

/// ## Summary
/// Lookup of a name that is not there fails with `NotFound` even when
/// siblings exist.
#[test_log::test(tokio::test)]
async fn child_lookup_miss_is_not_found() {
    let home = home(ALICE);
    seed_address_book(&home, "Work").await;
    seed_address_book(&home, "Home").await;

    let result = home.child("nonexistent").await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));

    let work = home.child("Work").await.expect("Work should exist");
    assert_eq!(work.name(), "Work");
    assert!(!home.child_exists("nonexistent").await.expect("Failed to look up"));
}

#[test_log::test(tokio::test)]
async fn creation_properties_are_stored() {
    let home = home(ALICE);
    let properties = BTreeMap::from([
        (QName::dav("displayname"), "Colleagues".to_string()),
        (
            QName::carddav("addressbook-description"),
            "People from work".to_string(),
        ),
    ]);
    home.create_extended_collection("work", &addressbook_type(), &properties)
        .await
        .expect("Failed to create address book");

    let book = home.child("work").await.expect("Failed to fetch");
    assert_eq!(book.display_name(), Some("Colleagues"));
    assert_eq!(book.description(), Some("People from work"));
    assert_eq!(book.owner(), Some(ALICE));
}

#[test_log::test(tokio::test)]
async fn duplicate_book_is_a_conflict() {
    let home = home(ALICE);
    seed_address_book(&home, "work").await;

    let result = home
        .create_extended_collection("work", &addressbook_type(), &BTreeMap::new())
        .await;
    assert!(matches!(result, Err(ServiceError::Conflict(_))));
}

#[test_log::test(tokio::test)]
async fn books_are_scoped_to_their_principal() {
    let backend = std::sync::Arc::new(MemoryBackend::new());
    let alice = AddressBookHome::new(std::sync::Arc::clone(&backend), ALICE);
    let bob = AddressBookHome::new(backend, "principals/users/bob");

    alice
        .create_extended_collection("contacts", &addressbook_type(), &BTreeMap::new())
        .await
        .expect("Failed to create address book");

    assert_eq!(alice.children().await.expect("Failed to list").len(), 1);
    assert!(bob.children().await.expect("Failed to list").is_empty());
}

#[test_log::test(tokio::test)]
async fn home_acl_is_owner_read_write() {
    let home = home(ALICE);
    let acl = home.acl();

    assert_eq!(acl.len(), 2);
    assert!(acl.iter().all(|ace| ace.protected));
    assert!(acl.iter().all(|ace| ace.principal == Principal::Href(ALICE.into())));
    assert_eq!(acl[0].privilege, Privilege::Read);
    assert_eq!(acl[1].privilege, Privilege::Write);
}
