//! Integration tests for card resources.
//!
//! Tests:
//! - PUT/GET round trip through the backend
//! - ETag and size tracking
//! - Home → book → card traversal

use super::helpers::*;

/// ## Summary
/// A PUT payload is returned byte for byte by GET and by a fresh lookup.
#[test_log::test(tokio::test)]
async fn put_then_get_round_trips() {
    let home = home(ALICE);
    let book = seed_address_book(&home, "contacts").await;
    let mut card = seed_card(&book, "bob.vcf", fixtures::VCARD_BOB).await;
    assert_eq!(body(&card), fixtures::VCARD_BOB.as_bytes());

    card.put(Payload::from(fixtures::VCARD_BOB_UPDATED))
        .await
        .expect("Failed to update card");
    assert_eq!(body(&card), fixtures::VCARD_BOB_UPDATED.as_bytes());

    let reread = book.child("bob.vcf").await.expect("Failed to fetch card");
    assert_eq!(body(&reread), fixtures::VCARD_BOB_UPDATED.as_bytes());
}

#[test_log::test(tokio::test)]
async fn streamed_payload_is_drained() {
    let home = home(ALICE);
    let book = seed_address_book(&home, "contacts").await;
    let mut card = seed_card(&book, "bob.vcf", fixtures::VCARD_BOB).await;

    let stream = std::io::Cursor::new(fixtures::VCARD_BOB_UPDATED.as_bytes().to_vec());
    card.put(Payload::Stream(Box::new(stream)))
        .await
        .expect("Failed to update card");
    assert_eq!(body(&card), fixtures::VCARD_BOB_UPDATED.as_bytes());
}

/// ## Summary
/// ETags follow content: equal payloads give equal tags, different payloads
/// different ones.
#[test_log::test(tokio::test)]
async fn etag_tracks_content() {
    let home = home(ALICE);
    let book = seed_address_book(&home, "contacts").await;
    let mut first = seed_card(&book, "a.vcf", fixtures::VCARD_BOB).await;
    let second = seed_card(&book, "b.vcf", fixtures::VCARD_BOB).await;

    let original = first.etag().expect("card has an etag");
    assert_eq!(Some(original.clone()), second.etag());
    assert!(original.starts_with('"') && original.ends_with('"'));

    let returned = first
        .put(Payload::from(fixtures::VCARD_BOB_UPDATED))
        .await
        .expect("Failed to update card");
    assert_eq!(returned, first.etag());
    assert_ne!(first.etag(), Some(original));
}

#[test_log::test(tokio::test)]
async fn size_follows_latest_payload() {
    let home = home(ALICE);
    let book = seed_address_book(&home, "contacts").await;
    let mut card = seed_card(&book, "bob.vcf", fixtures::VCARD_BOB).await;
    assert_eq!(card.size(), fixtures::VCARD_BOB.len());

    card.put(Payload::from(fixtures::VCARD_BOB_UPDATED))
        .await
        .expect("Failed to update card");
    assert_eq!(card.size(), fixtures::VCARD_BOB_UPDATED.len());

    card.put(Payload::from("")).await.expect("Failed to update card");
    assert_eq!(card.size(), 0);
}

/// ## Summary
/// Walks home → book → card and back out through deletion.
#[test_log::test(tokio::test)]
async fn home_book_card_traversal() {
    let home = home(ALICE);
    seed_address_book(&home, "contacts").await;

    let books = home.children().await.expect("Failed to list books");
    assert_eq!(books.len(), 1);
    let book = &books[0];
    seed_card(book, "bob.vcf", fixtures::VCARD_BOB).await;

    let token = home
        .child("contacts")
        .await
        .expect("Failed to fetch book")
        .sync_token();
    assert!(token > books[0].sync_token());

    let cards = book.children().await.expect("Failed to list cards");
    assert_eq!(cards.len(), 1);
    let card = &cards[0];
    assert_eq!(card.name(), "bob.vcf");
    assert_eq!(card.content_type(), Some("text/x-vcard"));
    assert_eq!(card.owner(), Some(ALICE));
    assert!(card.last_modified().is_some());

    card.delete().await.expect("Failed to delete card");
    assert!(book.children().await.expect("Failed to list cards").is_empty());
    assert!(matches!(
        book.child("bob.vcf").await,
        Err(ServiceError::NotFound(_))
    ));
}
