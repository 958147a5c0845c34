//! Storage contract for address books and cards.

use std::collections::BTreeMap;

use kunai_rfc::rfc::dav::core::QName;

use crate::error::ServiceResult;

/// An address book as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBookRow {
    pub id: i64,
    /// Path segment under the principal's address-book home.
    pub uri: String,
    pub principal_uri: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// Bumped on every change to the book's cards.
    pub sync_token: u64,
}

/// A card as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRow {
    pub id: i64,
    pub uri: String,
    pub carddata: Vec<u8>,
    /// Unix timestamp of the last write, when the backend tracks one.
    pub last_modified: Option<i64>,
}

/// Persistence collaborator of the CardDAV nodes.
///
/// Errors are surfaced to callers unchanged; backends report their own
/// failures as `ServiceError::Backend`.
pub trait CardDavBackend: Send + Sync {
    fn get_address_books_for_user(
        &self,
        principal_uri: &str,
    ) -> impl Future<Output = ServiceResult<Vec<AddressBookRow>>> + Send;

    /// Creates an address book. Only `DAV:displayname` and
    /// `CARDDAV:addressbook-description` are understood.
    fn create_address_book(
        &self,
        principal_uri: &str,
        url: &str,
        properties: &BTreeMap<QName, String>,
    ) -> impl Future<Output = ServiceResult<()>> + Send;

    fn delete_address_book(&self, address_book_id: i64) -> impl Future<Output = ServiceResult<()>> + Send;

    fn get_cards(&self, address_book_id: i64) -> impl Future<Output = ServiceResult<Vec<CardRow>>> + Send;

    fn get_card(
        &self,
        address_book_id: i64,
        card_uri: &str,
    ) -> impl Future<Output = ServiceResult<Option<CardRow>>> + Send;

    /// Returns the new card's `ETag` when the backend computes one.
    fn create_card(
        &self,
        address_book_id: i64,
        card_uri: &str,
        card_data: &[u8],
    ) -> impl Future<Output = ServiceResult<Option<String>>> + Send;

    /// Returns the updated card's `ETag` when the backend computes one.
    fn update_card(
        &self,
        address_book_id: i64,
        card_uri: &str,
        card_data: &[u8],
    ) -> impl Future<Output = ServiceResult<Option<String>>> + Send;

    fn delete_card(
        &self,
        address_book_id: i64,
        card_uri: &str,
    ) -> impl Future<Output = ServiceResult<()>> + Send;
}
