//! In-process CardDAV backend.

use std::collections::BTreeMap;

use kunai_core::constants::MAX_COLLECTION_NAME_LEN;
use kunai_rfc::rfc::dav::core::{QName, dav_props};
use tokio::sync::RwLock;

use super::backend::{AddressBookRow, CardDavBackend, CardRow};
use super::etag::card_etag;
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    books: BTreeMap<i64, AddressBookRow>,
    /// Keyed by (address book id, card uri).
    cards: BTreeMap<(i64, String), CardRow>,
}

impl State {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn book_mut(&mut self, id: i64) -> ServiceResult<&mut AddressBookRow> {
        self.books
            .get_mut(&id)
            .ok_or_else(|| ServiceError::NotFound(format!("address book {id} not found")))
    }
}

/// Address books and cards held in memory.
///
/// Writes stamp `last_modified` from the wall clock and bump the owning
/// book's sync token.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<State>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl CardDavBackend for MemoryBackend {
    #[tracing::instrument(skip(self))]
    async fn get_address_books_for_user(
        &self,
        principal_uri: &str,
    ) -> ServiceResult<Vec<AddressBookRow>> {
        let state = self.state.read().await;
        Ok(state
            .books
            .values()
            .filter(|b| b.principal_uri == principal_uri)
            .cloned()
            .collect())
    }

    #[tracing::instrument(skip(self, properties))]
    async fn create_address_book(
        &self,
        principal_uri: &str,
        url: &str,
        properties: &BTreeMap<QName, String>,
    ) -> ServiceResult<()> {
        if url.len() > MAX_COLLECTION_NAME_LEN {
            return Err(ServiceError::InvalidProperty(format!(
                "address book name exceeds {MAX_COLLECTION_NAME_LEN} bytes"
            )));
        }

        let mut display_name = None;
        let mut description = None;
        for (name, value) in properties {
            if *name == dav_props::displayname() {
                display_name = Some(value.clone());
            } else if *name == dav_props::addressbook_description() {
                description = Some(value.clone());
            } else {
                tracing::warn!(property = %name, "Rejecting unsupported address book property");
                return Err(ServiceError::InvalidProperty(format!(
                    "unsupported property {name}"
                )));
            }
        }

        let mut state = self.state.write().await;
        if state
            .books
            .values()
            .any(|b| b.principal_uri == principal_uri && b.uri == url)
        {
            return Err(ServiceError::Conflict(format!(
                "address book {url} already exists"
            )));
        }

        let id = state.allocate_id();
        state.books.insert(
            id,
            AddressBookRow {
                id,
                uri: url.to_string(),
                principal_uri: principal_uri.to_string(),
                display_name: Some(display_name.unwrap_or_else(|| url.to_string())),
                description,
                sync_token: 1,
            },
        );

        tracing::debug!(id, "Address book created");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_address_book(&self, address_book_id: i64) -> ServiceResult<()> {
        let mut state = self.state.write().await;
        if state.books.remove(&address_book_id).is_none() {
            return Err(ServiceError::NotFound(format!(
                "address book {address_book_id} not found"
            )));
        }
        state.cards.retain(|(book, _), _| *book != address_book_id);
        Ok(())
    }

    async fn get_cards(&self, address_book_id: i64) -> ServiceResult<Vec<CardRow>> {
        let state = self.state.read().await;
        Ok(state
            .cards
            .iter()
            .filter(|((book, _), _)| *book == address_book_id)
            .map(|(_, card)| card.clone())
            .collect())
    }

    async fn get_card(&self, address_book_id: i64, card_uri: &str) -> ServiceResult<Option<CardRow>> {
        let state = self.state.read().await;
        Ok(state
            .cards
            .get(&(address_book_id, card_uri.to_string()))
            .cloned())
    }

    #[tracing::instrument(skip(self, card_data), fields(len = card_data.len()))]
    async fn create_card(
        &self,
        address_book_id: i64,
        card_uri: &str,
        card_data: &[u8],
    ) -> ServiceResult<Option<String>> {
        let mut state = self.state.write().await;
        state.book_mut(address_book_id)?;

        let key = (address_book_id, card_uri.to_string());
        if state.cards.contains_key(&key) {
            return Err(ServiceError::Conflict(format!("card {card_uri} already exists")));
        }

        let id = state.allocate_id();
        state.cards.insert(
            key,
            CardRow {
                id,
                uri: card_uri.to_string(),
                carddata: card_data.to_vec(),
                last_modified: Some(now()),
            },
        );
        state.book_mut(address_book_id)?.sync_token += 1;

        Ok(Some(card_etag(card_data)))
    }

    #[tracing::instrument(skip(self, card_data), fields(len = card_data.len()))]
    async fn update_card(
        &self,
        address_book_id: i64,
        card_uri: &str,
        card_data: &[u8],
    ) -> ServiceResult<Option<String>> {
        let mut state = self.state.write().await;
        state.book_mut(address_book_id)?;

        let card = state
            .cards
            .get_mut(&(address_book_id, card_uri.to_string()))
            .ok_or_else(|| ServiceError::NotFound(format!("card {card_uri} not found")))?;
        card.carddata = card_data.to_vec();
        card.last_modified = Some(now());
        state.book_mut(address_book_id)?.sync_token += 1;

        Ok(Some(card_etag(card_data)))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_card(&self, address_book_id: i64, card_uri: &str) -> ServiceResult<()> {
        let mut state = self.state.write().await;
        state.book_mut(address_book_id)?;

        if state
            .cards
            .remove(&(address_book_id, card_uri.to_string()))
            .is_none()
        {
            return Err(ServiceError::NotFound(format!("card {card_uri} not found")));
        }
        state.book_mut(address_book_id)?.sync_token += 1;
        Ok(())
    }
}
