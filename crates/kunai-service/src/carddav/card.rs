//! A single vCard resource inside an address book.

use std::io::Cursor;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kunai_core::constants::VCARD_CONTENT_TYPE;
use kunai_rfc::rfc::dav::core::{Ace, Privilege};

use super::backend::{CardDavBackend, CardRow};
use super::etag::card_etag;
use crate::dav::node::{AclNode, File, Node, Payload, timestamp};
use crate::error::{ServiceError, ServiceResult};

/// The state of a card as last read from or written to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardContent {
    pub uri: String,
    pub payload: Vec<u8>,
    pub address_book_id: i64,
    pub last_modified: Option<i64>,
}

impl CardContent {
    #[must_use]
    pub fn from_row(address_book_id: i64, row: CardRow) -> Self {
        Self {
            uri: row.uri,
            payload: row.carddata,
            address_book_id,
            last_modified: row.last_modified,
        }
    }

    /// Quoted MD5 of the payload, computed on each call.
    #[must_use]
    pub fn etag(&self) -> String {
        card_etag(&self.payload)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

/// A card node. Owned by the address book's principal.
#[derive(Debug)]
pub struct Card<B> {
    backend: Arc<B>,
    owner: String,
    content: CardContent,
}

impl<B: CardDavBackend> Card<B> {
    #[must_use]
    pub fn new(backend: Arc<B>, owner: impl Into<String>, content: CardContent) -> Self {
        Self {
            backend,
            owner: owner.into(),
            content,
        }
    }

    #[must_use]
    pub fn content(&self) -> &CardContent {
        &self.content
    }
}

impl<B: CardDavBackend> Node for Card<B> {
    fn name(&self) -> &str {
        &self.content.uri
    }

    async fn set_name(&self, _name: &str) -> ServiceResult<()> {
        Err(ServiceError::MethodNotAllowed(
            "cards cannot be renamed".into(),
        ))
    }

    #[tracing::instrument(skip(self), fields(card = %self.content.uri))]
    async fn delete(&self) -> ServiceResult<()> {
        self.backend
            .delete_card(self.content.address_book_id, &self.content.uri)
            .await
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        timestamp(self.content.last_modified)
    }
}

impl<B: CardDavBackend> File for Card<B> {
    fn get(&self) -> Cursor<Vec<u8>> {
        Cursor::new(self.content.payload.clone())
    }

    /// ## Summary
    /// Drains the payload, hands it to the backend and, once accepted,
    /// replaces the in-memory content.
    ///
    /// Returns the same ETag as [`File::etag`] afterwards. A differently
    /// formatted ETag from the backend is not passed on.
    ///
    /// ## Side Effects
    /// The stored `last_modified` is left as read; it refreshes on the next
    /// lookup.
    #[tracing::instrument(skip(self, data), fields(card = %self.content.uri))]
    async fn put(&mut self, data: Payload) -> ServiceResult<Option<String>> {
        let payload = data.into_bytes().await?;

        let backend_etag = self
            .backend
            .update_card(self.content.address_book_id, &self.content.uri, &payload)
            .await?;

        self.content.payload = payload;
        let etag = self.content.etag();
        if backend_etag.as_ref().is_some_and(|b| *b != etag) {
            tracing::debug!(backend_etag = ?backend_etag, %etag, "Backend ETag differs from content ETag");
        }
        tracing::debug!(size = self.content.size(), "Card updated");

        Ok(Some(etag))
    }

    fn content_type(&self) -> Option<&str> {
        Some(VCARD_CONTENT_TYPE)
    }

    fn etag(&self) -> Option<String> {
        Some(self.content.etag())
    }

    fn size(&self) -> usize {
        self.content.size()
    }
}

impl<B: CardDavBackend> AclNode for Card<B> {
    fn owner(&self) -> Option<&str> {
        Some(&self.owner)
    }

    fn group(&self) -> Option<&str> {
        None
    }

    fn acl(&self) -> Vec<Ace> {
        vec![Ace::protected(self.owner.clone(), Privilege::All)]
    }

    async fn set_acl(&self, _acl: &[Ace]) -> ServiceResult<()> {
        Err(ServiceError::PermissionDenied(
            "changing the ACL of a card is not supported".into(),
        ))
    }
}
