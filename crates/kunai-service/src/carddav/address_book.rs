//! An address book collection; its children are cards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kunai_rfc::rfc::dav::core::{Ace, Privilege, ResourceType};

use super::backend::{AddressBookRow, CardDavBackend};
use super::card::{Card, CardContent};
use crate::dav::node::{AclNode, Collection, Node, Payload};
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug)]
pub struct AddressBook<B> {
    backend: Arc<B>,
    row: AddressBookRow,
}

impl<B: CardDavBackend> AddressBook<B> {
    #[must_use]
    pub fn new(backend: Arc<B>, row: AddressBookRow) -> Self {
        Self { backend, row }
    }

    #[must_use]
    pub fn id(&self) -> i64 {
        self.row.id
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.row.display_name.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.row.description.as_deref()
    }

    #[must_use]
    pub fn sync_token(&self) -> u64 {
        self.row.sync_token
    }

    fn card(&self, content: CardContent) -> Card<B> {
        Card::new(Arc::clone(&self.backend), self.row.principal_uri.clone(), content)
    }
}

impl<B: CardDavBackend> Node for AddressBook<B> {
    fn name(&self) -> &str {
        &self.row.uri
    }

    async fn set_name(&self, _name: &str) -> ServiceResult<()> {
        Err(ServiceError::MethodNotAllowed(
            "renaming address books is not supported".into(),
        ))
    }

    #[tracing::instrument(skip(self), fields(address_book = %self.row.uri))]
    async fn delete(&self) -> ServiceResult<()> {
        self.backend.delete_address_book(self.row.id).await
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn resource_type(&self) -> ResourceType {
        ResourceType::addressbook()
    }
}

impl<B: CardDavBackend> Collection for AddressBook<B> {
    type Child = Card<B>;

    async fn children(&self) -> ServiceResult<Vec<Card<B>>> {
        let rows = self.backend.get_cards(self.row.id).await?;
        Ok(rows
            .into_iter()
            .map(|row| self.card(CardContent::from_row(self.row.id, row)))
            .collect())
    }

    async fn child(&self, name: &str) -> ServiceResult<Card<B>> {
        self.backend
            .get_card(self.row.id, name)
            .await?
            .map(|row| self.card(CardContent::from_row(self.row.id, row)))
            .ok_or_else(|| ServiceError::NotFound(format!("card {name} not found")))
    }

    #[tracing::instrument(skip(self, data), fields(address_book = %self.row.uri))]
    async fn create_file(&self, name: &str, data: Payload) -> ServiceResult<Option<String>> {
        let payload = data.into_bytes().await?;
        self.backend.create_card(self.row.id, name, &payload).await
    }

    async fn create_directory(&self, _name: &str) -> ServiceResult<()> {
        Err(ServiceError::MethodNotAllowed(
            "address books cannot contain collections".into(),
        ))
    }
}

impl<B: CardDavBackend> AclNode for AddressBook<B> {
    fn owner(&self) -> Option<&str> {
        Some(&self.row.principal_uri)
    }

    fn group(&self) -> Option<&str> {
        None
    }

    fn acl(&self) -> Vec<Ace> {
        vec![Ace::protected(self.row.principal_uri.clone(), Privilege::All)]
    }

    async fn set_acl(&self, _acl: &[Ace]) -> ServiceResult<()> {
        Err(ServiceError::PermissionDenied(
            "changing the ACL of an address book is not supported".into(),
        ))
    }
}
