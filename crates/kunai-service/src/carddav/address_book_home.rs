//! The collection holding every address book of one principal.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kunai_rfc::rfc::dav::core::{Ace, Privilege, QName, ResourceType};

use super::address_book::AddressBook;
use super::backend::CardDavBackend;
use crate::dav::node::{AclNode, Collection, ExtendedCollection, Node, Payload};
use crate::error::{ServiceError, ServiceResult};

/// Address-book home of a principal.
///
/// Built per request. Every listing goes to the backend; nothing is cached.
#[derive(Debug)]
pub struct AddressBookHome<B> {
    backend: Arc<B>,
    principal_uri: String,
}

impl<B: CardDavBackend> AddressBookHome<B> {
    #[must_use]
    pub fn new(backend: Arc<B>, principal_uri: impl Into<String>) -> Self {
        Self {
            backend,
            principal_uri: principal_uri.into(),
        }
    }

    #[must_use]
    pub fn principal_uri(&self) -> &str {
        &self.principal_uri
    }
}

/// Returns true when `types` is exactly `{DAV:collection, CARDDAV:addressbook}`.
fn is_addressbook_type(types: &[QName]) -> bool {
    let mut sorted: Vec<&QName> = types.iter().collect();
    sorted.sort();
    let expected = ResourceType::addressbook();
    sorted.len() == expected.len() && sorted.into_iter().eq(expected.iter())
}

impl<B: CardDavBackend> Node for AddressBookHome<B> {
    /// Last segment of the principal URI.
    fn name(&self) -> &str {
        self.principal_uri
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }

    async fn set_name(&self, _name: &str) -> ServiceResult<()> {
        Err(ServiceError::MethodNotAllowed(
            "renaming the address book home is not supported".into(),
        ))
    }

    async fn delete(&self) -> ServiceResult<()> {
        Err(ServiceError::MethodNotAllowed(
            "deleting the address book home is not supported".into(),
        ))
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn resource_type(&self) -> ResourceType {
        ResourceType::collection()
    }
}

impl<B: CardDavBackend> Collection for AddressBookHome<B> {
    type Child = AddressBook<B>;

    #[tracing::instrument(skip(self), fields(principal = %self.principal_uri))]
    async fn children(&self) -> ServiceResult<Vec<AddressBook<B>>> {
        let rows = self
            .backend
            .get_address_books_for_user(&self.principal_uri)
            .await?;
        tracing::debug!(count = rows.len(), "Listed address books");
        Ok(rows
            .into_iter()
            .map(|row| AddressBook::new(Arc::clone(&self.backend), row))
            .collect())
    }

    async fn create_file(&self, _name: &str, _data: Payload) -> ServiceResult<Option<String>> {
        Err(ServiceError::MethodNotAllowed(
            "creating files in the address book home is not supported".into(),
        ))
    }

    async fn create_directory(&self, _name: &str) -> ServiceResult<()> {
        Err(ServiceError::MethodNotAllowed(
            "use extended MKCOL to create address books".into(),
        ))
    }
}

impl<B: CardDavBackend> ExtendedCollection for AddressBookHome<B> {
    #[tracing::instrument(skip(self, properties), fields(principal = %self.principal_uri))]
    async fn create_extended_collection(
        &self,
        name: &str,
        resource_type: &[QName],
        properties: &BTreeMap<QName, String>,
    ) -> ServiceResult<()> {
        if !is_addressbook_type(resource_type) {
            let given = resource_type
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(%given, "Unsupported resource type for address book home");
            return Err(ServiceError::InvalidResourceType(format!(
                "unknown resource type [{given}] used in MKCOL"
            )));
        }

        self.backend
            .create_address_book(&self.principal_uri, name, properties)
            .await
    }
}

impl<B: CardDavBackend> AclNode for AddressBookHome<B> {
    fn owner(&self) -> Option<&str> {
        Some(&self.principal_uri)
    }

    fn group(&self) -> Option<&str> {
        None
    }

    fn acl(&self) -> Vec<Ace> {
        vec![
            Ace::protected(self.principal_uri.clone(), Privilege::Read),
            Ace::protected(self.principal_uri.clone(), Privilege::Write),
        ]
    }

    async fn set_acl(&self, _acl: &[Ace]) -> ServiceResult<()> {
        Err(ServiceError::PermissionDenied(
            "changing the ACL of the address book home is not supported".into(),
        ))
    }
}
