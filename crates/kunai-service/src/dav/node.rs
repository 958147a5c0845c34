//! Node contracts consumed by the DAV server.
//!
//! A node is constructed per request and answers for one resource in the
//! tree. Collections produce child nodes, files carry a payload, and ACL
//! nodes describe who may do what with them.

use std::collections::BTreeMap;
use std::io::Cursor;

use chrono::{DateTime, Utc};
use kunai_rfc::rfc::dav::core::{Ace, QName, ResourceType, SupportedPrivilege};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{ServiceError, ServiceResult};

/// Request body handed to `put`/`create_file`.
pub enum Payload {
    Bytes(Vec<u8>),
    Stream(Box<dyn AsyncRead + Send + Unpin>),
}

impl Payload {
    /// ## Summary
    /// Drains the payload into memory.
    ///
    /// ## Errors
    /// Returns `ServiceError::Io` if reading the stream fails.
    pub async fn into_bytes(self) -> ServiceResult<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Stream(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf).await?;
                Ok(buf)
            }
        }
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self::Bytes(s.as_bytes().to_vec())
    }
}

/// Any resource in the tree.
pub trait Node: Send + Sync {
    fn name(&self) -> &str;

    /// ## Errors
    /// Fails when the node cannot be renamed.
    fn set_name(&self, name: &str) -> impl Future<Output = ServiceResult<()>> + Send;

    /// ## Errors
    /// Fails when the node cannot be deleted or the backend refuses.
    fn delete(&self) -> impl Future<Output = ServiceResult<()>> + Send;

    fn last_modified(&self) -> Option<DateTime<Utc>>;

    fn resource_type(&self) -> ResourceType {
        ResourceType::default()
    }
}

/// A node with children.
pub trait Collection: Node {
    type Child: Node;

    /// ## Errors
    /// Propagates backend failures.
    fn children(&self) -> impl Future<Output = ServiceResult<Vec<Self::Child>>> + Send;

    /// ## Summary
    /// Looks up a child by name. The default scans `children()`.
    ///
    /// ## Errors
    /// Returns `ServiceError::NotFound` if no child has that name.
    fn child(&self, name: &str) -> impl Future<Output = ServiceResult<Self::Child>> + Send {
        async move {
            self.children()
                .await?
                .into_iter()
                .find(|c| c.name() == name)
                .ok_or_else(|| ServiceError::NotFound(format!("node {name} not found")))
        }
    }

    /// ## Errors
    /// Propagates backend failures other than `NotFound`.
    fn child_exists(&self, name: &str) -> impl Future<Output = ServiceResult<bool>> + Send {
        async move {
            match self.child(name).await {
                Ok(_) => Ok(true),
                Err(ServiceError::NotFound(_)) => Ok(false),
                Err(e) => Err(e),
            }
        }
    }

    /// ## Summary
    /// Creates a file child, returning its `ETag` when known.
    ///
    /// ## Errors
    /// Fails when the collection does not accept files.
    fn create_file(
        &self,
        name: &str,
        data: Payload,
    ) -> impl Future<Output = ServiceResult<Option<String>>> + Send;

    /// ## Errors
    /// Fails when the collection does not accept plain sub-collections.
    fn create_directory(&self, name: &str) -> impl Future<Output = ServiceResult<()>> + Send;
}

/// A collection that accepts typed sub-collections (extended MKCOL, RFC 5689).
pub trait ExtendedCollection: Collection {
    /// ## Errors
    /// Returns `ServiceError::InvalidResourceType` for an unsupported type set,
    /// or whatever the backend raises.
    fn create_extended_collection(
        &self,
        name: &str,
        resource_type: &[QName],
        properties: &BTreeMap<QName, String>,
    ) -> impl Future<Output = ServiceResult<()>> + Send;
}

/// A node with content.
pub trait File: Node {
    /// ## Summary
    /// Returns a reader over the current content, positioned at the start.
    fn get(&self) -> Cursor<Vec<u8>>;

    /// ## Summary
    /// Replaces the content, returning the new `ETag` when known.
    ///
    /// ## Errors
    /// Fails when the payload cannot be read or the backend refuses.
    fn put(&mut self, data: Payload) -> impl Future<Output = ServiceResult<Option<String>>> + Send;

    fn content_type(&self) -> Option<&str>;

    fn etag(&self) -> Option<String>;

    fn size(&self) -> usize;
}

/// A node carrying an access control list (RFC 3744).
pub trait AclNode: Node {
    /// Principal URI of the owner.
    fn owner(&self) -> Option<&str>;

    fn group(&self) -> Option<&str>;

    fn acl(&self) -> Vec<Ace>;

    /// ## Errors
    /// Returns `ServiceError::PermissionDenied` when the ACL is fixed.
    fn set_acl(&self, acl: &[Ace]) -> impl Future<Output = ServiceResult<()>> + Send;

    fn supported_privilege_set(&self) -> SupportedPrivilege {
        SupportedPrivilege::default_set()
    }
}

/// Child type of collections that never have children.
#[derive(Debug)]
pub enum NoChild {}

impl Node for NoChild {
    fn name(&self) -> &str {
        match *self {}
    }

    async fn set_name(&self, _name: &str) -> ServiceResult<()> {
        match *self {}
    }

    async fn delete(&self) -> ServiceResult<()> {
        match *self {}
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        match *self {}
    }
}

/// Converts a stored Unix timestamp.
#[must_use]
pub fn timestamp(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.and_then(|s| DateTime::from_timestamp(s, 0))
}
