//! The scheduling outbox of a principal (RFC 6638 §2.1).
//!
//! The outbox only exists to carry the `CALDAV:schedule-query-freebusy`
//! privilege; free-busy requests are POSTed to it. It has no children and
//! its ACL is fixed.

use chrono::{DateTime, Utc};
use kunai_core::constants::OUTBOX_NAME;
use kunai_rfc::rfc::dav::core::{Ace, Privilege, ResourceType, SupportedPrivilege};

use crate::dav::node::{AclNode, Collection, NoChild, Node, Payload};
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone)]
pub struct Outbox {
    principal_uri: String,
}

impl Outbox {
    #[must_use]
    pub fn new(principal_uri: impl Into<String>) -> Self {
        Self {
            principal_uri: principal_uri.into(),
        }
    }

    fn fixed(what: &str) -> ServiceError {
        ServiceError::PermissionDenied(format!("{what} the scheduling outbox is not allowed"))
    }
}

impl Node for Outbox {
    fn name(&self) -> &str {
        OUTBOX_NAME
    }

    async fn set_name(&self, _name: &str) -> ServiceResult<()> {
        Err(Self::fixed("renaming"))
    }

    async fn delete(&self) -> ServiceResult<()> {
        Err(Self::fixed("deleting"))
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn resource_type(&self) -> ResourceType {
        ResourceType::schedule_outbox()
    }
}

impl Collection for Outbox {
    type Child = NoChild;

    async fn children(&self) -> ServiceResult<Vec<NoChild>> {
        Ok(Vec::new())
    }

    async fn create_file(&self, _name: &str, _data: Payload) -> ServiceResult<Option<String>> {
        Err(Self::fixed("creating files in"))
    }

    async fn create_directory(&self, _name: &str) -> ServiceResult<()> {
        Err(Self::fixed("creating collections in"))
    }
}

impl AclNode for Outbox {
    fn owner(&self) -> Option<&str> {
        Some(&self.principal_uri)
    }

    fn group(&self) -> Option<&str> {
        None
    }

    fn acl(&self) -> Vec<Ace> {
        vec![
            Ace::protected(self.principal_uri.clone(), Privilege::ScheduleQueryFreebusy),
            Ace::protected(self.principal_uri.clone(), Privilege::Read),
        ]
    }

    #[tracing::instrument(skip(self, acl), fields(principal = %self.principal_uri, entries = acl.len()))]
    async fn set_acl(&self, acl: &[Ace]) -> ServiceResult<()> {
        tracing::debug!("Rejecting ACL change on scheduling outbox");
        Err(ServiceError::PermissionDenied(
            "you are not allowed to update the ACL of the scheduling outbox".into(),
        ))
    }

    /// Default tree with `CALDAV:schedule-query-freebusy` aggregated under
    /// `DAV:all`.
    fn supported_privilege_set(&self) -> SupportedPrivilege {
        SupportedPrivilege::default_set()
            .with(SupportedPrivilege::concrete(Privilege::ScheduleQueryFreebusy))
    }
}
