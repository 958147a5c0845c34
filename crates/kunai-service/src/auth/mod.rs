//! XML rendering of ACL properties for PROPFIND consumers.

pub mod acl;
pub mod privilege;
