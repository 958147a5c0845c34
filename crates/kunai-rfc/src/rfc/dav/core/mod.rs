//! `WebDAV` ACL and resource-type types (RFC 3744, RFC 4791, RFC 6352, RFC 6638).
//!
//! Only the data model lives here. XML bodies are rendered by the service
//! layer and the wire protocol belongs to the DAV server.

mod ace;
mod error;
mod namespace;
mod privilege;
mod resource_type;

pub use ace::{Ace, Principal};
pub use error::DavError;
pub use namespace::{CALDAV_NS, CARDDAV_NS, DAV_NS, Namespace, QName, dav_props};
pub use privilege::{FlatPrivilege, Privilege, SupportedPrivilege};
pub use resource_type::ResourceType;
