//! `WebDAV` vocabulary shared by the node implementations.

pub mod core;
