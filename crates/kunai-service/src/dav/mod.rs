pub mod node;

pub use node::{AclNode, Collection, ExtendedCollection, File, NoChild, Node, Payload};
