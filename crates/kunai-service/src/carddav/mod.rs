//! CardDAV nodes: the per-principal address-book home, address books and
//! the cards inside them.

pub mod address_book;
pub mod address_book_home;
pub mod backend;
pub mod card;
pub mod etag;
pub mod memory;

pub use address_book::AddressBook;
pub use address_book_home::AddressBookHome;
pub use backend::{AddressBookRow, CardDavBackend, CardRow};
pub use card::{Card, CardContent};
pub use memory::MemoryBackend;
