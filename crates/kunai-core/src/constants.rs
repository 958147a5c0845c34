/// Product name used in generated headers and identifiers.
pub const PRODUCT_NAME: &str = "Kunai";

/// Crate version reported when version exposure is enabled.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header carrying the server version on outbound scheduling mail.
pub const VERSION_HEADER: &str = const_str::concat!("X-", PRODUCT_NAME, "-Version");

/// `PRODID` stamped on iCalendar objects created by this server.
pub const PRODID: &str = const_str::concat!("-//", PRODUCT_NAME, "//", VERSION, "//EN");

/// Name of the per-principal scheduling outbox node.
pub const OUTBOX_NAME: &str = "outbox";

/// MIME type served for card resources.
pub const VCARD_CONTENT_TYPE: &str = "text/x-vcard";

/// MIME type of iMIP message bodies.
pub const ICALENDAR_CONTENT_TYPE: &str = "text/calendar";

/// Longest collection name a backend accepts, in bytes.
pub const MAX_COLLECTION_NAME_LEN: usize = 255;
