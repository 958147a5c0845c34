//! `DAV:acl` property serialization (RFC 3744 §5.5).

use std::fmt::Write;

use kunai_rfc::rfc::dav::core::{Ace, Principal};
use tracing_unwrap::ResultExt;

use super::privilege::privilege_element;

/// ## Summary
/// Serializes access control entries into a `DAV:acl` element.
///
/// Each ACE grants a single privilege; protected entries carry
/// `<D:protected/>`.
///
/// ## Example Output
///
/// ```xml
/// <D:acl xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
///   <D:ace>
///     <D:principal><D:href>principals/users/alice</D:href></D:principal>
///     <D:grant><D:privilege><D:read/></D:privilege></D:grant>
///     <D:protected/>
///   </D:ace>
/// </D:acl>
/// ```
#[must_use]
pub fn acl_xml(aces: &[Ace]) -> String {
    let mut xml = String::from(r#"<D:acl xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">"#);

    for ace in aces {
        xml.push_str("\n  <D:ace>");

        xml.push_str("\n    <D:principal>");
        match &ace.principal {
            Principal::Href(href) => {
                write!(xml, "<D:href>{}</D:href>", xml_escape(href)).unwrap_or_log();
            }
            Principal::All => xml.push_str("<D:all/>"),
            Principal::Authenticated => xml.push_str("<D:authenticated/>"),
            Principal::Unauthenticated => xml.push_str("<D:unauthenticated/>"),
        }
        xml.push_str("</D:principal>");

        write!(
            xml,
            "\n    <D:grant>{}</D:grant>",
            privilege_element(ace.privilege)
        )
        .unwrap_or_log();

        if ace.protected {
            xml.push_str("\n    <D:protected/>");
        }

        xml.push_str("\n  </D:ace>");
    }

    xml.push_str("\n</D:acl>");
    xml
}

/// ## Summary
/// Escape XML special characters for safe embedding in XML attributes/text.
///
/// ## Side Effects
///
/// None - pure function.
pub(crate) fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
