//! `DAV:supported-privilege-set` generation (RFC 3744 §5.3).

use std::fmt::Write;

use kunai_rfc::rfc::dav::core::{Privilege, SupportedPrivilege};
use tracing_unwrap::ResultExt;

/// Renders `<D:privilege>` around a privilege element.
#[must_use]
pub fn privilege_element(privilege: Privilege) -> String {
    format!(
        "<D:privilege><{}/></D:privilege>",
        privilege.qname().prefixed()
    )
}

fn description(privilege: Privilege) -> &'static str {
    match privilege {
        Privilege::All => "All privileges",
        Privilege::Read => "Read resource content and properties",
        Privilege::ReadAcl => "Read access control list",
        Privilege::ReadCurrentUserPrivilegeSet => "Read current user privilege set",
        Privilege::Write => "Write resource content and properties",
        Privilege::WriteAcl => "Write access control list",
        Privilege::WriteProperties => "Write resource properties",
        Privilege::WriteContent => "Write resource content",
        Privilege::Bind => "Add child resources",
        Privilege::Unbind => "Remove child resources",
        Privilege::Unlock => "Unlock resources",
        Privilege::ScheduleQueryFreebusy => "Query free-busy information",
    }
}

/// ## Summary
/// Serializes a supported-privilege tree into a `DAV:supported-privilege-set`
/// element.
#[must_use]
pub fn supported_privilege_set_xml(set: &SupportedPrivilege) -> String {
    let mut xml = String::from(
        r#"<D:supported-privilege-set xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">"#,
    );
    write_supported_privilege(&mut xml, set, 1);
    xml.push_str("\n</D:supported-privilege-set>");
    xml
}

fn write_supported_privilege(xml: &mut String, node: &SupportedPrivilege, depth: usize) {
    let indent = "  ".repeat(depth);

    write!(xml, "\n{indent}<D:supported-privilege>").unwrap_or_log();
    write!(xml, "\n{indent}  {}", privilege_element(node.privilege)).unwrap_or_log();
    if node.is_abstract {
        write!(xml, "\n{indent}  <D:abstract/>").unwrap_or_log();
    }
    write!(
        xml,
        "\n{indent}  <D:description xml:lang=\"en\">{}</D:description>",
        description(node.privilege)
    )
    .unwrap_or_log();

    for child in &node.aggregates {
        write_supported_privilege(xml, child, depth + 1);
    }

    write!(xml, "\n{indent}</D:supported-privilege>").unwrap_or_log();
}
