//! Integration tests for the scheduling outbox.
//!
//! Tests:
//! - Fixed ACL for arbitrary owner strings
//! - ACL changes are always refused
//! - Supported privilege set and its XML rendering

use super::helpers::*;
use kunai_test::kunai_rfc::rfc::dav::core::Ace;
use kunai_test::kunai_service::auth::acl::acl_xml;
use kunai_test::kunai_service::auth::privilege::supported_privilege_set_xml;

#[test_log::test]
fn acl_has_two_protected_owner_entries() {
    for owner in ["", ALICE, "principals/users/j%C3%BCrgen%20m", "mailto:a@b"] {
        let acl = Outbox::new(owner).acl();
        assert_eq!(acl.len(), 2, "owner {owner:?}");
        assert!(acl.iter().all(|ace| ace.protected));
        assert!(acl.iter().all(|ace| ace.principal.href() == Some(owner)));
        assert_eq!(acl[0].privilege, Privilege::ScheduleQueryFreebusy);
        assert_eq!(acl[1].privilege, Privilege::Read);
    }
}

/// ## Summary
/// `set_acl` is refused whatever is submitted, and the ACL stays as it was.
#[test_log::test(tokio::test)]
async fn set_acl_is_always_denied() {
    let outbox = Outbox::new(ALICE);
    let before = outbox.acl();

    let empty = outbox.set_acl(&[]).await;
    assert!(matches!(empty, Err(ServiceError::PermissionDenied(_))));

    let entries = [
        Ace::new(Principal::All, Privilege::Read),
        Ace::protected(ALICE, Privilege::Write),
    ];
    let result = outbox.set_acl(&entries).await;
    let Err(err) = result else {
        panic!("ACL change was accepted");
    };
    assert_eq!(err.status(), 403);
    assert_eq!(outbox.acl(), before);
}

#[test_log::test]
fn freebusy_is_a_concrete_privilege_under_all() {
    let set = Outbox::new(ALICE).supported_privilege_set();
    let flat = set.flatten();

    let freebusy = &flat[&Privilege::ScheduleQueryFreebusy];
    assert!(!freebusy.is_abstract);
    assert_eq!(freebusy.concrete, Some(Privilege::ScheduleQueryFreebusy));
    assert!(flat[&Privilege::All].aggregates.contains(&Privilege::ScheduleQueryFreebusy));
    assert_eq!(flat[&Privilege::ReadAcl].concrete, Some(Privilege::Read));
}

#[test_log::test(tokio::test)]
async fn outbox_has_no_children() {
    let outbox = Outbox::new(ALICE);
    assert_eq!(outbox.name(), "outbox");
    assert_eq!(outbox.owner(), Some(ALICE));
    assert!(outbox.children().await.expect("Failed to list").is_empty());
    assert!(!outbox.child_exists("x.ics").await.expect("Failed to look up"));
}

#[test_log::test]
fn acl_properties_render_as_xml() {
    let outbox = Outbox::new(ALICE);

    let acl = acl_xml(&outbox.acl());
    assert_eq!(acl.matches("<D:ace>").count(), 2);
    assert_eq!(acl.matches("<D:protected/>").count(), 2);
    assert!(acl.contains("<C:schedule-query-freebusy/>"));
    assert!(acl.contains(&format!("<D:href>{ALICE}</D:href>")));

    let supported = supported_privilege_set_xml(&outbox.supported_privilege_set());
    assert!(supported.contains("<D:privilege><C:schedule-query-freebusy/></D:privilege>"));
    assert!(supported.contains("<D:privilege><D:all/></D:privilege>"));
}
