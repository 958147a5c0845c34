//! Integration tests for iMIP dispatch.
//!
//! Tests:
//! - One message per recipient with method-specific subject and headers
//! - Generic subject for events without a summary
//! - Failure isolation, timeouts and cancellation
//! - Version header exposure
//! - Calendar text never adds mail header lines

use std::time::Duration;

use kunai_test::kunai_rfc::rfc::ical::itip::ItipMessage;
use kunai_test::kunai_service::caldav::schedule::smtp::build_message;
use tokio_util::sync::CancellationToken;

use super::helpers::*;

fn recipients(addresses: &[&str]) -> Vec<String> {
    addresses.iter().map(ToString::to_string).collect()
}

/// ## Summary
/// A REQUEST for "Team Sync" to two attendees produces two messages with the
/// invitation subject and the scheduling headers.
#[test_log::test(tokio::test)]
async fn request_is_sent_to_each_recipient() {
    let dispatcher = dispatcher();
    let calendar = calendar(fixtures::TEAM_SYNC_REQUEST);

    let report = dispatcher
        .send_message(
            "mailto:alice@example.com",
            &recipients(&["mailto:bob@example.com", "mailto:carol@example.com"]),
            &calendar,
        )
        .await;
    assert!(report.is_success());
    assert_eq!(report.sent(), 2);

    let sent = dispatcher.transport().sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "bob@example.com");
    assert_eq!(sent[1].to, "carol@example.com");

    for mail in &sent {
        assert_eq!(mail.subject, "Invitation for: Team Sync");
        assert_eq!(mail.header("Reply-To"), Some("alice@example.com"));
        assert_eq!(mail.header("From"), Some(SENDER));
        assert_eq!(
            mail.header("Content-Type"),
            Some("text/calendar; method=REQUEST; charset=utf-8")
        );
        assert_eq!(mail.header("X-Kunai-Version"), None);
        assert!(mail.body.contains("SUMMARY:Team Sync\r\n"));
        assert!(mail.body.starts_with("BEGIN:VCALENDAR\r\n"));
    }
}

#[test_log::test(tokio::test)]
async fn request_without_summary_uses_generic_subject() {
    let dispatcher = dispatcher();
    let calendar = calendar(fixtures::UNTITLED_REQUEST);

    let report = dispatcher
        .send_message(
            "mailto:alice@example.com",
            &recipients(&["mailto:bob@example.com"]),
            &calendar,
        )
        .await;
    assert!(report.is_success());

    let sent = dispatcher.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Scheduling message");
}

/// ## Summary
/// A rejected mailbox fails only its own delivery.
#[test_log::test(tokio::test)]
async fn failed_recipient_does_not_stop_the_rest() {
    let dispatcher = ImipDispatcher::new(
        RecordingTransport::new().rejecting("bob@example.com"),
        SENDER,
        VersionExposure::Hidden,
    );
    let calendar = calendar(fixtures::TEAM_SYNC_REQUEST);

    let report = dispatcher
        .send_message(
            "mailto:alice@example.com",
            &recipients(&[
                "mailto:bob@example.com",
                "urn:uuid:6f1c0f4e",
                "mailto:carol@example.com",
            ]),
            &calendar,
        )
        .await;

    let statuses: Vec<&str> = report
        .outcomes()
        .iter()
        .map(|o| o.status.schedule_status())
        .collect();
    assert_eq!(statuses, ["5.1", "3.7", "1.1"]);
    assert!(!report.is_success());
    assert_eq!(dispatcher.transport().sent().len(), 1);

    let err = report.into_result().expect_err("bob's failure should surface");
    assert!(err.to_string().contains("bob@example.com"));
}

#[test_log::test(tokio::test)]
async fn stalled_transport_times_out() {
    let dispatcher = ImipDispatcher::new(StalledTransport, SENDER, VersionExposure::Hidden)
        .with_timeout(Duration::from_millis(20));
    let calendar = calendar(fixtures::TEAM_SYNC_REQUEST);

    let report = dispatcher
        .send_message(
            "mailto:alice@example.com",
            &recipients(&["mailto:bob@example.com", "mailto:carol@example.com"]),
            &calendar,
        )
        .await;

    assert_eq!(report.outcomes().len(), 2);
    assert!(report.outcomes().iter().all(|o| matches!(
        o.status,
        DeliveryStatus::Failed(ServiceError::Timeout(_))
    )));
}

#[test_log::test(tokio::test)]
async fn cancelled_dispatch_sends_nothing() {
    let dispatcher = dispatcher();
    let calendar = calendar(fixtures::TEAM_SYNC_REQUEST);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = dispatcher
        .send_message_with_cancel(
            "mailto:alice@example.com",
            &recipients(&["mailto:bob@example.com", "mailto:carol@example.com"]),
            &calendar,
            &cancel,
        )
        .await;

    assert!(report
        .outcomes()
        .iter()
        .all(|o| matches!(o.status, DeliveryStatus::Cancelled)));
    assert!(dispatcher.transport().sent().is_empty());
}

#[test_log::test(tokio::test)]
async fn exposed_version_adds_header() {
    let dispatcher = ImipDispatcher::new(
        RecordingTransport::new(),
        SENDER,
        VersionExposure::Exposed("0.1.0".into()),
    );
    let message = ItipMessage::new(
        "mailto:alice@example.com",
        recipients(&["mailto:bob@example.com"]),
        calendar(fixtures::TEAM_SYNC_REQUEST),
    );

    let report = dispatcher.deliver(&message).await;
    assert!(report.is_success());

    let sent = dispatcher.transport().sent();
    assert_eq!(sent[0].header("X-Kunai-Version"), Some("0.1.0"));
}

/// ## Summary
/// An escaped line break in SUMMARY stays inside a single Subject line, and
/// the rendered message carries no header taken from calendar text.
#[test_log::test(tokio::test)]
async fn summary_line_breaks_do_not_add_headers() {
    let dispatcher = dispatcher();
    let calendar = calendar(fixtures::HEADER_INJECTION_REQUEST);

    let report = dispatcher
        .send_message(
            "mailto:alice@example.com",
            &recipients(&["mailto:bob@example.com"]),
            &calendar,
        )
        .await;
    assert!(report.is_success());

    let sent = dispatcher.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Invitation for: Team Sync Bcc: victim@evil.example");
    assert!(!sent[0].subject.contains(['\r', '\n']));

    let (_, bytes) = build_message(&sent[0]).expect("Failed to render message");
    let rendered = String::from_utf8(bytes).expect("message is UTF-8");
    assert!(!rendered.lines().any(|line| line.starts_with("Bcc:")));
}

/// ## Summary
/// Addresses with line breaks are skipped and a bad METHOD never reaches
/// the Content-Type parameters.
#[test_log::test(tokio::test)]
async fn hostile_addresses_and_method_are_contained() {
    let dispatcher = dispatcher();
    let mut calendar = calendar(fixtures::TEAM_SYNC_REQUEST);
    calendar.set_method("PUBLISH; boundary=x");

    let report = dispatcher
        .send_message(
            "mailto:alice@example.com\r\nBcc: victim@evil.example",
            &recipients(&[
                "mailto:bob@example.com\r\nBcc: victim@evil.example",
                "mailto:carol@example.com",
            ]),
            &calendar,
        )
        .await;

    let statuses: Vec<&str> = report
        .outcomes()
        .iter()
        .map(|o| o.status.schedule_status())
        .collect();
    assert_eq!(statuses, ["3.7", "1.1"]);

    let sent = dispatcher.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].header("Content-Type"), Some("text/calendar; charset=utf-8"));
    let reply_to = sent[0].header("Reply-To").expect("Reply-To is set");
    assert!(!reply_to.contains(['\r', '\n']));
    build_message(&sent[0]).expect("sanitized message renders");
}
