//! iMIP: delivery of iTIP scheduling messages by e-mail (RFC 6047).
//!
//! Each recipient gets its own message. A failure for one recipient never
//! stops delivery to the others; every attempt is recorded in the returned
//! [`DeliveryReport`].

use std::time::Duration;

use kunai_core::config::ServerConfig;
use kunai_core::constants::{ICALENDAR_CONTENT_TYPE, VERSION_HEADER};
use kunai_rfc::rfc::ical::build::serialize;
use kunai_rfc::rfc::ical::core::ICalendar;
use kunai_rfc::rfc::ical::itip::{ItipMessage, Method};
use tokio_util::sync::CancellationToken;

use super::transport::{MailHeader, MailTransport, OutboundMail};
use crate::error::{ServiceError, ServiceResult};

/// Bound on a single transport call unless configured otherwise.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether outgoing mail discloses the server version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionExposure {
    #[default]
    Hidden,
    Exposed(String),
}

impl VersionExposure {
    /// The version header to add, if any.
    #[must_use]
    pub fn header(&self) -> Option<MailHeader> {
        match self {
            Self::Hidden => None,
            Self::Exposed(version) => Some(MailHeader::new(VERSION_HEADER, version.clone())),
        }
    }
}

impl From<&ServerConfig> for VersionExposure {
    fn from(config: &ServerConfig) -> Self {
        config
            .exposed_version()
            .map_or(Self::Hidden, |v| Self::Exposed(v.to_string()))
    }
}

/// What happened to one recipient.
#[derive(Debug)]
pub enum DeliveryStatus {
    Sent,
    /// The transport failed or timed out; the error is kept as raised.
    Failed(ServiceError),
    /// The address cannot be reached by e-mail.
    Skipped(String),
    /// Cancellation fired before the message went out.
    Cancelled,
}

impl DeliveryStatus {
    /// ## Summary
    /// Returns the RFC 6638 `SCHEDULE-STATUS` code for this outcome.
    ///
    /// RFC 6638 has no code for a delivery abandoned by the caller, so
    /// `Cancelled` reports `5.1` (could not complete delivery).
    #[must_use]
    pub const fn schedule_status(&self) -> &'static str {
        match self {
            Self::Sent => "1.1",
            Self::Skipped(_) => "3.7",
            Self::Failed(_) | Self::Cancelled => "5.1",
        }
    }
}

#[derive(Debug)]
pub struct RecipientOutcome {
    /// The recipient as given by the caller.
    pub recipient: String,
    pub status: DeliveryStatus,
}

/// Per-recipient results of one dispatch, in recipient order.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    outcomes: Vec<RecipientOutcome>,
}

impl DeliveryReport {
    #[must_use]
    pub fn outcomes(&self) -> &[RecipientOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn into_outcomes(self) -> Vec<RecipientOutcome> {
        self.outcomes
    }

    /// Number of recipients the transport accepted a message for.
    #[must_use]
    pub fn sent(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, DeliveryStatus::Sent))
            .count()
    }

    /// True when no recipient failed or was cancelled.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| matches!(o.status, DeliveryStatus::Sent | DeliveryStatus::Skipped(_)))
    }

    /// ## Summary
    /// Collapses the report into the first transport failure.
    ///
    /// ## Errors
    /// Returns the first `Failed` error unchanged.
    pub fn into_result(self) -> ServiceResult<()> {
        self.outcomes
            .into_iter()
            .find_map(|o| match o.status {
                DeliveryStatus::Failed(err) => Some(err),
                _ => None,
            })
            .map_or(Ok(()), Err)
    }
}

/// Sends scheduling messages through a [`MailTransport`].
#[derive(Debug)]
pub struct ImipDispatcher<T> {
    transport: T,
    sender: String,
    version: VersionExposure,
    timeout: Duration,
}

impl<T: MailTransport> ImipDispatcher<T> {
    /// ## Summary
    /// Creates a dispatcher sending as `sender` (the `From:` address).
    #[must_use]
    pub fn new(transport: T, sender: impl Into<String>, version: VersionExposure) -> Self {
        Self {
            transport,
            sender: sender.into(),
            version,
            timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Bounds each transport call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// ## Summary
    /// Sends `calendar` to every recipient, one message each.
    ///
    /// ## Side Effects
    /// One transport call per deliverable recipient.
    pub async fn send_message(
        &self,
        originator: &str,
        recipients: &[String],
        calendar: &ICalendar,
    ) -> DeliveryReport {
        self.send_message_with_cancel(originator, recipients, calendar, &CancellationToken::new())
            .await
    }

    /// Sends an [`ItipMessage`] produced by the scheduling engine.
    pub async fn deliver(&self, message: &ItipMessage) -> DeliveryReport {
        self.send_message(&message.originator, &message.recipients, &message.message)
            .await
    }

    /// ## Summary
    /// Like [`Self::send_message`], stopping when `cancel` fires.
    ///
    /// Recipients not yet attempted, and an in-flight attempt, are reported
    /// as `Cancelled`.
    ///
    /// ## Side Effects
    /// One transport call per deliverable recipient until cancelled.
    #[tracing::instrument(
        skip(self, recipients, calendar, cancel),
        fields(recipients = recipients.len())
    )]
    pub async fn send_message_with_cancel(
        &self,
        originator: &str,
        recipients: &[String],
        calendar: &ICalendar,
        cancel: &CancellationToken,
    ) -> DeliveryReport {
        let method = Method::of(calendar);
        let subject = subject(&method, calendar);
        let body = serialize(calendar);

        let mut headers = vec![
            MailHeader::new("Reply-To", single_line(strip_mailto(originator))),
            MailHeader::new("From", self.sender.clone()),
            MailHeader::new("Content-Type", content_type(&method)),
        ];
        headers.extend(self.version.header());

        tracing::debug!(%method, %subject, "Dispatching scheduling message");

        let mut report = DeliveryReport::default();
        for recipient in recipients {
            let status = if cancel.is_cancelled() {
                DeliveryStatus::Cancelled
            } else {
                match mail_address(recipient) {
                    Ok(to) => {
                        let mail = OutboundMail {
                            to: to.to_string(),
                            subject: subject.clone(),
                            body: body.clone(),
                            headers: headers.clone(),
                        };
                        self.send_one(&mail, cancel).await
                    }
                    Err(reason) => DeliveryStatus::Skipped(reason),
                }
            };

            match &status {
                DeliveryStatus::Sent => tracing::debug!(%recipient, "iMIP message sent"),
                DeliveryStatus::Failed(err) => {
                    tracing::warn!(%recipient, error = %err, "iMIP delivery failed");
                }
                DeliveryStatus::Skipped(reason) => {
                    tracing::warn!(%recipient, %reason, "iMIP recipient skipped");
                }
                DeliveryStatus::Cancelled => tracing::debug!(%recipient, "iMIP delivery cancelled"),
            }

            report.outcomes.push(RecipientOutcome {
                recipient: recipient.clone(),
                status,
            });
        }

        report
    }

    async fn send_one(&self, mail: &OutboundMail, cancel: &CancellationToken) -> DeliveryStatus {
        tokio::select! {
            biased;
            () = cancel.cancelled() => DeliveryStatus::Cancelled,
            result = tokio::time::timeout(self.timeout, self.transport.send(mail)) => match result {
                Ok(Ok(())) => DeliveryStatus::Sent,
                Ok(Err(err)) => DeliveryStatus::Failed(ServiceError::Backend(err)),
                Err(_elapsed) => DeliveryStatus::Failed(ServiceError::Timeout(self.timeout)),
            },
        }
    }
}

/// Removes a leading `mailto:` (any case).
fn strip_mailto(address: &str) -> &str {
    let address = address.trim();
    match address.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("mailto:") => &address[7..],
        _ => address,
    }
}

/// Resolves a calendar-user address to an e-mail address.
fn mail_address(recipient: &str) -> Result<&str, String> {
    let address = strip_mailto(recipient);
    if address.is_empty() {
        return Err("empty recipient address".into());
    }
    if address.contains(':') {
        return Err(format!("{recipient} is not a mailto: address"));
    }
    if address.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(format!("{recipient:?} contains whitespace or control characters"));
    }
    Ok(address)
}

/// Replaces control characters (CR and LF included) with spaces so the
/// value stays on one header line.
fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn subject(method: &Method, calendar: &ICalendar) -> String {
    let summary = calendar.event_summary().map(|s| single_line(&s));
    let with_summary = |prefix: &str| {
        summary
            .as_deref()
            .map_or_else(|| "Scheduling message".to_string(), |s| format!("{prefix}: {s}"))
    };

    match method {
        Method::Reply => with_summary("Response for"),
        Method::Request => with_summary("Invitation for"),
        Method::Cancel => with_summary("Cancelled event"),
        Method::Other(_) => "iTIP message".to_string(),
    }
}

/// Omits `method=` when the method is missing or not a valid token.
fn content_type(method: &Method) -> String {
    if method.is_token() {
        format!("{ICALENDAR_CONTENT_TYPE}; method={method}; charset=utf-8")
    } else {
        format!("{ICALENDAR_CONTENT_TYPE}; charset=utf-8")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use kunai_rfc::rfc::ical::core::{Component, Property};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<OutboundMail>>,
        fail_for: Option<&'static str>,
        delay: Option<Duration>,
    }

    impl MailTransport for Recorder {
        async fn send(&self, mail: &OutboundMail) -> anyhow::Result<()> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_for == Some(mail.to.as_str()) {
                anyhow::bail!("mailbox unavailable: {}", mail.to);
            }
            self.sent.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    fn calendar(method: Option<&str>, summary: Option<&str>) -> ICalendar {
        let mut ical = ICalendar::default();
        if let Some(m) = method {
            ical.set_method(m);
        }
        let mut event = Component::event();
        event.add_property(Property::text_value("UID", "sync-1@example.com"));
        if let Some(s) = summary {
            event.add_property(Property::text_value("SUMMARY", s));
        }
        ical.add_event(event);
        ical
    }

    fn recipients(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn subjects_by_method() {
        let cases = [
            ("REQUEST", "Invitation for: Team Sync"),
            ("reply", "Response for: Team Sync"),
            ("Cancel", "Cancelled event: Team Sync"),
            ("PUBLISH", "iTIP message"),
        ];
        for (method, expected) in cases {
            let ical = calendar(Some(method), Some("Team Sync"));
            assert_eq!(subject(&Method::of(&ical), &ical), expected);
        }

        let no_summary = calendar(Some("REQUEST"), None);
        assert_eq!(subject(&Method::Request, &no_summary), "Scheduling message");
        let blank_summary = calendar(Some("CANCEL"), Some("  "));
        assert_eq!(subject(&Method::Cancel, &blank_summary), "Scheduling message");
    }

    #[test]
    fn content_type_omits_missing_method() {
        assert_eq!(
            content_type(&Method::Request),
            "text/calendar; method=REQUEST; charset=utf-8"
        );
        assert_eq!(
            content_type(&Method::parse("counter")),
            "text/calendar; method=COUNTER; charset=utf-8"
        );
        assert_eq!(
            content_type(&Method::Other(String::new())),
            "text/calendar; charset=utf-8"
        );
        assert_eq!(
            content_type(&Method::parse("PUBLISH; charset=latin1")),
            "text/calendar; charset=utf-8"
        );
    }

    #[test]
    fn summary_newlines_stay_on_one_line() {
        let ical = calendar(Some("REQUEST"), Some("Team Sync\nBcc: victim@evil.example"));
        let subject = subject(&Method::Request, &ical);
        assert_eq!(subject, "Invitation for: Team Sync Bcc: victim@evil.example");
        assert!(!subject.contains(['\r', '\n']));
    }

    #[test]
    fn mailto_handling() {
        assert_eq!(strip_mailto("MAILTO:bob@example.com"), "bob@example.com");
        assert_eq!(strip_mailto("bob@example.com"), "bob@example.com");
        assert_eq!(mail_address(" mailto:bob@example.com "), Ok("bob@example.com"));
        assert!(mail_address("mailto:").is_err());
        assert!(mail_address("urn:uuid:1234").is_err());
        assert!(mail_address("mailto:bob@example.com\r\nBcc: x@example.com").is_err());
        assert!(mail_address("bob@example.com\tcc").is_err());
        assert_eq!(strip_mailto("mé"), "mé");
    }

    #[test_log::test(tokio::test)]
    async fn sends_one_message_per_recipient() {
        let dispatcher = ImipDispatcher::new(Recorder::default(), "calendar@example.com", VersionExposure::Hidden);
        let ical = calendar(Some("REQUEST"), Some("Team Sync"));
        let report = dispatcher
            .send_message(
                "mailto:alice@example.com",
                &recipients(&["mailto:bob@example.com", "carol@example.com"]),
                &ical,
            )
            .await;

        assert_eq!(report.sent(), 2);
        let sent = dispatcher.transport().sent.lock().unwrap();
        assert_eq!(sent[0].to, "bob@example.com");
        assert_eq!(sent[1].to, "carol@example.com");
        assert_eq!(sent[0].header("Reply-To"), Some("alice@example.com"));
        assert_eq!(sent[0].header("From"), Some("calendar@example.com"));
        assert_eq!(sent[0].header(VERSION_HEADER), None);
        assert_eq!(sent[0].body, serialize(&ical));
    }

    #[test_log::test(tokio::test)]
    async fn failure_does_not_stop_later_recipients() {
        let transport = Recorder {
            fail_for: Some("bob@example.com"),
            ..Recorder::default()
        };
        let dispatcher = ImipDispatcher::new(transport, "calendar@example.com", VersionExposure::Hidden);
        let report = dispatcher
            .send_message(
                "alice@example.com",
                &recipients(&["bob@example.com", "carol@example.com"]),
                &calendar(Some("REQUEST"), Some("Team Sync")),
            )
            .await;

        assert_eq!(report.sent(), 1);
        assert!(!report.is_success());
        assert_eq!(report.outcomes()[0].status.schedule_status(), "5.1");
        assert_eq!(report.outcomes()[1].status.schedule_status(), "1.1");

        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "mailbox unavailable: bob@example.com");
    }

    #[test_log::test(tokio::test)]
    async fn slow_transport_times_out() {
        let transport = Recorder {
            delay: Some(Duration::from_secs(5)),
            ..Recorder::default()
        };
        let dispatcher = ImipDispatcher::new(transport, "calendar@example.com", VersionExposure::Hidden)
            .with_timeout(Duration::from_millis(20));
        let report = dispatcher
            .send_message(
                "alice@example.com",
                &recipients(&["bob@example.com"]),
                &calendar(Some("REQUEST"), None),
            )
            .await;

        assert!(matches!(
            report.outcomes()[0].status,
            DeliveryStatus::Failed(ServiceError::Timeout(_))
        ));
    }

    #[test_log::test(tokio::test)]
    async fn cancelled_before_start() {
        let dispatcher = ImipDispatcher::new(Recorder::default(), "calendar@example.com", VersionExposure::Hidden);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = dispatcher
            .send_message_with_cancel(
                "alice@example.com",
                &recipients(&["bob@example.com", "carol@example.com"]),
                &calendar(Some("CANCEL"), Some("Team Sync")),
                &cancel,
            )
            .await;

        assert_eq!(report.sent(), 0);
        assert!(report
            .outcomes()
            .iter()
            .all(|o| o.status.schedule_status() == "5.1"));
        assert!(dispatcher.transport().sent.lock().unwrap().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn exposed_version_adds_header() {
        let dispatcher = ImipDispatcher::new(
            Recorder::default(),
            "calendar@example.com",
            VersionExposure::Exposed("1.2.3".into()),
        );
        dispatcher
            .send_message(
                "alice@example.com",
                &recipients(&["bob@example.com"]),
                &calendar(Some("REPLY"), Some("Team Sync")),
            )
            .await;

        let sent = dispatcher.transport().sent.lock().unwrap();
        assert_eq!(sent[0].header(VERSION_HEADER), Some("1.2.3"));
    }
}
