//! Sends an iTIP message from an `.ics` file over the configured SMTP relay.
//!
//! Usage: `kunai-send-itip <file.ics> <originator> <recipient>...`

use anyhow::{Context, bail};
use kunai_core::config::load_config;
use kunai_rfc::rfc::ical::parse::parse;
use kunai_service::caldav::schedule::{DeliveryStatus, ImipDispatcher, SmtpTransport, VersionExposure};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(path), Some(originator)) = (args.next(), args.next()) else {
        bail!("usage: kunai-send-itip <file.ics> <originator> <recipient>...");
    };
    let recipients: Vec<String> = args.collect();
    if recipients.is_empty() {
        bail!("at least one recipient is required");
    }

    let config = load_config()?;

    tracing::info!(
        sender = %config.mail.sender,
        host = %config.mail.smtp.host,
        port = config.mail.smtp.port,
        "Configuration loaded"
    );

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let input = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read {path}"))?;
    let calendar = parse(&input).with_context(|| format!("failed to parse {path}"))?;

    let dispatcher = ImipDispatcher::new(
        SmtpTransport::new(config.mail.smtp.clone()),
        config.mail.sender.clone(),
        VersionExposure::from(&config.server),
    )
    .with_timeout(config.mail.smtp.timeout());

    let report = dispatcher
        .send_message(&originator, &recipients, &calendar)
        .await;

    for outcome in report.outcomes() {
        match &outcome.status {
            DeliveryStatus::Failed(e) => {
                tracing::error!(recipient = %outcome.recipient, error = %e, "Delivery failed");
            }
            DeliveryStatus::Skipped(reason) => {
                tracing::warn!(recipient = %outcome.recipient, %reason, "Recipient skipped");
            }
            DeliveryStatus::Sent | DeliveryStatus::Cancelled => {}
        }
        println!("{};{}", outcome.recipient, outcome.status.schedule_status());
    }

    tracing::info!(sent = report.sent(), total = recipients.len(), "Dispatch finished");

    report.into_result()?;
    Ok(())
}
