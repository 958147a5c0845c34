//! SMTP mail transport.

use anyhow::Context;
use kunai_core::config::{SmtpConfig, SmtpSecurity};
use mail_builder::MessageBuilder;
use mail_builder::headers::HeaderType;
use mail_builder::headers::content_type::ContentType;
use mail_builder::mime::{BodyPart, MimePart};
use mail_send::smtp::message::Message;
use mail_send::{SmtpClient, SmtpClientBuilder};
use tokio::io::{AsyncRead, AsyncWrite};

use super::transport::{MailTransport, OutboundMail};

/// Submits each message over its own SMTP connection.
#[derive(Debug, Clone)]
pub struct SmtpTransport {
    config: SmtpConfig,
}

impl SmtpTransport {
    #[must_use]
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn client_builder(&self) -> SmtpClientBuilder<String> {
        let builder = SmtpClientBuilder::new(self.config.host.clone(), self.config.port)
            .implicit_tls(self.config.security == SmtpSecurity::Implicit)
            .timeout(self.config.timeout());

        match self.config.credentials() {
            Some((user, pass)) => builder.credentials((user.to_string(), pass.to_string())),
            None => builder,
        }
    }
}

/// Splits `type/subtype; key=value; ...` into a `mail-builder` content type.
fn content_type(header: Option<&str>) -> ContentType<'_> {
    let mut parts = header.unwrap_or("text/calendar").split(';').map(str::trim);
    let mut content_type = ContentType::new(parts.next().unwrap_or("text/calendar"));
    for (key, value) in parts.filter_map(|p| p.split_once('=')) {
        content_type = content_type.attribute(key.trim(), value.trim().trim_matches('"'));
    }
    content_type
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\r', '\n'])
}

/// ## Summary
/// Renders an outbound mail as an RFC 5322 message.
///
/// `From` becomes the envelope sender; `Content-Type` describes the body
/// part. Other headers are copied as text.
///
/// ## Errors
/// Returns an error if the message has no `From` header, if the recipient,
/// subject or a header value contains a line break, or if the message cannot
/// be written.
pub fn build_message(mail: &OutboundMail) -> anyhow::Result<(String, Vec<u8>)> {
    let from = mail
        .header("From")
        .context("outbound mail has no From header")?;

    if has_line_break(&mail.to) || has_line_break(&mail.subject) {
        anyhow::bail!("line break in recipient or subject of mail to {:?}", mail.to);
    }
    if let Some(header) = mail.headers.iter().find(|h| has_line_break(&h.name) || has_line_break(&h.value)) {
        anyhow::bail!("line break in {:?} header", header.name);
    }

    let mut builder = MessageBuilder::new()
        .from(from)
        .to(mail.to.as_str())
        .subject(mail.subject.as_str());

    for header in &mail.headers {
        if header.name.eq_ignore_ascii_case("From") || header.name.eq_ignore_ascii_case("Content-Type") {
            continue;
        }
        builder = builder.header(header.name.as_str(), HeaderType::Text(header.value.as_str().into()));
    }

    let bytes = builder
        .body(MimePart::new(
            content_type(mail.header("Content-Type")),
            BodyPart::Text(mail.body.as_str().into()),
        ))
        .write_to_vec()
        .context("failed to render message")?;

    Ok((from.to_string(), bytes))
}

async fn submit<T>(mut client: SmtpClient<T>, message: Message<'_>) -> mail_send::Result<()>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    client.send(message).await?;
    client.quit().await
}

impl MailTransport for SmtpTransport {
    #[tracing::instrument(skip(self, mail), fields(to = %mail.to, host = %self.config.host))]
    async fn send(&self, mail: &OutboundMail) -> anyhow::Result<()> {
        let (from, bytes) = build_message(mail)?;
        let message = Message::new(from.as_str(), [mail.to.as_str()], bytes);
        let builder = self.client_builder();

        let submitted = match self.config.security {
            SmtpSecurity::Implicit | SmtpSecurity::StartTls => {
                let client = builder.connect().await.context("SMTP connect failed")?;
                submit(client, message).await
            }
            SmtpSecurity::None => {
                let client = builder.connect_plain().await.context("SMTP connect failed")?;
                submit(client, message).await
            }
        };
        submitted.context("SMTP submission failed")?;

        tracing::debug!("Message submitted");
        Ok(())
    }
}
