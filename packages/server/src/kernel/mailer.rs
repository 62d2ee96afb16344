// SMTP implementation of BaseMailer

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use super::BaseMailer;
use crate::config::Config;

/// Sends mail through an authenticated SMTP relay
#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, username: &str, password: &str, from: &str) -> Result<Self> {
        let transport = SmtpTransport::relay(host)
            .with_context(|| format!("invalid SMTP relay {}", host))?
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();
        let from = from
            .parse()
            .with_context(|| format!("invalid sender address {}", from))?;

        Ok(Self { transport, from })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.smtp_host,
            config.smtp_port,
            &config.smtp_username,
            &config.smtp_password,
            &config.smtp_from,
        )
    }
}

#[async_trait]
impl BaseMailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse().with_context(|| format!("invalid recipient {}", to))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("failed to build email")?;

        // SmtpTransport blocks; keep it off the async workers
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .context("mail task panicked")?
            .context("SMTP send failed")?;

        info!(to = %to, subject = %subject, "email sent");
        Ok(())
    }
}
