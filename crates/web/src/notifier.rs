//! Registration confirmation delivery.

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use storage::models::PaymentStatus;
use thiserror::Error;
use uuid::Uuid;

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("Delivery failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone)]
pub struct Confirmation {
    pub to: String,
    pub recipient_name: Option<String>,
    pub event_name: String,
    pub registration_id: Uuid,
    pub team_name: Option<String>,
    pub team_size: i32,
    pub payment_status: PaymentStatus,
}

impl Confirmation {
    fn subject(&self) -> String {
        format!("Registration confirmed: {}", self.event_name)
    }

    fn body(&self) -> String {
        let greeting = match &self.recipient_name {
            Some(name) => format!("Hi {name},"),
            None => "Hi,".to_string(),
        };
        let team = match &self.team_name {
            Some(name) => format!("Team: {name} ({} members)\n", self.team_size),
            None => String::new(),
        };

        format!(
            "{greeting}\n\nYou are registered for {}.\n\n\
             {team}Registration id: {}\nPayment status: {}\n\n\
             See you at the fest!\n",
            self.event_name,
            self.registration_id,
            self.payment_status.as_str(),
        )
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_confirmation(&self, confirmation: &Confirmation) -> Result<(), NotifyError>;
}

/// Sends confirmations through an SMTP relay (STARTTLS).
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::Transport(format!("SMTP relay error: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from = config
            .from
            .parse()
            .map_err(|e| NotifyError::InvalidAddress(format!("{}: {e}", config.from)))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_confirmation(&self, confirmation: &Confirmation) -> Result<(), NotifyError> {
        let to: Mailbox = confirmation
            .to
            .parse()
            .map_err(|e| NotifyError::InvalidAddress(format!("{}: {e}", confirmation.to)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(confirmation.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(confirmation.body())
            .map_err(|e| NotifyError::Message(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        tracing::info!(
            registration_id = %confirmation.registration_id,
            "Confirmation email sent"
        );
        Ok(())
    }
}

/// Used when no SMTP relay is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_confirmation(&self, confirmation: &Confirmation) -> Result<(), NotifyError> {
        tracing::info!(
            to = %confirmation.to,
            registration_id = %confirmation.registration_id,
            subject = %confirmation.subject(),
            "SMTP not configured, confirmation logged instead of sent"
        );
        Ok(())
    }
}
