//! src/email/smtp.rs
use crate::configuration::EmailSettings;
use crate::email::{MailerSetupError, NotificationError};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

/// STARTTLS relay, e.g. Office 365 on port 587.
pub struct Smtp {
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Smtp {
    pub fn from_settings(settings: &EmailSettings) -> Result<Self, MailerSetupError> {
        let address: Address = settings
            .sender_email
            .parse()
            .map_err(MailerSetupError::Sender)?;
        let sender = Mailbox::new(Some(settings.sender_name.clone()), address);

        // Mailbox providers usually authenticate with the sending address.
        let username = settings
            .smtp_username
            .clone()
            .unwrap_or_else(|| settings.sender_email.clone());
        let password = settings
            .smtp_password
            .as_ref()
            .ok_or(MailerSetupError::Missing("SMTP_PASSWORD"))?;
        let credentials = Credentials::new(username, password.expose_secret().to_owned());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
            .map_err(MailerSetupError::Relay)?
            .port(settings.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self { sender, transport })
    }

    pub fn sender_name(&self) -> &str {
        self.sender.name.as_deref().unwrap_or_default()
    }

    pub async fn send_email(
        &self,
        to_name: &str,
        to_email: &str,
        subject: &str,
        html_content: &str,
    ) -> Result<(), NotificationError> {
        let message = self.message(to_name, to_email, subject, html_content)?;
        self.transport.send(message).await?;
        Ok(())
    }

    fn message(
        &self,
        to_name: &str,
        to_email: &str,
        subject: &str,
        html_content: &str,
    ) -> Result<Message, NotificationError> {
        let address: Address = to_email
            .parse()
            .map_err(|e| NotificationError::Address(to_email.to_string(), e))?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(Mailbox::new(Some(to_name.to_string()), address))
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_content.to_string())?;

        Ok(message)
    }
}
