//! src/email/brevo/mod.rs
use crate::configuration::EmailSettings;
use crate::email::MailerSetupError;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

mod email;
pub use email::{Contact, Email, EmailBuilder, EmailClient};

#[derive(Debug)]
pub struct Brevo {
    sender_name: String,
    sender_email: String,
    email_client: EmailClient,
}

impl Brevo {
    pub fn from_settings(settings: &EmailSettings) -> Result<Self, MailerSetupError> {
        let url = settings
            .api_url
            .clone()
            .ok_or(MailerSetupError::Missing("API_URL"))?;
        let api_key = settings
            .api_key
            .clone()
            .ok_or(MailerSetupError::Missing("API_KEY"))?;

        let email_client = EmailClient {
            http_client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .map_err(MailerSetupError::HttpClient)?,
            url,
            api_key,
        };

        Ok(Self::new(
            settings.sender_name.clone(),
            settings.sender_email.clone(),
            email_client,
        ))
    }

    fn new(sender_name: String, sender_email: String, email_client: EmailClient) -> Self {
        Self {
            sender_name,
            sender_email,
            email_client,
        }
    }

    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    pub fn email_builder(&self) -> EmailBuilder<'_> {
        EmailBuilder::new(Contact {
            name: &self.sender_name,
            email: &self.sender_email,
        })
    }

    pub async fn send_email<T>(&self, email: &T) -> Result<(), reqwest::Error>
    where
        T: Serialize,
    {
        self.email_client.send_email(email).await?;
        Ok(())
    }
}
