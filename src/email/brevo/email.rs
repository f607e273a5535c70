//! src/email/brevo/email.rs
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Contact<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

/// Request body of Brevo's transactional email endpoint.
#[derive(Debug, Serialize)]
pub struct Email<'a> {
    sender: Contact<'a>,
    pub to: Vec<Contact<'a>>,
    pub subject: &'a str,
    #[serde(rename = "htmlContent")]
    pub html_content: &'a str,
}

pub struct EmailBuilder<'a> {
    sender: Contact<'a>,
    to: Vec<Contact<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

impl<'a> EmailBuilder<'a> {
    pub fn new(sender: Contact<'a>) -> Self {
        Self {
            sender,
            to: vec![],
            subject: "",
            html_content: "",
        }
    }

    pub fn to(mut self, contact: Contact<'a>) -> Self {
        self.to.push(contact);
        self
    }

    pub fn subject(mut self, subject: &'a str) -> Self {
        self.subject = subject;
        self
    }

    pub fn html_content(mut self, html_content: &'a str) -> Self {
        self.html_content = html_content;
        self
    }

    pub fn build(self) -> Email<'a> {
        Email {
            sender: self.sender,
            to: self.to,
            subject: self.subject,
            html_content: self.html_content,
        }
    }
}

#[derive(Debug)]
pub struct EmailClient {
    pub http_client: Client,
    pub url: String,
    pub api_key: Secret<String>,
}

impl EmailClient {
    pub async fn send_email<T>(&self, email: &T) -> Result<reqwest::Response, reqwest::Error>
    where
        T: Serialize,
    {
        let res = self
            .http_client
            .post(&self.url)
            .header("api-key", self.api_key.expose_secret())
            .header("accept", "application/json")
            .header("content-type", "application/json")
            .json(&email)
            .send()
            .await?
            .error_for_status()?;

        Ok(res)
    }
}
