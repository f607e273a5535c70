//! src/email/mod.rs
use crate::configuration::{EmailSettings, EmailTransport};
use crate::domain::Employee;

mod birthday;
pub use birthday::BirthdayEmail;

pub mod brevo;
pub use brevo::Brevo;

mod smtp;
pub use smtp::Smtp;

#[derive(thiserror::Error, Debug)]
pub enum MailerSetupError {
    #[error("Missing email setting EMAIL_CLIENT_{0}")]
    Missing(&'static str),
    #[error("Invalid sender address")]
    Sender(#[source] lettre::address::AddressError),
    #[error("Failed to configure the SMTP relay")]
    Relay(#[source] lettre::transport::smtp::Error),
    #[error("Failed to build the HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum NotificationError {
    #[error("Brevo did not accept the email")]
    Brevo(#[from] reqwest::Error),
    #[error("Invalid recipient address {0}")]
    Address(String, #[source] lettre::address::AddressError),
    #[error("Failed to build the email")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP delivery failed")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// The outbound notification channel.
pub enum Mailer {
    Brevo(Brevo),
    Smtp(Smtp),
}

impl Mailer {
    pub fn from_settings(settings: &EmailSettings) -> Result<Self, MailerSetupError> {
        match settings.transport {
            EmailTransport::Brevo => Ok(Mailer::Brevo(Brevo::from_settings(settings)?)),
            EmailTransport::Smtp => Ok(Mailer::Smtp(Smtp::from_settings(settings)?)),
        }
    }

    fn sender_name(&self) -> &str {
        match self {
            Mailer::Brevo(brevo) => brevo.sender_name(),
            Mailer::Smtp(smtp) => smtp.sender_name(),
        }
    }

    #[tracing::instrument(
        name = "Sending a birthday email",
        skip(self, employee),
        fields(employee_email = %employee.email)
    )]
    pub async fn send_birthday_email(&self, employee: &Employee) -> Result<(), NotificationError> {
        let birthday_email = BirthdayEmail::new(&employee.name, self.sender_name());

        match self {
            Mailer::Brevo(brevo) => {
                let email = brevo
                    .email_builder()
                    .to(brevo::Contact {
                        name: employee.name.as_ref(),
                        email: employee.email.as_ref(),
                    })
                    .subject(&birthday_email.subject)
                    .html_content(&birthday_email.html_content)
                    .build();

                brevo.send_email(&email).await?;
            }
            Mailer::Smtp(smtp) => {
                smtp.send_email(
                    employee.name.as_ref(),
                    employee.email.as_ref(),
                    &birthday_email.subject,
                    &birthday_email.html_content,
                )
                .await?;
            }
        }

        Ok(())
    }
}
