//! src/email/birthday.rs
use crate::domain::EmployeeName;

/// The greeting sent to one employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayEmail {
    pub subject: String,
    pub html_content: String,
}

impl BirthdayEmail {
    pub fn new(recipient: &EmployeeName, sender_name: &str) -> Self {
        let name = htmlescape::encode_minimal(recipient.as_ref());
        let sender_name = htmlescape::encode_minimal(sender_name);

        let subject = format!("🎂 Happy Birthday from the Team, {}!", recipient);
        let html_content = format!(
            r#"<html>
  <body style="font-family: sans-serif; background-color: #e6f7ff; padding: 20px;">
    <div style="max-width: 600px; margin: auto; background: #ffffff; padding: 25px; border-radius: 10px; border-left: 5px solid #0078d4;">
      <h1 style="color: #0078d4; text-align: center;">🎉 Happy Birthday, {name}! 🎉</h1>
      <p style="font-size: 16px; color: #333;">
        Wishing you a wonderful and joyful birthday!
      </p>
      <p style="font-size: 14px; color: #777; text-align: right; margin-top: 40px;">
        Best Regards,<br>
        {sender_name}
      </p>
    </div>
  </body>
</html>"#
        );

        Self {
            subject,
            html_content,
        }
    }
}
