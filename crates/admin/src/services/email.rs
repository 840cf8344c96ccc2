//! Email service for sending credentials and notifications.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::MultiPart,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use washboard_core::Email;

use crate::config::EmailConfig;

/// HTML template for the SAAS admin credentials email.
#[derive(Template)]
#[template(path = "email/credentials.html")]
struct CredentialsEmailHtml<'a> {
    first_name: &'a str,
    username: &'a str,
    password: &'a str,
    login_url: &'a str,
}

/// Plain text template for the SAAS admin credentials email.
#[derive(Template)]
#[template(path = "email/credentials.txt")]
struct CredentialsEmailText<'a> {
    first_name: &'a str,
    username: &'a str,
    password: &'a str,
    login_url: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_owned(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send login credentials to a newly created SAAS admin.
    ///
    /// # Errors
    ///
    /// Returns error if a template fails to render, the message cannot be
    /// built, or delivery fails.
    pub async fn send_saas_admin_credentials(
        &self,
        to: &Email,
        first_name: &str,
        username: &str,
        password: &str,
        login_url: &str,
    ) -> Result<(), EmailError> {
        let html = CredentialsEmailHtml {
            first_name,
            username,
            password,
            login_url,
        }
        .render()?;
        let text = CredentialsEmailText {
            first_name,
            username,
            password,
            login_url,
        }
        .render()?;

        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject("Your Washboard admin credentials")
            .multipart(MultiPart::alternative_plain_html(text, html))?;

        self.mailer.send(message).await?;
        Ok(())
    }
}

impl std::fmt::Debug for EmailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailService")
            .field("from_address", &self.from_address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_templates_render_inputs() {
        let html = CredentialsEmailHtml {
            first_name: "Asha",
            username: "asha.verma",
            password: "tmp-Passw0rd!",
            login_url: "https://admin.washboardhq.example/login",
        }
        .render()
        .unwrap();
        assert!(html.contains("Asha"));
        assert!(html.contains("asha.verma"));
        assert!(html.contains("tmp-Passw0rd!"));

        let text = CredentialsEmailText {
            first_name: "Asha",
            username: "asha.verma",
            password: "tmp-Passw0rd!",
            login_url: "https://admin.washboardhq.example/login",
        }
        .render()
        .unwrap();
        assert!(text.contains("https://admin.washboardhq.example/login"));
    }
}
