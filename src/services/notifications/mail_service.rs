//! Transactional email delivery over SMTP.
//!
//! Templates are compiled into the binary and filled with simple
//! `{{placeholder}}` substitution. Sends run on the blocking pool so SMTP
//! latency never stalls a request handler.

use lettre::{
    Message, SmtpTransport, Transport, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use singleton_macro::service;

use crate::config::{EmailConfig, FrontendConfig};
use crate::errors::errors::AppError;

const VERIFY_EMAIL_TEMPLATE: &str = include_str!("templates/verify_email.html");
const RESET_PIN_TEMPLATE: &str = include_str!("templates/reset_pin.html");
const SET_PASSWORD_TEMPLATE: &str = include_str!("templates/set_password.html");

#[service(name = "mail")]
pub struct MailService {
    // Transport is built per send; SMTP connections are not pooled.
}

impl MailService {
    pub async fn send_verification_email(
        &self,
        to: &str,
        first_name: &str,
        token: &str,
    ) -> Result<(), AppError> {
        let link = format!("{}/verify-email?token={}", FrontendConfig::student_base_url(), token);
        let body = render(VERIFY_EMAIL_TEMPLATE, &[("first_name", first_name), ("verification_link", &link)]);

        self.send(to, "Verify your LearnSphere email", body).await
    }

    pub async fn send_reset_pin_email(
        &self,
        to: &str,
        first_name: &str,
        pin: &str,
    ) -> Result<(), AppError> {
        let body = render(RESET_PIN_TEMPLATE, &[("first_name", first_name), ("pin", pin)]);

        self.send(to, "Your password reset PIN", body).await
    }

    pub async fn send_set_password_email(
        &self,
        to: &str,
        first_name: &str,
        role_label: &str,
        token: &str,
    ) -> Result<(), AppError> {
        let link = format!("{}/set-password?token={}", FrontendConfig::admin_base_url(), token);
        let body = render(
            SET_PASSWORD_TEMPLATE,
            &[
                ("first_name", first_name),
                ("role", role_label),
                ("set_password_link", &link),
            ],
        );

        let subject = format!("Your LearnSphere {} account", role_label);
        self.send(to, &subject, body).await
    }

    async fn send(&self, to: &str, subject: &str, html_body: String) -> Result<(), AppError> {
        let email = Message::builder()
            .from(
                EmailConfig::from_address()
                    .parse()
                    .map_err(|e| AppError::InternalError(format!("Invalid from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::ValidationError(format!("Invalid recipient address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .map_err(|e| AppError::InternalError(format!("Failed to build email: {}", e)))?;

        let recipient = to.to_string();

        tokio::task::spawn_blocking(move || {
            let credentials =
                Credentials::new(EmailConfig::username(), EmailConfig::password());

            let mailer = SmtpTransport::relay(&EmailConfig::smtp_server())
                .map_err(|e| {
                    AppError::ExternalServiceError(format!("SMTP transport failed: {}", e))
                })?
                .port(EmailConfig::smtp_port())
                .credentials(credentials)
                .build();

            mailer.send(&email).map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to send email: {}", e))
            })?;

            Ok::<(), AppError>(())
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Mail task panicked: {}", e)))??;

        log::info!("email sent to {}: {}", recipient, subject);

        Ok(())
    }
}

/// `{{key}}` substitution. Unknown placeholders are left untouched.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{{{}}}}}", key), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_placeholders() {
        let out = render("Hello {{name}}, pin {{pin}}", &[("name", "Ada"), ("pin", "042137")]);
        assert_eq!(out, "Hello Ada, pin 042137");
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        let out = render("Hi {{name}} {{other}}", &[("name", "Ada")]);
        assert_eq!(out, "Hi Ada {{other}}");
    }

    #[test]
    fn templates_carry_their_placeholders() {
        assert!(VERIFY_EMAIL_TEMPLATE.contains("{{verification_link}}"));
        assert!(RESET_PIN_TEMPLATE.contains("{{pin}}"));
        assert!(SET_PASSWORD_TEMPLATE.contains("{{set_password_link}}"));
    }
}
