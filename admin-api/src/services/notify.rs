use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use ecom_config::SmtpConfig;

/// Outbound notification seam for password-reset codes. Delivery is
/// best-effort; callers log failures and carry on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_reset_code(&self, to: &str, code: &str) -> Result<()>;
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .context("Failed to build SMTP transport")?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_reset_code(&self, to: &str, code: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.from.parse().context("Invalid sender address")?)
            .to(to.parse().context("Invalid recipient address")?)
            .subject("Reset Password")
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "Your password reset code is {code}. It expires shortly; \
                 ignore this mail if you did not request a reset."
            ))
            .context("Failed to build reset mail")?;

        self.transport
            .send(message)
            .await
            .context("Failed to send reset mail")?;

        Ok(())
    }
}

/// Fallback when no SMTP settings are configured: the code only reaches the
/// service log. Also used by the test suites.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_reset_code(&self, to: &str, code: &str) -> Result<()> {
        tracing::info!("password reset code for {to}: {code}");
        Ok(())
    }
}
