use crate::core::errors::DivvyError;
use crate::infrastructure::notify::{Notifier, Recipient};
use async_trait::async_trait;
use tracing::info;

/// SMS delivery stub. Counts recipients with a phone number and logs the
/// message that would go out.
// TODO: wire to an SMS gateway once one is provisioned.
#[derive(Default)]
pub struct SmsNotifier;

impl SmsNotifier {
    pub fn new() -> Self {
        SmsNotifier
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    fn channel(&self) -> &'static str {
        "sms"
    }

    async fn notify(
        &self,
        recipients: &[Recipient],
        _subject: &str,
        body: &str,
    ) -> Result<usize, DivvyError> {
        let mut delivered = 0;
        for recipient in recipients {
            let Some(phone) = recipient.phone.as_deref() else {
                continue;
            };
            let preview: String = body.chars().take(50).collect();
            info!(to = %phone, message = %preview, "sms stub, would send");
            delivered += 1;
        }
        Ok(delivered)
    }
}
