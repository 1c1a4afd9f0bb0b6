pub mod email;
pub mod sms;

use crate::core::errors::DivvyError;
use crate::core::models::User;
use async_trait::async_trait;

/// Who a notification goes to. Each channel picks the contact field it
/// knows how to reach and skips recipients without one.
#[derive(Clone, Debug)]
pub struct Recipient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<&User> for Recipient {
    fn from(user: &User) -> Self {
        Recipient {
            name: user.name.clone(),
            email: Some(user.email.clone()),
            phone: user.phone.clone(),
        }
    }
}

/// One delivery channel. Best-effort: the only feedback surfaced to the
/// caller is how many recipients the channel accepted.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn channel(&self) -> &'static str;
    async fn notify(
        &self,
        recipients: &[Recipient],
        subject: &str,
        body: &str,
    ) -> Result<usize, DivvyError>;
}
