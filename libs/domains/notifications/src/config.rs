use core_config::{env_list, ConfigError, FromEnv};

/// Who receives feedback mail.
#[derive(Clone, Debug, Default)]
pub struct FeedbackConfig {
    pub admin_emails: Vec<String>,
}

impl FeedbackConfig {
    pub fn new(admin_emails: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            admin_emails: admin_emails.into_iter().map(Into::into).collect(),
        }
    }
}

impl FromEnv for FeedbackConfig {
    /// ADMIN_EMAILS: comma separated list; empty means only the visitor is
    /// mailed.
    fn from_env() -> Result<Self, ConfigError> {
        let admin_emails = env_list("ADMIN_EMAILS");
        if admin_emails.is_empty() {
            tracing::warn!("ADMIN_EMAILS is empty, feedback will not reach any admin");
        }
        Ok(Self { admin_emails })
    }
}
