use std::sync::Arc;

use email::templates::{COMMON_TO_ADMIN, COMMON_TO_USER, ORDER_TO_ADMIN, ORDER_TO_USER};
use email::{Email, EmailProvider, TemplateEngine};
use serde_json::{json, Value};
use tracing::instrument;

use crate::config::FeedbackConfig;
use crate::error::{FeedbackError, FeedbackResult};
use crate::models::{CommonFeedback, FeedbackResponse, OrderFeedback};

/// Sends feedback mail: one message per admin, then a confirmation to the
/// visitor. Delivery stops at the first failure.
#[derive(Clone)]
pub struct FeedbackService {
    provider: Arc<dyn EmailProvider>,
    templates: Arc<TemplateEngine>,
    config: FeedbackConfig,
}

impl FeedbackService {
    pub fn new(
        provider: Arc<dyn EmailProvider>,
        templates: TemplateEngine,
        config: FeedbackConfig,
    ) -> Self {
        Self {
            provider,
            templates: Arc::new(templates),
            config,
        }
    }

    #[instrument(skip(self, form), fields(provider = self.provider.name()))]
    pub async fn send_common(&self, form: CommonFeedback) -> FeedbackResult<FeedbackResponse> {
        let admin_data = json!({
            "name": form.name,
            "email": form.email,
            "phone": form.phone,
        });
        let user_data = json!({ "name": form.name });

        self.notify(COMMON_TO_ADMIN, &admin_data, COMMON_TO_USER, &user_data, &form.email)
            .await
    }

    #[instrument(skip(self, form), fields(provider = self.provider.name()))]
    pub async fn send_order(&self, form: OrderFeedback) -> FeedbackResult<FeedbackResponse> {
        let admin_data = json!({
            "name": form.name,
            "email": form.email,
            "phone": form.phone,
            "door_title": form.door_title,
            "article_title": form.article_title,
        });
        let user_data = json!({
            "name": form.name,
            "door_title": form.door_title,
            "article_title": form.article_title,
        });

        self.notify(ORDER_TO_ADMIN, &admin_data, ORDER_TO_USER, &user_data, &form.email)
            .await
    }

    async fn notify(
        &self,
        admin_template: &str,
        admin_data: &Value,
        user_template: &str,
        user_data: &Value,
        visitor: &str,
    ) -> FeedbackResult<FeedbackResponse> {
        for admin in &self.config.admin_emails {
            let email = self
                .render(admin_template, admin_data, admin)?
                .with_reply_to(visitor);
            self.deliver(&email).await?;
        }

        let confirmation = self.render(user_template, user_data, visitor)?;
        self.deliver(&confirmation).await?;

        tracing::info!(
            admins = self.config.admin_emails.len(),
            template = admin_template,
            "Feedback delivered"
        );
        Ok(FeedbackResponse { success: true })
    }

    fn render(&self, template: &str, data: &Value, to: &str) -> FeedbackResult<Email> {
        self.templates
            .render(template, data)
            .map(|rendered| rendered.into_email(to))
            .map_err(|e| FeedbackError::Template(e.to_string()))
    }

    async fn deliver(&self, email: &Email) -> FeedbackResult<()> {
        self.provider.send(email).await.map_err(|e| {
            tracing::warn!(to = %email.to, error = %e, "Email delivery failed");
            FeedbackError::Delivery {
                to: email.to.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(())
    }
}
