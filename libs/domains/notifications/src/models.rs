use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Contact form
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CommonFeedback {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 3, max = 32))]
    pub phone: String,
}

/// Order request for a specific door and article
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderFeedback {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 3, max = 32))]
    pub phone: String,
    #[validate(length(min = 1, max = 255))]
    pub door_title: String,
    #[validate(length(min = 1, max = 255))]
    pub article_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackResponse {
    pub success: bool,
}
