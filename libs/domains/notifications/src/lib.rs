//! Feedback forms: the storefront's contact and order requests are mailed
//! to every configured admin, then confirmed to the visitor.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod service;

pub use config::FeedbackConfig;
pub use error::{FeedbackError, FeedbackResult};
pub use handlers::ApiDoc;
pub use models::{CommonFeedback, FeedbackResponse, OrderFeedback};
pub use service::FeedbackService;
