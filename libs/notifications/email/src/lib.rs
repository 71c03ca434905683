//! Outbound email for the doorshop services
//!
//! ## Components
//!
//! - **Models**: [`Email`] message
//! - **Providers**: [`SmtpProvider`] (lettre) and [`MockSmtpProvider`] for tests
//! - **Templates**: Handlebars-based [`TemplateEngine`] with the feedback forms
//!
//! ```ignore
//! use email::{EmailProvider, SmtpConfig, SmtpProvider, TemplateEngine, templates};
//!
//! let provider = SmtpProvider::new(SmtpConfig::from_env()?)?;
//! let engine = TemplateEngine::new()?;
//! let rendered = engine.render(templates::COMMON_TO_USER, &serde_json::json!({"name": "Ann"}))?;
//! provider.send(&rendered.into_email("ann@example.com")).await?;
//! ```

pub mod models;
pub mod provider;
pub mod templates;

pub use models::Email;
pub use provider::{EmailProvider, MockSmtpProvider, SendResult, SmtpConfig, SmtpProvider};
pub use templates::{EmailTemplate, RenderedTemplate, TemplateEngine};
