//! Email templates rendered with Handlebars
//!
//! The engine ships with the four feedback forms. Subjects and text bodies
//! use `{{{raw}}}` output; HTML bodies escape. Variables:
//!
//! | template            | variables                                              |
//! |---------------------|--------------------------------------------------------|
//! | `common_to_admin`   | `name`, `email`, `phone`                               |
//! | `common_to_user`    | `name`                                                 |
//! | `order_to_admin`    | `name`, `email`, `phone`, `door_title`, `article_title` |
//! | `order_to_user`     | `name`, `door_title`, `article_title`                  |

use crate::models::Email;
use eyre::{eyre, Result};
use handlebars::Handlebars;
use serde_json::Value;
use std::collections::HashMap;

pub const COMMON_TO_ADMIN: &str = "common_to_admin";
pub const COMMON_TO_USER: &str = "common_to_user";
pub const ORDER_TO_ADMIN: &str = "order_to_admin";
pub const ORDER_TO_USER: &str = "order_to_user";

/// Rendered template result
#[derive(Debug, Clone)]
pub struct RenderedTemplate {
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
}

impl RenderedTemplate {
    pub fn into_email(self, to: impl Into<String>) -> Email {
        Email {
            body_text: self.body_text,
            body_html: self.body_html,
            ..Email::new(to, self.subject)
        }
    }
}

/// Email template definition
#[derive(Clone, Debug)]
pub struct EmailTemplate {
    pub name: String,
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
}

/// Handlebars-based template engine
///
/// Strict mode is on: a variable missing from the data is an error rather
/// than an empty string.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
    templates: HashMap<String, EmailTemplate>,
}

impl TemplateEngine {
    /// Create a new TemplateEngine with the feedback templates registered
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        let mut engine = Self {
            handlebars,
            templates: HashMap::new(),
        };
        engine.register_defaults()?;

        Ok(engine)
    }

    pub fn register(&mut self, template: EmailTemplate) -> Result<()> {
        self.handlebars
            .register_template_string(&format!("{}_subject", template.name), &template.subject)
            .map_err(|e| eyre!("Failed to register subject template: {}", e))?;

        if let Some(text) = &template.body_text {
            self.handlebars
                .register_template_string(&format!("{}_text", template.name), text)
                .map_err(|e| eyre!("Failed to register text template: {}", e))?;
        }

        if let Some(html) = &template.body_html {
            self.handlebars
                .register_template_string(&format!("{}_html", template.name), html)
                .map_err(|e| eyre!("Failed to register HTML template: {}", e))?;
        }

        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    pub fn render(&self, name: &str, data: &Value) -> Result<RenderedTemplate> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| eyre!("Template not found: {}", name))?;

        let subject = self
            .handlebars
            .render(&format!("{}_subject", name), data)
            .map_err(|e| eyre!("Failed to render subject: {}", e))?;

        let body_text = template
            .body_text
            .as_ref()
            .map(|_| {
                self.handlebars
                    .render(&format!("{}_text", name), data)
                    .map_err(|e| eyre!("Failed to render text: {}", e))
            })
            .transpose()?;

        let body_html = template
            .body_html
            .as_ref()
            .map(|_| {
                self.handlebars
                    .render(&format!("{}_html", name), data)
                    .map_err(|e| eyre!("Failed to render HTML: {}", e))
            })
            .transpose()?;

        Ok(RenderedTemplate {
            subject,
            body_text,
            body_html,
        })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    fn register_defaults(&mut self) -> Result<()> {
        self.register(EmailTemplate {
            name: COMMON_TO_ADMIN.to_string(),
            subject: "New feedback request from {{{name}}}".to_string(),
            body_text: Some(
                r#"A visitor submitted the feedback form.

Name: {{{name}}}
Email: {{{email}}}
Phone: {{{phone}}}
"#
                .to_string(),
            ),
            body_html: Some(
                r#"<h2>New feedback request</h2>
<ul>
  <li><b>Name:</b> {{name}}</li>
  <li><b>Email:</b> {{email}}</li>
  <li><b>Phone:</b> {{phone}}</li>
</ul>"#
                    .to_string(),
            ),
        })?;

        self.register(EmailTemplate {
            name: COMMON_TO_USER.to_string(),
            subject: "We received your request".to_string(),
            body_text: Some(
                r#"Hello {{{name}}},

Thank you for contacting us. A manager will get back to you shortly.
"#
                .to_string(),
            ),
            body_html: Some(
                r#"<p>Hello {{name}},</p>
<p>Thank you for contacting us. A manager will get back to you shortly.</p>"#
                    .to_string(),
            ),
        })?;

        self.register(EmailTemplate {
            name: ORDER_TO_ADMIN.to_string(),
            subject: "New order request: {{{door_title}}} / {{{article_title}}}".to_string(),
            body_text: Some(
                r#"A visitor requested a door.

Name: {{{name}}}
Email: {{{email}}}
Phone: {{{phone}}}
Door: {{{door_title}}}
Article: {{{article_title}}}
"#
                .to_string(),
            ),
            body_html: Some(
                r#"<h2>New order request</h2>
<ul>
  <li><b>Name:</b> {{name}}</li>
  <li><b>Email:</b> {{email}}</li>
  <li><b>Phone:</b> {{phone}}</li>
  <li><b>Door:</b> {{door_title}}</li>
  <li><b>Article:</b> {{article_title}}</li>
</ul>"#
                    .to_string(),
            ),
        })?;

        self.register(EmailTemplate {
            name: ORDER_TO_USER.to_string(),
            subject: "Your order request for {{{door_title}}}".to_string(),
            body_text: Some(
                r#"Hello {{{name}}},

We received your request for {{{door_title}}} ({{{article_title}}}).
A manager will contact you to confirm the details.
"#
                .to_string(),
            ),
            body_html: Some(
                r#"<p>Hello {{name}},</p>
<p>We received your request for <b>{{door_title}}</b> ({{article_title}}).</p>
<p>A manager will contact you to confirm the details.</p>"#
                    .to_string(),
            ),
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feedback_templates_registered() {
        let engine = TemplateEngine::new().unwrap();
        for name in [COMMON_TO_ADMIN, COMMON_TO_USER, ORDER_TO_ADMIN, ORDER_TO_USER] {
            assert!(engine.has_template(name), "missing {name}");
        }
    }

    #[test]
    fn test_order_to_admin_rendering() {
        let engine = TemplateEngine::new().unwrap();
        let data = json!({
            "name": "Ann",
            "email": "ann@example.com",
            "phone": "+7 900 000 00 00",
            "door_title": "Forpost",
            "article_title": "F-800",
        });

        let rendered = engine.render(ORDER_TO_ADMIN, &data).unwrap();
        assert_eq!(rendered.subject, "New order request: Forpost / F-800");
        assert!(rendered.body_text.unwrap().contains("Phone: +7 900 000 00 00"));
        assert!(rendered.body_html.unwrap().contains("<b>Door:</b> Forpost"));
    }

    #[test]
    fn test_html_body_escapes_input() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine
            .render(COMMON_TO_USER, &json!({"name": "<script>"}))
            .unwrap();
        assert!(rendered.body_html.unwrap().contains("&lt;script&gt;"));
    }

    #[test]
    fn test_text_body_is_not_escaped() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine
            .render(COMMON_TO_USER, &json!({"name": "O'Neil"}))
            .unwrap();
        assert!(rendered.body_text.unwrap().starts_with("Hello O'Neil,"));
    }

    #[test]
    fn test_missing_variable_is_error() {
        let engine = TemplateEngine::new().unwrap();
        assert!(engine.render(COMMON_TO_ADMIN, &json!({"name": "Ann"})).is_err());
        assert!(engine.render("welcome", &json!({})).is_err());
    }

    #[test]
    fn test_into_email() {
        let engine = TemplateEngine::new().unwrap();
        let email = engine
            .render(COMMON_TO_USER, &json!({"name": "Ann"}))
            .unwrap()
            .into_email("ann@example.com");
        assert_eq!(email.to, "ann@example.com");
        assert_eq!(email.subject, "We received your request");
        assert!(email.body_text.is_some());
    }
}
