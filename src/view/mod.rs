//! View rendering module
//!
//! Resolves logical view identifiers to tera templates and renders them
//! with a model: a mapping of named values substituted into the template.
//! Tera's default auto-escaping applies to `.html` templates, so submitted
//! values reach the page HTML-escaped.

use serde_json::Value;
use tera::{Context, Tera};

/// Named values handed to the template renderer
pub type Model = serde_json::Map<String, Value>;

/// What a handler produces: a view identifier plus the model to render it with
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOutcome {
    /// Logical view name, resolved to `<view>.html`
    pub view: &'static str,
    pub model: Model,
}

/// Compiled template set loaded from the configured templates directory
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Compile all `.html` templates under `dir`
    pub fn load(dir: &str) -> tera::Result<Self> {
        let glob = format!("{}/**/*.html", dir.trim_end_matches('/'));
        let tera = Tera::new(&glob)?;
        Ok(Self { tera })
    }

    /// Render a handler outcome to an HTML body
    pub fn render(&self, outcome: &ViewOutcome) -> tera::Result<String> {
        let context = Context::from_value(Value::Object(outcome.model.clone()))?;
        self.tera.render(&format!("{}.html", outcome.view), &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome_with_value(value: &str) -> ViewOutcome {
        let mut model = Model::new();
        model.insert("greeting".to_string(), json!({ "value": value }));
        ViewOutcome {
            view: "hello",
            model,
        }
    }

    #[test]
    fn test_render_hello_view() {
        let templates = Templates::load("templates").unwrap();
        let html = templates.render(&outcome_with_value("Hi")).unwrap();
        assert!(html.contains("Hi"));
        assert!(html.contains("<form"));
    }

    #[test]
    fn test_render_escapes_submitted_value() {
        let templates = Templates::load("templates").unwrap();
        let html = templates
            .render(&outcome_with_value("<script>alert(1)</script>"))
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_unknown_view_fails() {
        let templates = Templates::load("templates").unwrap();
        let mut outcome = outcome_with_value("");
        outcome.view = "no-such-view";
        assert!(templates.render(&outcome).is_err());
    }
}
