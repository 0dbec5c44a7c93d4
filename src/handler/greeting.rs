//! Greeting form handlers
//!
//! Two operations bound at `/greeting2`: render an empty form, and accept a
//! submitted greeting. Both return the `hello` view with the greeting placed
//! in the model under the `greeting` key. The greeting lives for exactly one
//! request: no state is kept between calls.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::view::{Model, ViewOutcome};

/// View rendered by both operations
const GREETING_VIEW: &str = "hello";

/// The single data entity exchanged between the GET and POST operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    #[serde(default)]
    pub value: String,
}

impl Greeting {
    /// Bind decoded form fields to a greeting
    ///
    /// Reads the named `value` field; a missing field yields the default
    /// (empty) greeting, other fields are ignored.
    pub fn from_form(fields: &[(String, String)]) -> Self {
        let value = fields
            .iter()
            .find(|(name, _)| name == "value")
            .map(|(_, value)| value.clone())
            .unwrap_or_default();
        Self { value }
    }
}

/// GET /greeting2: seed the form with a fresh, empty greeting
pub fn show_form() -> ViewOutcome {
    greeting_outcome(Greeting::default())
}

/// POST /greeting2: accept the submitted greeting as-is
pub fn submit_form(greeting: Greeting) -> ViewOutcome {
    greeting_outcome(greeting)
}

fn greeting_outcome(greeting: Greeting) -> ViewOutcome {
    let mut model = Model::new();
    model.insert("greeting".to_string(), json!(greeting));
    ViewOutcome {
        view: GREETING_VIEW,
        model,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_value(outcome: &ViewOutcome) -> &str {
        outcome.model["greeting"]["value"].as_str().unwrap()
    }

    #[test]
    fn test_show_form_returns_hello_with_empty_greeting() {
        let outcome = show_form();
        assert_eq!(outcome.view, "hello");
        assert_eq!(model_value(&outcome), "");
    }

    #[test]
    fn test_show_form_instances_are_independent() {
        let first = show_form();
        let mut second = show_form();
        assert_eq!(first, second);

        // Mutating one outcome must not leak into the other
        second
            .model
            .insert("greeting".to_string(), serde_json::json!({ "value": "x" }));
        assert_eq!(model_value(&first), "");
    }

    #[test]
    fn test_submit_form_echoes_greeting() {
        let outcome = submit_form(Greeting {
            value: "Hi".to_string(),
        });
        assert_eq!(outcome.view, "hello");
        assert_eq!(model_value(&outcome), "Hi");
    }

    #[test]
    fn test_sequential_submits_do_not_interfere() {
        let first = submit_form(Greeting {
            value: "first".to_string(),
        });
        let second = submit_form(Greeting {
            value: "second".to_string(),
        });
        assert_eq!(model_value(&first), "first");
        assert_eq!(model_value(&second), "second");
    }

    #[test]
    fn test_from_form_reads_value_field() {
        let fields = vec![("value".to_string(), "Hello World".to_string())];
        assert_eq!(Greeting::from_form(&fields).value, "Hello World");
    }

    #[test]
    fn test_from_form_missing_field_defaults() {
        assert_eq!(Greeting::from_form(&[]), Greeting::default());
    }

    #[test]
    fn test_from_form_ignores_unknown_fields() {
        let fields = vec![
            ("other".to_string(), "x".to_string()),
            ("value".to_string(), "Hi".to_string()),
        ];
        assert_eq!(Greeting::from_form(&fields).value, "Hi");
    }
}
