//! Scenario View: fail-open key-path access over a raw scenario record
//!
//! Every lookup degrades to the caller's default when a key is absent, the
//! value is `null`, an intermediate value is not an object, or the leaf cannot
//! be coerced to the requested type. Nothing here returns an error.
use serde_json::Value;

/// Key under which a scenario record nests its domain inputs
pub const DECISION_INPUTS: &str = "decision_inputs";

#[derive(Debug, Clone, Copy)]
pub struct ScenarioView<'a> {
    root: Option<&'a Value>,
}

impl<'a> ScenarioView<'a> {
    /// View over the whole record
    pub fn new(record: &'a Value) -> Self {
        Self { root: Some(record) }
    }

    /// View scoped to `record.decision_inputs`; empty when that key is missing
    pub fn decision_inputs(record: &'a Value) -> Self {
        Self {
            root: record.get(DECISION_INPUTS).filter(|v| !v.is_null()),
        }
    }

    /// Walk `path` key by key
    pub fn get(&self, path: &[&str]) -> Option<&'a Value> {
        let mut current = self.root?;
        for key in path {
            current = current.as_object()?.get(*key)?;
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    pub fn get_or(&self, path: &[&str], default: &'a Value) -> &'a Value {
        self.get(path).unwrap_or(default)
    }

    pub fn number(&self, path: &[&str], default: f64) -> f64 {
        match self.get(path) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(default),
            Some(Value::Bool(b)) => f64::from(u8::from(*b)),
            _ => default,
        }
    }

    pub fn integer(&self, path: &[&str], default: i64) -> i64 {
        match self.get(path) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .unwrap_or(default),
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                    .unwrap_or(default)
            }
            Some(Value::Bool(b)) => i64::from(*b),
            _ => default,
        }
    }

    pub fn flag(&self, path: &[&str], default: bool) -> bool {
        match self.get(path) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(default),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => default,
            },
            _ => default,
        }
    }

    pub fn text(&self, path: &[&str], default: &str) -> String {
        match self.get(path) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => default.to_string(),
        }
    }
}
