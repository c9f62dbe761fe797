//! # Variable Resolution
//!
//! Templates (task targets, snippet variable maps and fragment documents)
//! refer to caller-supplied variables with `${name}` references, where a name
//! matches `[A-Za-z_][A-Za-z0-9_.-]*`. Any other `$` text, such as GitHub
//! Actions' `${{ expr }}` or a shell's `$HOME`, is not a reference and passes
//! through untouched. Only string values are scanned; object keys are literal.
//!
//! Resolution happens in two distinct phases with distinct result types:
//!
//! - [`populate_lazy`] substitutes what it can and leaves unresolved
//!   references intact, producing a [`Partial`] document.
//! - [`populate_strict`] (or [`Partial::resolve`]) requires every reference
//!   to resolve and produces a [`Resolved`] document, failing with
//!   [`Error::MissingVariable`] otherwise.
//!
//! A string made of exactly one reference is replaced by the variable's value
//! wholesale, so a reference can expand into a list or a mapping. A reference
//! embedded in a longer string is replaced by the value's text form.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Variable bindings supplied by the caller for one run.
pub type VariableMap = Map<String, Value>;

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_.\-]*)\}").expect("reference pattern is valid")
});

/// A document that may still contain unresolved variable references.
#[derive(Debug, Clone, PartialEq)]
pub struct Partial(Value);

/// A document in which every variable reference has been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved(Value);

impl Partial {
    /// Borrow the underlying document.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the underlying document.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Names of the references that are still unresolved.
    pub fn unresolved(&self) -> Vec<String> {
        determine_vars(&self.0)
    }

    /// Finish resolution with a strict pass.
    pub fn resolve(self, variables: &VariableMap) -> Result<Resolved> {
        populate_strict(&self.0, variables)
    }
}

impl Resolved {
    /// Borrow the underlying document.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the underlying document.
    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Return every distinct variable name referenced in `template`, in order of
/// first occurrence.
///
/// # Examples
///
/// ```
/// use confsmith::vars::determine_vars;
/// use serde_json::json;
///
/// let template = json!({"name": "${project}", "tags": ["${owner}", "${project}-docs"]});
/// assert_eq!(determine_vars(&template), vec!["project", "owner"]);
/// ```
pub fn determine_vars(template: &Value) -> Vec<String> {
    let mut names = Vec::new();
    collect_names(template, &mut names);
    names
}

fn collect_names(value: &Value, names: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            for caps in REFERENCE.captures_iter(text) {
                let name = &caps[1];
                if !names.iter().any(|known| known == name) {
                    names.push(name.to_string());
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_names(item, names)),
        Value::Object(map) => map.values().for_each(|item| collect_names(item, names)),
        _ => {}
    }
}

/// Substitute every reference that has a binding, leaving the rest intact.
pub fn populate_lazy(template: &Value, variables: &VariableMap) -> Partial {
    let mut missing = Vec::new();
    Partial(substitute(template, variables, &mut missing))
}

/// Substitute every reference, failing on the first one without a binding.
pub fn populate_strict(template: &Value, variables: &VariableMap) -> Result<Resolved> {
    let mut missing = Vec::new();
    let value = substitute(template, variables, &mut missing);
    match missing.into_iter().next() {
        Some(name) => Err(Error::MissingVariable { name }),
        None => Ok(Resolved(value)),
    }
}

/// Strictly resolve a single string, such as a task target.
pub fn populate_str(template: &str, variables: &VariableMap) -> Result<String> {
    match populate_strict(&Value::String(template.to_string()), variables)?.into_value() {
        Value::String(text) => Ok(text),
        other => Ok(inline_text(&other)),
    }
}

fn substitute(value: &Value, variables: &VariableMap, missing: &mut Vec<String>) -> Value {
    match value {
        Value::String(text) => substitute_str(text, variables, missing),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| substitute(item, variables, missing))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), substitute(item, variables, missing)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn substitute_str(text: &str, variables: &VariableMap, missing: &mut Vec<String>) -> Value {
    let whole = REFERENCE
        .find(text)
        .is_some_and(|m| m.start() == 0 && m.end() == text.len());
    if whole {
        let name = &text[2..text.len() - 1];
        return match variables.get(name) {
            Some(bound) => bound.clone(),
            None => {
                missing.push(name.to_string());
                Value::String(text.to_string())
            }
        };
    }

    let replaced = REFERENCE.replace_all(text, |caps: &Captures| match variables.get(&caps[1]) {
        Some(bound) => inline_text(bound),
        None => {
            missing.push(caps[1].to_string());
            caps[0].to_string()
        }
    });
    Value::String(replaced.into_owned())
}

fn inline_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
