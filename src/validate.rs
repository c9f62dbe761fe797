//! Task definition validation
//!
//! Turns a raw task document into a typed [`TaskDefinition`]. Shape problems
//! (both or neither of `target`/`tasks`, unknown or missing keys) are
//! reported as [`Error::InvalidTaskShape`]; content rules as
//! [`Error::Validation`].

use serde_json::Value;

use crate::error::{Error, Result};
use crate::task::{CompositeTask, LeafTask, SnippetRef, TaskDefinition, TaskName};

/// Validate the raw definition of task `name`.
pub fn validate_task(name: &TaskName, raw: Value) -> Result<TaskDefinition> {
    let shape_error = |message: String| Error::InvalidTaskShape {
        task: name.to_string(),
        message,
    };
    let invalid = |message: &str| Error::Validation {
        task: name.to_string(),
        message: message.to_string(),
    };

    let Value::Object(map) = &raw else {
        return Err(shape_error("expected an object".to_string()));
    };

    let definition = match (map.contains_key("target"), map.contains_key("tasks")) {
        (true, true) => {
            return Err(shape_error(
                "a task has either \"target\" or \"tasks\", not both".to_string(),
            ))
        }
        (false, false) => {
            return Err(shape_error(
                "a task needs either \"target\" or \"tasks\"".to_string(),
            ))
        }
        (true, false) => {
            if map.get("create") == Some(&Value::Bool(true)) {
                return Err(invalid("Option \"create\" defaults to true. Remove."));
            }
            let leaf: LeafTask =
                serde_json::from_value(raw).map_err(|e| shape_error(e.to_string()))?;
            check_leaf(&leaf).map_err(invalid)?;
            TaskDefinition::Leaf(leaf)
        }
        (false, true) => {
            let composite: CompositeTask =
                serde_json::from_value(raw).map_err(|e| shape_error(e.to_string()))?;
            TaskDefinition::Composite(composite)
        }
    };

    let is_composite = matches!(definition, TaskDefinition::Composite(_));
    if name.is_composite_id() != is_composite {
        return Err(invalid(if is_composite {
            "composite task ids must start with '@' or '#'"
        } else {
            "leaf task ids must not start with '@' or '#'"
        }));
    }

    Ok(definition)
}

fn check_leaf(leaf: &LeafTask) -> std::result::Result<(), &'static str> {
    if leaf.snippets.is_empty() {
        return Err("\"snippets\" must not be empty");
    }
    if leaf.purpose.is_empty() {
        return Err("\"purpose\" must not be empty");
    }
    let empty_bindings = leaf.snippets.iter().any(|snippet| {
        matches!(snippet, SnippetRef::Bound(bound) if bound.variables.is_empty())
    });
    if empty_bindings {
        return Err("snippet \"variables\" must not be empty");
    }
    Ok(())
}
