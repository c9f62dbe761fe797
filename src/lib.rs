//! # confsmith
//!
//! This library composes per-project configuration files from a shared
//! library of task definitions and content fragments, substitutes
//! caller-supplied variables, and reconciles the result with what already
//! exists on disk. Targets are only written when their content changes, so a
//! second run over an unchanged project reports nothing.
//!
//! ## Quick Example
//!
//! ```
//! use confsmith::storage::{MemoryStorage, Storage, WriteOptions};
//! use confsmith::strategy::Strategy;
//! use serde_json::json;
//!
//! let mut storage = MemoryStorage::new();
//! let options = WriteOptions::new(Strategy::Default);
//!
//! // The first write creates the target
//! assert!(storage.write("tsconfig.json", &json!({"strict": true}), &options).unwrap());
//!
//! // Writing the same document again changes nothing
//! assert!(!storage.write("tsconfig.json", &json!({"strict": true}), &options).unwrap());
//! ```
//!
//! ## Core Concepts
//!
//! - **Variables (`vars`)**: `${name}` references, resolved lazily inside
//!   fragments and strictly for targets and snippet bindings.
//! - **Tasks (`task`, `validate`)**: leaf tasks compose one target from
//!   fragments (`snippet`), composite tasks group other tasks.
//! - **Merging (`merge`)**: deep merge of fragments under an explicit
//!   policy, structural reconciliation of element trees, line policies.
//! - **Strategies (`strategy`)**: how a composed document is combined with an
//!   existing target.
//! - **Storage (`storage`, `format`, `filesystem`)**: parsing, rendering and
//!   write-if-changed, on disk or in memory.
//! - **Configuration (`config`)**: the project's `.confsmith.yaml`.
//!
//! ## Execution Flow
//!
//! [`orchestrator::execute`] applies each configured library in order:
//!
//! 1.  **Load**: read and validate each task definition.
//! 2.  **Compose**: resolve the target, load the fragments and merge them.
//! 3.  **Reconcile**: combine the composed document with the existing target
//!     using the task's strategy.
//! 4.  **Write**: render and write the target if its content changed.
//!
//! Composite tasks are walked depth-first in declaration order by
//! [`walker::apply_tasks_rec`].

pub mod config;
pub mod error;
pub mod filesystem;
pub mod format;
pub mod merge;
pub mod meta;
pub mod orchestrator;
pub mod output;
pub mod snippet;
pub mod storage;
pub mod strategy;
pub mod suggestions;
pub mod task;
pub mod validate;
pub mod vars;
pub mod walker;

#[cfg(test)]
mod vars_proptest;
