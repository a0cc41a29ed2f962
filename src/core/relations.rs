//! Relation fix engine — rename relation fields inside Prisma model blocks.
//!
//! Given a `RelationFix` (model + field → new name, plus the relation shape
//! that must follow the field), this module:
//! 1. Builds a regex scoped to the `model X { ... }` block body
//! 2. Renames the first field declaration that carries the expected
//!    `@relation(fields: [...])` attribute
//! 3. Reports how many replacements were made per fix
//!
//! Fields of other models are never touched: the block span `[^}]*?`
//! cannot cross a closing brace, so a match always stays inside the
//! model block it started in.

use crate::error::{Error, Result};
use crate::utils::io;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

// ============================================================================
// Types
// ============================================================================

/// A single relation field rename, scoped to one model block.
#[derive(Debug, Clone)]
pub struct RelationFix {
    /// Model whose block is searched (e.g. `Post`).
    pub model: String,
    /// Current field name inside that block (e.g. `user`).
    pub field: String,
    /// Replacement field name (e.g. `author`).
    pub rename_to: String,
    /// Declared type of the relation field (e.g. `User`).
    pub field_type: String,
    /// First column named in the `@relation(fields: [...])` attribute
    /// (e.g. `authorId`).
    pub foreign_key: String,
}

/// Outcome of one fix against the schema text.
#[derive(Debug, Clone, Serialize)]
pub struct FixOutcome {
    pub model: String,
    pub field: String,
    pub renamed_to: String,
    pub replacements: usize,
}

/// Result of rewriting a schema file in place.
#[derive(Debug, Clone, Serialize)]
pub struct FixReport {
    pub schema_path: String,
    pub fixes: Vec<FixOutcome>,
    pub total_replacements: usize,
    pub bytes_written: usize,
}

// ============================================================================
// Fix application
// ============================================================================

impl RelationFix {
    pub fn new(
        model: &str,
        field: &str,
        rename_to: &str,
        field_type: &str,
        foreign_key: &str,
    ) -> Self {
        RelationFix {
            model: model.to_string(),
            field: field.to_string(),
            rename_to: rename_to.to_string(),
            field_type: field_type.to_string(),
            foreign_key: foreign_key.to_string(),
        }
    }

    /// Every part of a fix is interpolated into a regex, so each must be a
    /// plain identifier even though the interpolation itself is escaped.
    fn validate(&self) -> Result<()> {
        let parts = [
            ("model", &self.model),
            ("field", &self.field),
            ("renameTo", &self.rename_to),
            ("fieldType", &self.field_type),
            ("foreignKey", &self.foreign_key),
        ];

        for (name, value) in parts {
            if !is_identifier(value) {
                return Err(Error::validation_invalid_argument(
                    name,
                    format!("'{}' is not a valid identifier", value),
                    Some(value.to_string()),
                )
                .with_hint(
                    "Model and field names must be ASCII identifiers (letters, digits, underscore)",
                ));
            }
        }

        Ok(())
    }

    /// Regex for this fix.
    ///
    /// Group 1 captures from the model header up to (not including) the
    /// field name; group 2 captures the type and relation attribute
    /// fragment that must follow it. The lazy `[^}]*?` span keeps the
    /// match inside the block and stops at the first eligible field.
    fn pattern(&self) -> String {
        format!(
            r"(model {model} \{{[^}}]*?)\b{field}(\s+{ty}\s+@relation\(fields: \[{key}\])",
            model = regex::escape(&self.model),
            field = regex::escape(&self.field),
            ty = regex::escape(&self.field_type),
            key = regex::escape(&self.foreign_key),
        )
    }

    /// Apply this fix to schema text.
    ///
    /// Returns the rewritten text and the number of replacements made.
    /// Zero replacements is not an error: a schema that already uses the
    /// new name, or lacks the model entirely, passes through byte for byte.
    pub fn apply(&self, content: &str) -> Result<(String, usize)> {
        self.validate()?;

        let re = Regex::new(&self.pattern()).map_err(|e| {
            Error::internal_unexpected(format!("Invalid relation fix pattern: {}", e))
        })?;

        let mut count = 0usize;

        let replaced = re
            .replace_all(content, |caps: &regex::Captures| {
                count += 1;
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                let suffix = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                format!("{}{}{}", prefix, self.rename_to, suffix)
            })
            .to_string();

        Ok((replaced, count))
    }
}

/// True when `s` is a plain ASCII identifier (`[A-Za-z_][A-Za-z0-9_]*`).
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Apply a sequence of fixes to schema text, in order.
pub fn apply_fixes(content: &str, fixes: &[RelationFix]) -> Result<(String, Vec<FixOutcome>)> {
    let mut current = content.to_string();
    let mut outcomes = Vec::with_capacity(fixes.len());

    for fix in fixes {
        let (next, replacements) = fix.apply(&current)?;
        current = next;
        outcomes.push(FixOutcome {
            model: fix.model.clone(),
            field: fix.field.clone(),
            renamed_to: fix.rename_to.clone(),
            replacements,
        });
    }

    Ok((current, outcomes))
}

/// Rewrite `path` in place with every fix applied.
///
/// The file is written back even when nothing matched, so a run against
/// an already-fixed schema is a harmless rewrite of identical bytes.
/// A missing or unreadable file fails before anything is written.
pub fn fix_schema_file(path: &Path, fixes: &[RelationFix]) -> Result<FixReport> {
    let content = io::read_file(path, "read schema")?;
    let (fixed, outcomes) = apply_fixes(&content, fixes)?;
    io::write_file(path, &fixed, "write schema")?;

    let total_replacements = outcomes.iter().map(|o| o.replacements).sum();

    Ok(FixReport {
        schema_path: path.to_string_lossy().to_string(),
        fixes: outcomes,
        total_replacements,
        bytes_written: fixed.len(),
    })
}

// ============================================================================
// Tests
// ============================================================================
