//! Fixed configuration for the shipped binary.
//!
//! The tool is deliberately zero-config: no flags, environment variables,
//! or config files are consulted. The schema location and the fix table
//! below are the whole surface.

use crate::relations::RelationFix;

/// Schema file rewritten by the binary, relative to the working directory.
pub const SCHEMA_PATH: &str = "prisma/schema.prisma";

/// The relation fixes the binary applies.
///
/// Post and Page declare their author relation under the generic field
/// name `user`, while the application code expects `author`. Both point
/// at the `User` model through an `authorId` foreign key.
pub fn stock_fixes() -> Vec<RelationFix> {
    vec![
        RelationFix::new("Post", "user", "author", "User", "authorId"),
        RelationFix::new("Page", "user", "author", "User", "authorId"),
    ]
}

// ============================================================================
// Tests
// ============================================================================
