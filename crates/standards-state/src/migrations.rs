//! SurrealDB schema migrations and initialization
//!
//! Sets up the `assignments` and `submissions` tables with their uniqueness
//! constraints and lookup indexes.

use crate::error::StateError;
use crate::Result;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

/// Initialize all compliance tables in SurrealDB
///
/// Safe to call multiple times (idempotent).
pub async fn init_schema(db: &Surreal<Any>) -> Result<()> {
    info!("Initializing standards compliance schema");

    init_assignments_table(db).await?;
    init_submissions_table(db).await?;

    info!("Standards compliance schema initialization complete");
    Ok(())
}

/// Initialize `assignments` table
///
/// Schema:
/// ```text
/// TABLE assignments {
///   standard_id:  INT
///   agency_name:  STRING
///   created_at:   DATETIME
/// }
/// ```
///
/// Constraints:
/// - `(standard_id, agency_name)` is unique, so a toggle can never leave a
///   duplicate edge behind
/// - `standard_id` has its own index; lookups by standard alone must not
///   rely on the composite one
async fn init_assignments_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing assignments table");

    let sql = r#"
        DEFINE TABLE IF NOT EXISTS assignments
            SCHEMALESS
            PERMISSIONS
                FOR select, create, delete FULL
                FOR update NONE;

        DEFINE INDEX IF NOT EXISTS idx_standard_agency ON TABLE assignments
            COLUMNS standard_id, agency_name UNIQUE;

        DEFINE INDEX IF NOT EXISTS idx_assignment_standard ON TABLE assignments
            COLUMNS standard_id;

        DEFINE INDEX IF NOT EXISTS idx_agency_name ON TABLE assignments COLUMNS agency_name;
    "#;

    db.query(sql)
        .await?
        .check()
        .map_err(|e| StateError::SchemaSetup(e.to_string()))?;
    info!("✓ assignments table initialized");
    Ok(())
}

/// Initialize `submissions` table
///
/// Schema:
/// ```text
/// TABLE submissions {
///   submission_id:  STRING (unique)
///   standard_id:    INT (indexed)
///   agency_name:    STRING (indexed)
///   content_type:   STRING (enum: text | pdf | photo | video)
///   status:         STRING (enum: pending | approved | rejected)
///   description:    STRING?
///   files:          ARRAY<OBJECT { name, size, mime_type }>
///   submitted_at:   DATETIME
///   seq:            INT (creation order)
///   reviewed_at:    DATETIME?
/// }
/// ```
///
/// Status may move between any two values (reviewers can re-review
/// indefinitely); the row is only removed by an explicit withdrawal.
async fn init_submissions_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing submissions table");

    let sql = r#"
        DEFINE TABLE IF NOT EXISTS submissions
            SCHEMALESS
            PERMISSIONS FULL;

        DEFINE INDEX IF NOT EXISTS idx_submission_id ON TABLE submissions
            COLUMNS submission_id UNIQUE;

        DEFINE INDEX IF NOT EXISTS idx_standard_id ON TABLE submissions COLUMNS standard_id;

        DEFINE INDEX IF NOT EXISTS idx_agency_name ON TABLE submissions COLUMNS agency_name;
    "#;

    db.query(sql)
        .await?
        .check()
        .map_err(|e| StateError::SchemaSetup(e.to_string()))?;
    info!("✓ submissions table initialized");
    Ok(())
}
