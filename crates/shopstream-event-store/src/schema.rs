//! Analytics database schema.
//!
//! The DDL lives in the workspace `migrations/` directory and is embedded
//! into the binary here.

use sqlx::migrate::Migrator;

/// Migrations creating the raw event log, the hourly metrics table, the
/// single-row aggregation state and the read-only catalog tables.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");
