//! # eol-rework
//!
//! Transactional rework archival for end-of-line test records in MySQL.
//!
//! When a tested part fails and goes to rework, its measurement record has
//! to leave the production table and land in the line's rework table, tagged
//! with a status code saying why. This library does that move as one unit of
//! work:
//!
//! - **Atomic transfer**: copy, status tagging and cascade delete share a
//!   single transaction
//! - **Schema-driven binding** of raw values via `INFORMATION_SCHEMA` column
//!   types
//! - **Secondary-key narrowing** for lines that key records by serial and
//!   part number
//! - **Tolerant cascade** across auxiliary tables, failing only when no
//!   related row existed anywhere
//!
//! ## Example
//!
//! ```rust,no_run
//! use eol_rework::{store_for_line, Config, ReworkError};
//!
//! #[tokio::main]
//! async fn main() -> eol_rework::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let line = config
//!         .line("Linie 852")
//!         .ok_or_else(|| ReworkError::Config("unknown line".into()))?;
//!     let outcome = store_for_line(line, 1, "1234567", None).await?;
//!     println!("Archived {} row(s)", outcome.rows_archived);
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod config;
pub mod error;
mod identifier;
pub mod schema;
pub mod typemap;

// Re-exports for convenient access
pub use archive::{store_data_in_db, store_for_line, ArchiveOutcome, STATUS_COLUMN};
pub use config::{Config, ConnectionConfig, LineConfig, StatusCode, TableSpec};
pub use error::{ReworkError, Result};
pub use schema::ColumnBinding;
pub use typemap::ValueKind;
