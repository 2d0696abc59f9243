//! Cross-dialect schema introspection, DDL/DML generation, and batched
//! table migration for MySQL, PostgreSQL, and DB2.
//!
//! The library reads a dialect's system catalog into one unified model
//! ([`Schema`]/[`Table`]/[`Column`]/[`Index`] with a closed [`DataType`]
//! catalog), renders dialect-correct statements from that model, and moves
//! table structure and rows between two live connections.
//!
//! Connections are supplied by the caller behind the [`DbConnection`] trait;
//! this crate never opens, pools, commits, or rolls back anything.
//!
//! ```no_run
//! use dbmeta_migrate::{Config, MigrationContext};
//! # fn connections() -> (Box<dyn dbmeta_migrate::DbConnection>, Box<dyn dbmeta_migrate::DbConnection>) { unimplemented!() }
//!
//! # fn main() -> dbmeta_migrate::Result<()> {
//! let config = Config::load("migrate.yaml")?;
//! let (mut source, mut target) = connections();
//! let schemas = config.source_reader().read(source.as_mut())?;
//!
//! let mut context = MigrationContext::new(
//!     config.source_reader(),
//!     source.as_mut(),
//!     config.target_reader(),
//!     config.target_writer(),
//!     target.as_mut(),
//!     config.batch_size,
//! )?;
//! for schema in &schemas {
//!     for table in &schema.tables {
//!         context.migrate_table_structure_with_data(table, config.copy_mode)?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connect;
pub mod core;
pub mod datatype;
pub mod drivers;
pub mod error;
pub mod orchestrator;

pub use crate::config::Config;
pub use crate::connect::{DbConnection, InsertBatch, Row, RowStream, TextRow};
pub use crate::core::identifier::{validate_identifier, QuoteStyle};
pub use crate::core::schema::{Column, Index, IndexKind, Schema, Table};
pub use crate::core::traits::{MetaReader, MetaWriter, Naming};
pub use crate::core::value::SqlValue;
pub use crate::datatype::DataType;
pub use crate::drivers::{reader_for, writer_for, DialectKind};
pub use crate::error::{MetaError, Result};
pub use crate::orchestrator::{CopyMode, MigrationContext, StructureOutcome};
