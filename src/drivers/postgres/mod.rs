//! PostgreSQL catalog reader and DDL/DML writer.

mod reader;
mod writer;

pub use reader::PostgresMetaReader;
pub use writer::PostgresMetaWriter;
