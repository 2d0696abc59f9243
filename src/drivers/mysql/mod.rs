//! MySQL catalog reader and DDL/DML writer.

mod reader;
mod writer;

pub use reader::MySqlMetaReader;
pub use writer::MySqlMetaWriter;
