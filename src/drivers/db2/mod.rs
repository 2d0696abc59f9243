//! DB2 catalog reader and DDL/DML writer.

mod reader;
mod writer;

pub use reader::Db2MetaReader;
pub use writer::Db2MetaWriter;
