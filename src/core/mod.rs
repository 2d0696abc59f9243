//! Dialect-independent model and seams.

pub mod identifier;
pub mod schema;
pub mod traits;
pub mod value;
