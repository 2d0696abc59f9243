//! Identifier validation and per-dialect quoting.
//!
//! Every schema, table, column, and index name in the model must match the
//! identifier grammar `[A-Za-z_]\w*`. Quoting wraps an identifier in the
//! dialect's quote character; none of the styles escape a quote character
//! embedded in the identifier itself (the grammar does not admit one).

use crate::error::{MetaError, Result};

/// Validate a name against the identifier grammar `[A-Za-z_]\w*`.
///
/// # Errors
///
/// Returns `MetaError::Config` for an empty name or a name containing
/// characters outside the grammar.
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(MetaError::config(format!("Invalid identifier: {name:?}")))
    }
}

/// Per-dialect identifier quoting policy.
///
/// The default policy passes identifiers through unquoted; MySQL wraps with
/// backticks and PostgreSQL/DB2 catalogs wrap with double quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Identifiers pass through unquoted.
    #[default]
    None,
    /// Wrap with backticks (MySQL).
    Backtick,
    /// Wrap with double quotes (PostgreSQL, DB2).
    DoubleQuote,
}

impl QuoteStyle {
    /// Quote an identifier according to this style.
    #[must_use]
    pub fn apply(&self, identifier: &str) -> String {
        match self {
            QuoteStyle::None => identifier.to_string(),
            QuoteStyle::Backtick => format!("`{identifier}`"),
            QuoteStyle::DoubleQuote => format!("\"{identifier}\""),
        }
    }
}
