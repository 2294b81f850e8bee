use thiserror::Error;

/// Rejections raised while parsing ledger primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Text does not have the expected shape.
    #[error("malformed {field}: {value:?}")]
    Malformed {
        /// Kind of value being parsed.
        field: &'static str,
        /// Input as given.
        value: String,
    },
    /// Amount carries a minus sign.
    #[error("{field} {value} is negative")]
    Negative {
        /// Kind of value being parsed.
        field: &'static str,
        /// Input as given.
        value: String,
    },
}
