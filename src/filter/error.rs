use thiserror::Error;

/// A filter document that cannot be turned into SQL.
///
/// Every variant surfaces to clients as a 400 through
/// `DatabaseError::InvalidFilter`.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Invalid where clause: {0}")]
    InvalidWhereClause(String),

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("Invalid operand for {operator}: {reason}")]
    InvalidOperand { operator: String, reason: String },

    /// Negative `skip` or `limit`
    #[error("Invalid page window: {0}")]
    InvalidWindow(String),
}
