//! Crate-level error type.
//!
//! Expected operational conditions (unknown order id, persistence failure)
//! are not errors; they are no-ops or logged warnings. Only validation
//! rejections and hard infrastructure failures surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PosError {
    /// An order must contain at least one line; the cart is kept intact.
    #[error("cannot create an order from an empty cart")]
    EmptyCart,

    #[error("database: {0}")]
    Db(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("render: {0}")]
    Render(String),
}
