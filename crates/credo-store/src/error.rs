use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record {id} not found in {collection}")]
    NotFound { collection: &'static str, id: Uuid },

    #[error("Record {id} already exists in {collection}")]
    DuplicateKey { collection: &'static str, id: Uuid },

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}
