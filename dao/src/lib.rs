use std::fmt::Debug;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub mod account;
pub mod booking;

#[derive(Error, Debug)]
pub enum DaoError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Uuid parse error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Date time parse error: {0}")]
    DateTimeParseError(#[from] time::error::Parse),

    #[error("Date time format error: {0}")]
    DateTimeFormatError(#[from] time::error::Format),
}

/// Marker for the transaction handle which is passed through dao and service calls.
pub trait Transaction: Clone + Debug + Send + Sync + 'static {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockTransaction;
impl Transaction for MockTransaction {}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait TransactionDao {
    type Transaction: Transaction;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError>;
    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError>;
    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError>;
}
