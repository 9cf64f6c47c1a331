use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountEntity {
    pub id: Uuid,
    pub name: Arc<str>,
    pub role: Arc<str>,
    pub created: PrimitiveDateTime,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait AccountDao {
    type Transaction: crate::Transaction;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[AccountEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AccountEntity>, DaoError>;
    async fn find_by_name(
        &self,
        name: &str,
        tx: Self::Transaction,
    ) -> Result<Option<AccountEntity>, DaoError>;
    async fn create(
        &self,
        entity: &AccountEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
