use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    account::{AccountDao, AccountEntity},
    DaoError,
};
use sqlx::{query, query_as, FromRow};
use time::{format_description::well_known::Iso8601, PrimitiveDateTime};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct AccountDb {
    id: Vec<u8>,
    name: String,
    role: String,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}
impl TryFrom<&AccountDb> for AccountEntity {
    type Error = DaoError;
    fn try_from(account: &AccountDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&account.id)?,
            name: account.name.as_str().into(),
            role: account.role.as_str().into(),
            created: PrimitiveDateTime::parse(&account.created, &Iso8601::DATE_TIME)?,
            deleted: account
                .deleted
                .as_ref()
                .map(|deleted| PrimitiveDateTime::parse(deleted, &Iso8601::DATE_TIME))
                .transpose()?,
            version: Uuid::from_slice(&account.update_version)?,
        })
    }
}

pub struct AccountDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl AccountDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl AccountDao for AccountDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[AccountEntity]>, DaoError> {
        query_as::<_, AccountDb>(
            "SELECT id, name, role, created, deleted, update_version FROM account WHERE deleted IS NULL ORDER BY name",
        )
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AccountEntity::try_from)
        .collect::<Result<Arc<[AccountEntity]>, DaoError>>()
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AccountEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        query_as::<_, AccountDb>(
            "SELECT id, name, role, created, deleted, update_version FROM account WHERE id = ? AND deleted IS NULL",
        )
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(AccountEntity::try_from)
        .transpose()
    }

    async fn find_by_name(
        &self,
        name: &str,
        tx: Self::Transaction,
    ) -> Result<Option<AccountEntity>, DaoError> {
        query_as::<_, AccountDb>(
            "SELECT id, name, role, created, deleted, update_version FROM account WHERE name = ? AND deleted IS NULL",
        )
        .bind(name)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(AccountEntity::try_from)
        .transpose()
    }

    async fn create(
        &self,
        entity: &AccountEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let id_vec = entity.id.as_bytes().to_vec();
        let created = entity.created.format(&Iso8601::DATE_TIME)?;
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()?;
        let version_vec = entity.version.as_bytes().to_vec();
        query("INSERT INTO account (id, name, role, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?)")
            .bind(id_vec)
            .bind(entity.name.as_ref())
            .bind(entity.role.as_ref())
            .bind(created)
            .bind(deleted)
            .bind(version_vec)
            .bind(process)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}
