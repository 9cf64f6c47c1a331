use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use booking_utils::derive_from_reference;
use dao::MockTransaction;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::permission::{Authentication, Role};
use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub name: Arc<str>,
    pub role: Arc<str>,
    pub created: Option<PrimitiveDateTime>,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}
impl Account {
    pub fn role(&self) -> Role {
        Role::from_name(&self.role)
    }
}

impl From<&dao::account::AccountEntity> for Account {
    fn from(account: &dao::account::AccountEntity) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            role: account.role.clone(),
            created: Some(account.created),
            deleted: account.deleted,
            version: account.version,
        }
    }
}

derive_from_reference!(dao::account::AccountEntity, Account);

impl TryFrom<&Account> for dao::account::AccountEntity {
    type Error = ServiceError;
    fn try_from(account: &Account) -> Result<Self, Self::Error> {
        Ok(Self {
            id: account.id,
            name: account.name.clone(),
            role: account.role.clone(),
            created: account.created.ok_or(ServiceError::InternalError)?,
            deleted: account.deleted,
            version: account.version,
        })
    }
}

#[automock(type Context=(); type Transaction=MockTransaction;)]
#[async_trait]
pub trait AccountService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Account]>, ServiceError>;
    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Account, ServiceError>;
    /// Display name of the account, `None` if there is no such account.
    async fn get_username(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<Arc<str>>, ServiceError>;
    async fn create(
        &self,
        account: &Account,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Account, ServiceError>;
}
