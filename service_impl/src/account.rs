use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    account::{AccountDao, AccountEntity},
    TransactionDao,
};
use service::{
    account::{Account, AccountService},
    clock::ClockService,
    permission::Authentication,
    uuid_service::UuidService,
    PermissionService, ServiceError, ValidationFailureItem,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct AccountServiceImpl: AccountService = AccountServiceDeps {
        AccountDao: AccountDao<Transaction = Self::Transaction> = account_dao,
        PermissionService: PermissionService<Context = Self::Context, Transaction = Self::Transaction> = permission_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const ACCOUNT_SERVICE_PROCESS: &str = "account-service";

#[async_trait]
impl<Deps: AccountServiceDeps> AccountService for AccountServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Account]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_elevated(context, Some(tx.clone()))
            .await?;
        let accounts = self
            .account_dao
            .all(tx.clone())
            .await?
            .iter()
            .map(Account::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(accounts)
    }

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Account, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .current_actor(context, Some(tx.clone()))
            .await?
            .ensure_access(id)?;
        let account = self
            .account_dao
            .find_by_id(id, tx.clone())
            .await?
            .map(Account::from)
            .ok_or(ServiceError::EntityNotFound(id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(account)
    }

    async fn get_username(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<Arc<str>>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .current_actor(context, Some(tx.clone()))
            .await?;
        let username = self
            .account_dao
            .find_by_id(id, tx.clone())
            .await?
            .map(|account| account.name);
        self.transaction_dao.commit(tx).await?;
        Ok(username)
    }

    #[instrument(skip(self, tx))]
    async fn create(
        &self,
        account: &Account,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Account, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_elevated(context, Some(tx.clone()))
            .await?;

        if account.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if account.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        let mut validation = Vec::new();
        if account.name.trim().is_empty() {
            validation.push(ValidationFailureItem::InvalidValue("name".into()));
        }
        if account.role.trim().is_empty() {
            validation.push(ValidationFailureItem::InvalidValue("role".into()));
        }
        if !validation.is_empty() {
            return Err(ServiceError::ValidationError(validation.into()));
        }
        if let Some(existing) = self
            .account_dao
            .find_by_name(account.name.as_ref(), tx.clone())
            .await?
        {
            return Err(ServiceError::EntityAlreadyExists(existing.id));
        }

        let account = Account {
            id: self.uuid_service.new_uuid("account-id"),
            version: self.uuid_service.new_uuid("account-version"),
            created: Some(self.clock_service.date_time_now()),
            deleted: None,
            ..account.clone()
        };
        self.account_dao
            .create(
                &AccountEntity::try_from(&account)?,
                ACCOUNT_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        info!("Created account {} with role {}", account.name, account.role);
        Ok(account)
    }
}
