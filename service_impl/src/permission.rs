use async_trait::async_trait;
use dao::{account::AccountDao, TransactionDao};
use service::{
    permission::{Actor, Authentication, Role},
    user_service::UserService,
    PermissionService, ServiceError,
};
use tracing::{debug, instrument, warn};

use crate::gen_service_impl;

gen_service_impl! {
    struct PermissionServiceImpl: PermissionService = PermissionServiceDeps {
        AccountDao: AccountDao<Transaction = Self::Transaction> = account_dao,
        UserService: UserService<Context = Self::Context> = user_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

#[async_trait]
impl<Deps: PermissionServiceDeps> PermissionService for PermissionServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    #[instrument(skip(self, tx))]
    async fn current_actor(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Actor, ServiceError> {
        let context = match context {
            Authentication::Full => return Ok(Actor::system()),
            Authentication::Context(context) => context,
        };
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let username = self.user_service.current_user(context).await?;
        let account = self
            .account_dao
            .find_by_name(username.as_ref(), tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;

        let Some(account) = account else {
            warn!("No account for user {}", username);
            return Err(ServiceError::Unauthorized);
        };
        let actor = Actor {
            id: account.id,
            name: account.name.clone(),
            role: Role::from_name(&account.role),
        };
        debug!("Resolved actor {:?}", actor);
        Ok(actor)
    }

    async fn check_elevated(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Actor, ServiceError> {
        let actor = self.current_actor(context, tx).await?;
        if actor.role.is_restricted() {
            warn!("User {} requires an elevated role", actor.name);
            return Err(ServiceError::Forbidden);
        }
        Ok(actor)
    }
}
