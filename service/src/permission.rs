use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::MockTransaction;
use mockall::automock;
use uuid::Uuid;

use crate::ServiceError;

/// Role name of accounts which may only see and manage their own bookings.
pub const RESTRICTED_ROLE: &str = "USER";
/// Role name given to the development admin account.
pub const ADMIN_ROLE: &str = "ADMIN";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Restricted,
    Elevated,
}
impl Role {
    pub fn from_name(name: &str) -> Self {
        if name == RESTRICTED_ROLE {
            Role::Restricted
        } else {
            Role::Elevated
        }
    }

    pub fn is_restricted(&self) -> bool {
        *self == Role::Restricted
    }
}

/// The resolved user behind a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub name: Arc<str>,
    pub role: Role,
}
impl Actor {
    /// Actor used for [`Authentication::Full`].
    pub fn system() -> Self {
        Self {
            id: Uuid::nil(),
            name: "system".into(),
            role: Role::Elevated,
        }
    }

    /// Restricted actors only have access to what they own.
    pub fn can_access(&self, owner_id: Uuid) -> bool {
        !self.role.is_restricted() || self.id == owner_id
    }

    pub fn ensure_access(&self, owner_id: Uuid) -> Result<(), ServiceError> {
        if self.can_access(owner_id) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockContext;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authentication<Context: Clone + PartialEq + Eq + Send + Sync + Debug + 'static> {
    Full,
    Context(Context),
}
impl<Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static> From<Context>
    for Authentication<Context>
{
    fn from(context: Context) -> Self {
        Self::Context(context)
    }
}

#[automock(type Context=(); type Transaction=MockTransaction;)]
#[async_trait]
pub trait PermissionService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Resolves the actor for the given context.
    ///
    /// Fails with [`ServiceError::Unauthorized`] if the context does not
    /// belong to a known account.
    async fn current_actor(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Actor, ServiceError>;

    /// Like [`PermissionService::current_actor`] but fails with
    /// [`ServiceError::Forbidden`] for restricted actors.
    async fn check_elevated(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Actor, ServiceError>;
}
