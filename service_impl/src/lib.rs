use std::sync::Arc;

use async_trait::async_trait;
use service::permission::MockContext;

pub mod account;
pub mod booking;
pub mod booking_filter;
pub mod clock;
pub mod macros;
pub mod pagination;
pub mod permission;
#[cfg(test)]
mod test;
pub mod uuid_service;

/// Resolves every request to one fixed user. Used with mock authentication.
pub struct UserServiceDev {
    username: Arc<str>,
}
impl UserServiceDev {
    pub fn new(username: impl Into<Arc<str>>) -> Self {
        Self {
            username: username.into(),
        }
    }
}
impl Default for UserServiceDev {
    fn default() -> Self {
        Self::new("DEVUSER")
    }
}

#[async_trait]
impl service::user_service::UserService for UserServiceDev {
    type Context = MockContext;

    async fn current_user(
        &self,
        _context: Self::Context,
    ) -> Result<Arc<str>, service::ServiceError> {
        Ok(self.username.clone())
    }
}
