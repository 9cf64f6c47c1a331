
use std::sync::Arc;

use dao_impl_sqlite::{
    account::AccountDaoImpl, booking::BookingDaoImpl, TransactionDaoImpl, TransactionImpl,
};
use service::{
    account::{Account, AccountService as _},
    permission::{Authentication, ADMIN_ROLE},
    ServiceError,
};
#[cfg(feature = "mock_auth")]
use service::permission::MockContext;
use service_impl::{
    account::AccountServiceDeps, booking::BookingServiceDeps, permission::PermissionServiceDeps,
};
use sqlx::SqlitePool;
use tracing::{error, info};
#[cfg(feature = "json_logging")]
use tracing_subscriber::fmt::format::FmtSpan;
use uuid::Uuid;

#[cfg(feature = "mock_auth")]
type UserService = service_impl::UserServiceDev;
#[cfg(feature = "mock_auth")]
type Context = MockContext;
type Transaction = TransactionImpl;
type TransactionDao = TransactionDaoImpl;
type AccountDao = AccountDaoImpl;
type BookingDao = BookingDaoImpl;
type ClockService = service_impl::clock::ClockServiceImpl;
type UuidService = service_impl::uuid_service::UuidServiceImpl;

pub struct PermissionServiceDependencies;
impl PermissionServiceDeps for PermissionServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type AccountDao = AccountDao;
    type UserService = UserService;
    type TransactionDao = TransactionDao;
}
type PermissionService =
    service_impl::permission::PermissionServiceImpl<PermissionServiceDependencies>;

pub struct AccountServiceDependencies;
impl AccountServiceDeps for AccountServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type AccountDao = AccountDao;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type AccountService = service_impl::account::AccountServiceImpl<AccountServiceDependencies>;

pub struct BookingServiceDependencies;
impl BookingServiceDeps for BookingServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type BookingDao = BookingDao;
    type PermissionService = PermissionService;
    type AccountService = AccountService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type BookingService = service_impl::booking::BookingServiceImpl<BookingServiceDependencies>;

#[derive(Clone)]
pub struct RestStateImpl {
    account_service: Arc<AccountService>,
    booking_service: Arc<BookingService>,
}
impl rest::RestStateDef for RestStateImpl {
    type BookingService = BookingService;
    type AccountService = AccountService;

    fn booking_service(&self) -> Arc<Self::BookingService> {
        self.booking_service.clone()
    }
    fn account_service(&self) -> Arc<Self::AccountService> {
        self.account_service.clone()
    }
}
impl RestStateImpl {
    /// Wires all services on top of the given pool. Every request is
    /// attributed to `username`.
    pub fn new(pool: Arc<SqlitePool>, username: &str) -> Self {
        let transaction_dao = Arc::new(TransactionDao::new(pool.clone()));
        let account_dao = Arc::new(AccountDao::new(pool.clone()));
        let booking_dao = Arc::new(BookingDao::new(pool));
        let clock_service = Arc::new(service_impl::clock::ClockServiceImpl);
        let uuid_service = Arc::new(service_impl::uuid_service::UuidServiceImpl);

        let permission_service = Arc::new(PermissionService {
            account_dao: account_dao.clone(),
            user_service: Arc::new(UserService::new(username)),
            transaction_dao: transaction_dao.clone(),
        });
        let account_service = Arc::new(AccountService {
            account_dao,
            permission_service: permission_service.clone(),
            clock_service: clock_service.clone(),
            uuid_service: uuid_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let booking_service = Arc::new(BookingService {
            booking_dao,
            permission_service,
            account_service: account_service.clone(),
            clock_service,
            uuid_service,
            transaction_dao,
        });

        Self {
            account_service,
            booking_service,
        }
    }
}

/// Runtime settings, read from the environment or a `.env` file.
#[derive(Debug)]
struct Config {
    database_url: String,
    server_address: String,
    dev_admin_user: String,
}
impl Config {
    fn from_env() -> Self {
        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };
        Self {
            database_url: var("DATABASE_URL", "sqlite:./localdb.sqlite3?mode=rwc"),
            server_address: var("SERVER_ADDRESS", "127.0.0.1:3000"),
            dev_admin_user: var("DEV_ADMIN_USER", "DEVUSER"),
        }
    }
}

/// Makes sure an elevated account named `username` exists.
async fn create_dev_admin_user(
    rest_state: &RestStateImpl,
    username: &str,
) -> Result<(), ServiceError> {
    let account_service = rest_state.account_service.clone();
    let accounts = account_service.get_all(Authentication::Full, None).await?;
    if accounts.iter().any(|account| account.name.as_ref() == username) {
        return Ok(());
    }
    let account = account_service
        .create(
            &Account {
                id: Uuid::nil(),
                name: username.into(),
                role: ADMIN_ROLE.into(),
                created: None,
                deleted: None,
                version: Uuid::nil(),
            },
            Authentication::Full,
            None,
        )
        .await?;
    info!("Created development account {} ({})", account.name, account.id);
    Ok(())
}

#[tokio::main]
async fn main() {
    let version = env!("CARGO_PKG_VERSION");

    #[cfg(feature = "local_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .pretty()
        .with_file(true)
        .finish();

    #[cfg(feature = "json_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_span_list(true)
        .with_file(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Booking backend version: {}", version);
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    info!("Configuration: {:?}", config);

    let pool = Arc::new(
        SqlitePool::connect(&config.database_url)
            .await
            .expect("Could not connect to database"),
    );
    sqlx::migrate!("../migrations/sqlite")
        .run(pool.as_ref())
        .await
        .expect("Failed to run migrations");

    let rest_state = RestStateImpl::new(pool, &config.dev_admin_user);
    create_dev_admin_user(&rest_state, &config.dev_admin_user)
        .await
        .expect("Expected being able to create the development account");

    if let Err(err) = rest::start_server(rest_state, &config.server_address).await {
        error!("Server stopped: {}", err);
    }
}
