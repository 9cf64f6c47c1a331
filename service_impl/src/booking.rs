use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    booking::{BookingDao, BookingEntity},
    TransactionDao,
};
use service::{
    account::AccountService,
    booking::{Booking, BookingFilter, BookingPage, BookingService, PageRequest},
    clock::ClockService,
    permission::{Actor, Authentication},
    uuid_service::UuidService,
    PermissionService, ServiceError, ValidationFailureItem,
};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::booking_filter::BookingPredicate;
use crate::gen_service_impl;
use crate::pagination::paginate;

gen_service_impl! {
    struct BookingServiceImpl: BookingService = BookingServiceDeps {
        BookingDao: BookingDao<Transaction = Self::Transaction> = booking_dao,
        PermissionService: PermissionService<Context = Self::Context, Transaction = Self::Transaction> = permission_service,
        AccountService: AccountService<Context = Self::Context, Transaction = Self::Transaction> = account_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const BOOKING_SERVICE_PROCESS: &str = "booking-service";

fn ensure_owner(actor: &Actor, owner_id: Uuid) -> Result<(), ServiceError> {
    actor.ensure_access(owner_id).inspect_err(|_| {
        warn!(
            "User {} is not allowed to access bookings of {}",
            actor.name, owner_id
        )
    })
}

fn validate(booking: &Booking) -> Result<(), ServiceError> {
    if booking.start_date > booking.end_date {
        return Err(ServiceError::DateOrderWrong(
            booking.start_date,
            booking.end_date,
        ));
    }
    let mut validation = Vec::with_capacity(4);
    if booking.cost_per_day.is_nan() || booking.cost_per_day < 0.0 {
        validation.push(ValidationFailureItem::InvalidValue("cost_per_day".into()));
    }
    if booking.post_code.trim().is_empty() {
        validation.push(ValidationFailureItem::InvalidValue("post_code".into()));
    }
    if booking.city.trim().is_empty() {
        validation.push(ValidationFailureItem::InvalidValue("city".into()));
    }
    if booking.street.trim().is_empty() {
        validation.push(ValidationFailureItem::InvalidValue("street".into()));
    }
    if validation.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::ValidationError(validation.into()))
    }
}

impl<Deps: BookingServiceDeps> BookingServiceImpl<Deps> {
    /// Fills in the owner names. Each owner is looked up once.
    async fn resolve_usernames(
        &self,
        mut bookings: Vec<Booking>,
        tx: Deps::Transaction,
    ) -> Result<Vec<Booking>, ServiceError> {
        let mut usernames: HashMap<Uuid, Option<Arc<str>>> = HashMap::new();
        for booking in bookings.iter_mut() {
            let username = match usernames.get(&booking.owner_id) {
                Some(username) => username.clone(),
                None => {
                    let username = self
                        .account_service
                        .get_username(booking.owner_id, Authentication::Full, Some(tx.clone()))
                        .await?;
                    usernames.insert(booking.owner_id, username.clone());
                    username
                }
            };
            booking.username = username;
        }
        Ok(bookings)
    }

    async fn owner_username(
        &self,
        owner_id: Uuid,
        tx: Deps::Transaction,
    ) -> Result<Arc<str>, ServiceError> {
        self.account_service
            .get_username(owner_id, Authentication::Full, Some(tx))
            .await?
            .ok_or_else(|| {
                ServiceError::ValidationError(
                    [ValidationFailureItem::InvalidValue("owner_id".into())].into(),
                )
            })
    }

    async fn find_accessible(
        &self,
        id: Uuid,
        actor: &Actor,
        tx: Deps::Transaction,
    ) -> Result<BookingEntity, ServiceError> {
        let entity = self
            .booking_dao
            .find_by_id(id, tx)
            .await?
            .ok_or(ServiceError::EntityNotFound(id))?;
        ensure_owner(actor, entity.owner_id)?;
        Ok(entity)
    }
}

#[async_trait]
impl<Deps: BookingServiceDeps> BookingService for BookingServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    #[instrument(skip(self, tx))]
    async fn get_all(
        &self,
        filter: &BookingFilter,
        page: PageRequest,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<BookingPage, ServiceError> {
        let predicate = BookingPredicate::try_from(filter)?;
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let actor = self
            .permission_service
            .current_actor(context, Some(tx.clone()))
            .await?;
        let entities = if actor.role.is_restricted() {
            self.booking_dao
                .find_by_owner(actor.id, tx.clone())
                .await?
        } else {
            self.booking_dao.all(tx.clone()).await?
        };
        let bookings = self
            .resolve_usernames(entities.iter().map(Booking::from).collect(), tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;

        let total = bookings.len();
        let filtered = predicate.apply(bookings);
        let page = paginate(&filtered, page);
        debug!(
            "Listing {} of {} filtered out of {} bookings",
            page.items.len(),
            filtered.len(),
            total
        );
        Ok(BookingPage {
            bookings: page.items.into(),
            page_count: page.page_count,
            has_next: page.has_next,
        })
    }

    #[instrument(skip(self, tx))]
    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Booking, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let actor = self
            .permission_service
            .current_actor(context, Some(tx.clone()))
            .await?;
        let entity = self.find_accessible(id, &actor, tx.clone()).await?;
        let booking = Booking {
            username: self
                .account_service
                .get_username(entity.owner_id, Authentication::Full, Some(tx.clone()))
                .await?,
            ..Booking::from(entity)
        };
        self.transaction_dao.commit(tx).await?;
        Ok(booking)
    }

    #[instrument(skip(self, tx))]
    async fn create(
        &self,
        booking: &Booking,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Booking, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let actor = self
            .permission_service
            .current_actor(context, Some(tx.clone()))
            .await?;

        if booking.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if booking.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        let owner_id = if booking.owner_id.is_nil() {
            actor.id
        } else {
            booking.owner_id
        };
        ensure_owner(&actor, owner_id)?;
        validate(booking)?;
        let username = self.owner_username(owner_id, tx.clone()).await?;

        let new_booking = Booking {
            id: self.uuid_service.new_uuid("booking-id"),
            version: self.uuid_service.new_uuid("booking-version"),
            owner_id,
            username: Some(username),
            created: Some(self.clock_service.date_time_now()),
            deleted: None,
            ..booking.clone()
        };
        self.booking_dao
            .create(
                &BookingEntity::try_from(&new_booking)?,
                BOOKING_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(new_booking)
    }

    #[instrument(skip(self, tx))]
    async fn update(
        &self,
        id: Uuid,
        booking: &Booking,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Booking, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let actor = self
            .permission_service
            .current_actor(context, Some(tx.clone()))
            .await?;
        let existing = self.find_accessible(id, &actor, tx.clone()).await?;
        let owner_id = if booking.owner_id.is_nil() {
            existing.owner_id
        } else {
            booking.owner_id
        };
        ensure_owner(&actor, owner_id)?;
        validate(booking)?;
        let username = self.owner_username(owner_id, tx.clone()).await?;

        let updated = BookingEntity {
            owner_id,
            start_date: booking.start_date,
            end_date: booking.end_date,
            cost_per_day: booking.cost_per_day,
            post_code: booking.post_code.clone(),
            city: booking.city.clone(),
            street: booking.street.clone(),
            version: self.uuid_service.new_uuid("booking-version"),
            ..existing
        };
        self.booking_dao
            .update(&updated, BOOKING_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(Booking {
            username: Some(username),
            ..Booking::from(updated)
        })
    }

    #[instrument(skip(self, tx))]
    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let actor = self
            .permission_service
            .current_actor(context, Some(tx.clone()))
            .await?;
        let mut entity = self.find_accessible(id, &actor, tx.clone()).await?;
        entity.deleted = Some(self.clock_service.date_time_now());
        entity.version = self.uuid_service.new_uuid("booking-version");
        self.booking_dao
            .update(&entity, BOOKING_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }
}
