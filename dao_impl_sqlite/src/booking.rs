use std::sync::Arc;

use crate::{ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    booking::{BookingDao, BookingEntity},
    DaoError,
};
use sqlx::{query, query_as, FromRow};
use time::{format_description::well_known::Iso8601, Date, PrimitiveDateTime};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, owner_id, start_date, end_date, cost_per_day, post_code, city, street, created, deleted, update_version";

#[derive(Debug, FromRow)]
struct BookingDb {
    id: Vec<u8>,
    owner_id: Vec<u8>,
    start_date: String,
    end_date: String,
    cost_per_day: f64,
    post_code: String,
    city: String,
    street: String,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}
impl TryFrom<&BookingDb> for BookingEntity {
    type Error = DaoError;
    fn try_from(booking: &BookingDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(booking.id.as_ref())?,
            owner_id: Uuid::from_slice(booking.owner_id.as_ref())?,
            start_date: Date::parse(&booking.start_date, &Iso8601::DATE)?,
            end_date: Date::parse(&booking.end_date, &Iso8601::DATE)?,
            cost_per_day: booking.cost_per_day,
            post_code: booking.post_code.as_str().into(),
            city: booking.city.as_str().into(),
            street: booking.street.as_str().into(),
            created: PrimitiveDateTime::parse(&booking.created, &Iso8601::DATE_TIME)?,
            deleted: booking
                .deleted
                .as_ref()
                .map(|deleted| PrimitiveDateTime::parse(deleted, &Iso8601::DATE_TIME))
                .transpose()?,
            version: Uuid::from_slice(&booking.update_version)?,
        })
    }
}

pub struct BookingDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl BookingDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl BookingDao for BookingDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[BookingEntity]>, DaoError> {
        query_as::<_, BookingDb>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM booking WHERE deleted IS NULL ORDER BY rowid"
        ))
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(BookingEntity::try_from)
        .collect::<Result<Arc<[BookingEntity]>, DaoError>>()
    }

    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[BookingEntity]>, DaoError> {
        let owner_id_vec = owner_id.as_bytes().to_vec();
        query_as::<_, BookingDb>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM booking WHERE owner_id = ? AND deleted IS NULL ORDER BY rowid"
        ))
        .bind(owner_id_vec)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(BookingEntity::try_from)
        .collect::<Result<Arc<[BookingEntity]>, DaoError>>()
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<BookingEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        query_as::<_, BookingDb>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM booking WHERE id = ? AND deleted IS NULL"
        ))
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(BookingEntity::try_from)
        .transpose()
    }

    async fn create(
        &self,
        entity: &BookingEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let id_vec = entity.id.as_bytes().to_vec();
        let owner_id_vec = entity.owner_id.as_bytes().to_vec();
        let start_date = entity.start_date.format(&Iso8601::DATE)?;
        let end_date = entity.end_date.format(&Iso8601::DATE)?;
        let created = entity.created.format(&Iso8601::DATE_TIME)?;
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()?;
        let version_vec = entity.version.as_bytes().to_vec();
        query("INSERT INTO booking (id, owner_id, start_date, end_date, cost_per_day, post_code, city, street, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(id_vec)
            .bind(owner_id_vec)
            .bind(start_date)
            .bind(end_date)
            .bind(entity.cost_per_day)
            .bind(entity.post_code.as_ref())
            .bind(entity.city.as_ref())
            .bind(entity.street.as_ref())
            .bind(created)
            .bind(deleted)
            .bind(version_vec)
            .bind(process)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &BookingEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let id_vec = entity.id.as_bytes().to_vec();
        let owner_id_vec = entity.owner_id.as_bytes().to_vec();
        let start_date = entity.start_date.format(&Iso8601::DATE)?;
        let end_date = entity.end_date.format(&Iso8601::DATE)?;
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()?;
        let version_vec = entity.version.as_bytes().to_vec();
        query(
            "UPDATE booking SET owner_id = ?, start_date = ?, end_date = ?, cost_per_day = ?, post_code = ?, city = ?, street = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?",
        )
        .bind(owner_id_vec)
        .bind(start_date)
        .bind(end_date)
        .bind(entity.cost_per_day)
        .bind(entity.post_code.as_ref())
        .bind(entity.city.as_ref())
        .bind(entity.street.as_ref())
        .bind(deleted)
        .bind(version_vec)
        .bind(process)
        .bind(id_vec)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }
}
