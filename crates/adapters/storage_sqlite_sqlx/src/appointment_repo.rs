//! `SQLite` implementation of [`AppointmentRepository`].

use std::future::Future;
use std::str::FromStr;

use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use slotbook_app::ports::AppointmentRepository;
use slotbook_domain::appointment::Appointment;
use slotbook_domain::error::{BookingError, SlotConflictError};
use slotbook_domain::id::{AppointmentId, ClientId, ProviderId};
use slotbook_domain::time_range::{TimeRange, Timestamp};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Appointment`].
struct Wrapper(Appointment);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Appointment> {
        value.map(|w| w.0)
    }
}

fn decode_err(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

/// A timestamp as its `(seconds, nanos)` column pair.
#[derive(Clone, Copy)]
struct EpochParts {
    secs: i64,
    nanos: u32,
}

impl From<Timestamp> for EpochParts {
    fn from(ts: Timestamp) -> Self {
        Self {
            secs: ts.timestamp(),
            nanos: ts.timestamp_subsec_nanos(),
        }
    }
}

fn read_instant(row: &SqliteRow, secs: &str, nanos: &str) -> Result<Timestamp, sqlx::Error> {
    let secs: i64 = row.try_get(secs)?;
    let nanos: i64 = row.try_get(nanos)?;
    u32::try_from(nanos)
        .ok()
        .and_then(|nanos| DateTime::from_timestamp(secs, nanos))
        .ok_or_else(|| {
            sqlx::Error::Decode(format!("unrepresentable instant {secs}s {nanos}ns").into())
        })
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let client_id: String = row.try_get("client_id")?;
        let provider_id: String = row.try_get("provider_id")?;
        let start = read_instant(row, "start_secs", "start_nanos")?;
        let end = read_instant(row, "end_secs", "end_nanos")?;

        let id = AppointmentId::from_str(&id).map_err(decode_err)?;
        let client_id = ClientId::new(client_id).map_err(decode_err)?;
        let provider_id = ProviderId::new(provider_id).map_err(decode_err)?;
        let time_range = TimeRange::restore(start, end).map_err(decode_err)?;

        Ok(Self(Appointment::new(
            id,
            client_id,
            provider_id,
            time_range,
        )))
    }
}

// Single statement, so the overlap check and the write are atomic even when
// several processes share the database file. Row values compare the
// (seconds, nanos) pairs lexicographically.
const INSERT_IF_FREE: &str = r"
    INSERT INTO appointments
        (id, client_id, provider_id, start_secs, start_nanos, end_secs, end_nanos)
    SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7
    WHERE NOT EXISTS (
        SELECT 1 FROM appointments
        WHERE provider_id = ?3
          AND (start_secs, start_nanos) < (?6, ?7)
          AND (?4, ?5) < (end_secs, end_nanos)
    )
";

const SELECT_BY_ID: &str = "SELECT * FROM appointments WHERE id = ?";

const SELECT_CONFLICT: &str = r"
    SELECT * FROM appointments
    WHERE provider_id = ?1
      AND (start_secs, start_nanos) < (?4, ?5)
      AND (?2, ?3) < (end_secs, end_nanos)
    ORDER BY seq ASC
    LIMIT 1
";

const SELECT_BY_CLIENT: &str = "SELECT * FROM appointments WHERE client_id = ? ORDER BY seq ASC";

/// `SQLite`-backed Booking Store.
pub struct SqliteAppointmentRepository {
    pool: SqlitePool,
}

impl SqliteAppointmentRepository {
    /// Create a new repository using the given connection pool.
    ///
    /// The pool must already carry the appointments schema; see
    /// [`Config::open`](crate::pool::Config::open).
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn find_conflict(
    pool: &SqlitePool,
    provider_id: &str,
    start: EpochParts,
    end: EpochParts,
) -> Result<Option<Appointment>, StorageError> {
    let row: Option<Wrapper> = sqlx::query_as(SELECT_CONFLICT)
        .bind(provider_id)
        .bind(start.secs)
        .bind(start.nanos)
        .bind(end.secs)
        .bind(end.nanos)
        .fetch_optional(pool)
        .await?;
    Ok(Wrapper::maybe(row))
}

impl AppointmentRepository for SqliteAppointmentRepository {
    fn save(
        &self,
        appointment: Appointment,
    ) -> impl Future<Output = Result<Appointment, BookingError>> + Send {
        let pool = self.pool.clone();
        async move {
            let start = EpochParts::from(appointment.time_range().start());
            let end = EpochParts::from(appointment.time_range().end());

            let inserted = sqlx::query(INSERT_IF_FREE)
                .bind(appointment.id().to_string())
                .bind(appointment.client_id().as_str())
                .bind(appointment.provider_id().as_str())
                .bind(start.secs)
                .bind(start.nanos)
                .bind(end.secs)
                .bind(end.nanos)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?
                .rows_affected();

            if inserted == 0 {
                let existing =
                    find_conflict(&pool, appointment.provider_id().as_str(), start, end)
                        .await?
                        .ok_or(StorageError::InsertRefused(appointment.id()))?;
                return Err(SlotConflictError {
                    existing: existing.id(),
                }
                .into());
            }

            Ok(appointment)
        }
    }

    fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> impl Future<Output = Result<Option<Appointment>, BookingError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_by_provider_and_range(
        &self,
        provider_id: &ProviderId,
        range: &TimeRange,
    ) -> impl Future<Output = Result<Option<Appointment>, BookingError>> + Send {
        let pool = self.pool.clone();
        let provider_id = provider_id.as_str().to_owned();
        let start = EpochParts::from(range.start());
        let end = EpochParts::from(range.end());
        async move {
            find_conflict(&pool, &provider_id, start, end)
                .await
                .map_err(BookingError::from)
        }
    }

    fn find_all_by_client(
        &self,
        client_id: &ClientId,
    ) -> impl Future<Output = Result<Vec<Appointment>, BookingError>> + Send {
        let pool = self.pool.clone();
        let client_id = client_id.as_str().to_owned();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_CLIENT)
                .bind(client_id)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}
