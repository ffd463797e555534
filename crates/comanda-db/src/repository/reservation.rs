//! # Reservation Repository
//!
//! Table bookings. Purely informational: a reservation never changes a
//! table's status and never blocks an order. Overlapping bookings for
//! the same table are accepted as-is.

use comanda_core::validation::{normalize_notes, validate_name};
use comanda_core::{NewReservation, Reservation};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for reservations.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: SqlitePool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReservationRepository { pool }
    }

    /// Records a booking.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown table
    pub async fn create(&self, new: &NewReservation) -> DbResult<Reservation> {
        let customer_name = new.customer_name.trim();
        validate_name("customer_name", customer_name)?;
        let customer_phone = new
            .customer_phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        let notes = normalize_notes(new.notes.as_deref())?;

        debug!(
            table_id = new.table_id,
            reserved_at = %new.reserved_at,
            "Creating reservation"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO reservations (table_id, customer_name, customer_phone, reserved_at, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(new.table_id)
        .bind(customer_name)
        .bind(&customer_phone)
        .bind(new.reserved_at)
        .bind(&notes)
        .execute(&self.pool)
        .await?;

        Ok(Reservation {
            id: result.last_insert_rowid(),
            table_id: new.table_id,
            customer_name: customer_name.to_string(),
            customer_phone,
            reserved_at: new.reserved_at,
            notes,
        })
    }

    /// Lists bookings by reservation time, earliest first.
    pub async fn list(&self) -> DbResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, table_id, customer_name, customer_phone, reserved_at, notes
            FROM reservations
            ORDER BY reserved_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Number of reservations.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
