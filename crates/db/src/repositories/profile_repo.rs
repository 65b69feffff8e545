//! Repository for the `profiles` table.

use fyptrack_core::roles::{ROLE_GUIDE, ROLE_HOD};
use fyptrack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::profile::{CreateProfile, Profile, ProfileResponse};

/// Full column list, including credentials.
const COLUMNS: &str = "id, name, email, password_hash, role, department, designation, \
                       roll_number, year, is_active, failed_login_count, locked_until, \
                       last_login_at, created_at, updated_at";

/// Columns safe to return to clients.
const PUBLIC_COLUMNS: &str = "id, name, email, role, department, designation, roll_number, \
                              year, is_active, last_login_at, created_at";

/// Provides account and directory queries over profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a new profile, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles
                (name, email, password_hash, role, department, designation, roll_number, year)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .bind(&input.department)
            .bind(&input.designation)
            .bind(&input.roll_number)
            .bind(input.year)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive email lookup.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, Profile>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Every profile, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProfileResponse>, sqlx::Error> {
        let query = format!("SELECT {PUBLIC_COLUMNS} FROM profiles ORDER BY created_at DESC");
        sqlx::query_as::<_, ProfileResponse>(&query)
            .fetch_all(pool)
            .await
    }

    /// Profiles with `role`, optionally restricted to one department, by name.
    pub async fn list_by_role(
        pool: &PgPool,
        role: &str,
        department: Option<&str>,
    ) -> Result<Vec<ProfileResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {PUBLIC_COLUMNS} FROM profiles
             WHERE role = $1 AND is_active = true
               AND ($2::TEXT IS NULL OR department = $2)
             ORDER BY name"
        );
        sqlx::query_as::<_, ProfileResponse>(&query)
            .bind(role)
            .bind(department)
            .fetch_all(pool)
            .await
    }

    /// Look up a profile and require it to hold `role`.
    pub async fn find_with_role(
        pool: &PgPool,
        id: DbId,
        role: &str,
    ) -> Result<Option<ProfileResponse>, sqlx::Error> {
        let query = format!("SELECT {PUBLIC_COLUMNS} FROM profiles WHERE id = $1 AND role = $2");
        sqlx::query_as::<_, ProfileResponse>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_guide(pool: &PgPool, id: DbId) -> Result<Option<ProfileResponse>, sqlx::Error> {
        Self::find_with_role(pool, id, ROLE_GUIDE).await
    }

    /// The earliest-registered HOD of a department.
    pub async fn find_first_hod(
        pool: &PgPool,
        department: &str,
    ) -> Result<Option<ProfileResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {PUBLIC_COLUMNS} FROM profiles
             WHERE role = $1 AND department = $2
             ORDER BY id
             LIMIT 1"
        );
        sqlx::query_as::<_, ProfileResponse>(&query)
            .bind(ROLE_HOD)
            .bind(department)
            .fetch_optional(pool)
            .await
    }

    /// Increment the failed login counter by 1, returning the new count.
    ///
    /// A lock that has already expired is cleared first, so counting starts
    /// again from 1 instead of re-locking on the next mistake.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE profiles SET
                failed_login_count = CASE
                    WHEN locked_until IS NOT NULL AND locked_until <= NOW() THEN 1
                    ELSE failed_login_count + 1
                END,
                locked_until = CASE
                    WHEN locked_until IS NOT NULL AND locked_until <= NOW() THEN NULL
                    ELSE locked_until
                END
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Lock an account until the specified timestamp.
    pub async fn lock_account(pool: &PgPool, id: DbId, until: Timestamp) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE profiles SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset the failure counter, clear any lock and stamp `last_login_at`.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE profiles SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
