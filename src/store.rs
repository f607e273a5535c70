//! src/store.rs
use crate::domain::{Birthday, Employee, EmployeeEmail, EmployeeName, ValidationError};
use chrono::NaiveDate;
use sqlx::PgPool;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Failed to reach the employee database")]
    Connection(#[source] sqlx::Error),
    #[error("No employee with email {0}")]
    NotFound(String),
    #[error("Unexpected database error")]
    Unexpected(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => StoreError::Connection(e),
            e => StoreError::Unexpected(e),
        }
    }
}

/// A row of the `employees` table as stored.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EmployeeRecord {
    pub email: String,
    pub name: String,
    pub birthday: NaiveDate,
}

impl EmployeeRecord {
    /// Re-validates a stored row. `today` bounds the birthday as on insert.
    pub fn into_employee(self, today: NaiveDate) -> Result<Employee, ValidationError> {
        Ok(Employee {
            email: EmployeeEmail::parse(self.email)?,
            name: EmployeeName::parse(self.name)?,
            birthday: Birthday::from_date(self.birthday, today)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Inserted,
    Updated,
}

#[tracing::instrument(
    name = "Saving employee details in the database",
    skip(pool, employee),
    fields(employee_email = %employee.email)
)]
pub async fn upsert_employee(pool: &PgPool, employee: &Employee) -> Result<Upserted, StoreError> {
    // `xmax` is zero only for a row version created by an insert.
    let inserted: bool = sqlx::query_scalar(
        r#"
        INSERT INTO employees (email, name, birthday)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE
        SET name = EXCLUDED.name,
            birthday = EXCLUDED.birthday,
            updated_at = now()
        RETURNING (xmax = 0)
        "#,
    )
    .bind(employee.email.as_ref())
    .bind(employee.name.as_ref())
    .bind(employee.birthday.date())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:#?}", e);
        e
    })?;

    Ok(if inserted {
        Upserted::Inserted
    } else {
        Upserted::Updated
    })
}

#[tracing::instrument(name = "Get employee by email", skip(pool))]
pub async fn find_employee(
    pool: &PgPool,
    email: &EmployeeEmail,
) -> Result<Option<EmployeeRecord>, StoreError> {
    let record = sqlx::query_as::<_, EmployeeRecord>(
        r#"
        SELECT email, name, birthday
        FROM employees
        WHERE email = $1
        "#,
    )
    .bind(email.as_ref())
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Partial, case-insensitive match on the name, or an exact match on the email.
/// Emails are stored lowercased, so the email match ignores case too.
/// An empty query lists everyone.
#[tracing::instrument(name = "Search employees", skip(pool))]
pub async fn search_employees(
    pool: &PgPool,
    query: &str,
) -> Result<Vec<EmployeeRecord>, StoreError> {
    let query = query.trim();
    let pattern = format!("%{}%", escape_like(query));

    let records = sqlx::query_as::<_, EmployeeRecord>(
        r#"
        SELECT email, name, birthday
        FROM employees
        WHERE name ILIKE $1 OR email = lower($2)
        ORDER BY name, email
        "#,
    )
    .bind(pattern)
    .bind(query)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

#[tracing::instrument(name = "Delete employee", skip(pool))]
pub async fn delete_employee(pool: &PgPool, email: &EmployeeEmail) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM employees WHERE email = $1")
        .bind(email.as_ref())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(email.to_string()));
    }

    Ok(())
}

#[tracing::instrument(name = "Get employees born on a given day", skip(pool))]
pub async fn employees_born_on(
    pool: &PgPool,
    month: u32,
    day: u32,
) -> Result<Vec<EmployeeRecord>, StoreError> {
    let records = sqlx::query_as::<_, EmployeeRecord>(
        r#"
        SELECT email, name, birthday
        FROM employees
        WHERE EXTRACT(MONTH FROM birthday)::int = $1
          AND EXTRACT(DAY FROM birthday)::int = $2
        ORDER BY name
        "#,
    )
    .bind(month as i32)
    .bind(day as i32)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
