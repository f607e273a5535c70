//! src/wisher.rs
//!
//! Once per invocation: work out "today" in the target timezone, read every
//! employee born on that month/day and send each of them one birthday email.
//! A failed send is recorded and the run moves on to the next employee. Only
//! a store failure aborts the run.
use crate::domain::{Employee, EmployeeEmail};
use crate::email::{Mailer, NotificationError};
use crate::store::{self, StoreError};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};
use serde::Deserialize;
use sqlx::PgPool;

/// When Feb 29 birthdays are celebrated in non-leap years.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeapDayPolicy {
    #[default]
    Feb28,
    Mar1,
    Never,
}

pub fn today_in(offset: FixedOffset, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// The (month, day) pairs whose birthdays are celebrated on a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDays {
    date: NaiveDate,
    days: Vec<(u32, u32)>,
}

impl MatchDays {
    pub fn for_date(date: NaiveDate, policy: LeapDayPolicy) -> Self {
        let today = (date.month(), date.day());
        let mut days = vec![today];

        if !is_leap_year(date.year()) {
            let stand_in = match policy {
                LeapDayPolicy::Feb28 => Some((2, 28)),
                LeapDayPolicy::Mar1 => Some((3, 1)),
                LeapDayPolicy::Never => None,
            };
            if stand_in == Some(today) {
                days.push((2, 29));
            }
        }

        Self { date, days }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn contains(&self, birthday: NaiveDate) -> bool {
        self.days.contains(&(birthday.month(), birthday.day()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.days.iter().copied()
    }
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

#[derive(Debug)]
pub struct NotificationFailure {
    pub email: EmployeeEmail,
    pub error: NotificationError,
}

#[derive(Debug)]
pub struct WishReport {
    pub date: NaiveDate,
    pub matched: usize,
    pub sent: Vec<EmployeeEmail>,
    pub failures: Vec<NotificationFailure>,
}

impl WishReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// How a daily run ended, as reported to the scheduler through the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// The store could not be read, so nobody was wished.
    Aborted,
    /// Every match was attempted but some emails were not delivered.
    NotificationsFailed,
}

impl RunStatus {
    pub fn of(outcome: &Result<WishReport, StoreError>) -> Self {
        match outcome {
            Ok(report) if report.is_success() => RunStatus::Success,
            Ok(_) => RunStatus::NotificationsFailed,
            Err(_) => RunStatus::Aborted,
        }
    }

    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Aborted => 1,
            RunStatus::NotificationsFailed => 2,
        }
    }
}

impl From<RunStatus> for std::process::ExitCode {
    fn from(status: RunStatus) -> Self {
        std::process::ExitCode::from(status.exit_code())
    }
}

#[tracing::instrument(name = "Find employees with a birthday", skip(pool, match_days), fields(date = %match_days.date()))]
pub async fn find_birthday_employees(
    pool: &PgPool,
    match_days: &MatchDays,
) -> Result<Vec<Employee>, StoreError> {
    let mut employees = Vec::new();

    for (month, day) in match_days.iter() {
        for record in store::employees_born_on(pool, month, day).await? {
            let email = record.email.clone();
            match record.into_employee(match_days.date()) {
                Ok(employee) => employees.push(employee),
                Err(e) => {
                    tracing::warn!(
                        error.cause_chain = ?e,
                        "Skipping employee {} because {}", email, e);
                }
            }
        }
    }

    Ok(employees)
}

#[tracing::instrument(name = "Wish happy birthday", skip(pool, mailer, match_days), fields(date = %match_days.date()))]
pub async fn wish_happy_birthdays(
    pool: &PgPool,
    mailer: &Mailer,
    match_days: &MatchDays,
) -> Result<WishReport, StoreError> {
    let employees = find_birthday_employees(pool, match_days).await?;
    tracing::info!("Found {} employees with a birthday today", employees.len());

    let mut report = WishReport {
        date: match_days.date(),
        matched: employees.len(),
        sent: Vec::new(),
        failures: Vec::new(),
    };

    for employee in employees {
        match mailer.send_birthday_email(&employee).await {
            Ok(()) => {
                tracing::info!("Sent a birthday email to {}", employee.email);
                report.sent.push(employee.email);
            }
            Err(error) => {
                tracing::error!(
                    error.cause_chain = ?error,
                    "Failed to send a birthday email to {}", employee.email);
                report.failures.push(NotificationFailure {
                    email: employee.email,
                    error,
                });
            }
        }
    }

    Ok(report)
}

/// The UTC wall-clock time at which `local_time` occurs in the target timezone.
pub fn trigger_time_utc(offset: FixedOffset, local_time: NaiveTime) -> NaiveTime {
    let (utc, _) = local_time
        .overflowing_sub_signed(chrono::Duration::seconds(offset.local_minus_utc() as i64));
    utc
}

pub fn cron_expression(utc_time: NaiveTime) -> String {
    format!("{} {} * * *", utc_time.minute(), utc_time.hour())
}
