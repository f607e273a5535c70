//! src/domain/employee/birthday.rs
use chrono::{Datelike, NaiveDate};

const FORMAT: &str = "%Y-%m-%d";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("A birthday must not be empty")]
    Empty,
    #[error("{0} is not a date in the YYYY-MM-DD format")]
    Unparseable(String),
    #[error("A birthday must not be before 1900-01-01")]
    TooEarly,
    #[error("A birthday must not be in the future")]
    InTheFuture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// `today` is the current date in the target timezone, the latest valid birthday.
    pub fn parse(s: String, today: NaiveDate) -> Result<Self, Error> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Empty);
        }

        let date = NaiveDate::parse_from_str(s, FORMAT)
            .map_err(|_| Error::Unparseable(s.to_string()))?;

        Self::from_date(date, today)
    }

    pub fn from_date(date: NaiveDate, today: NaiveDate) -> Result<Self, Error> {
        if date.year() < 1900 {
            return Err(Error::TooEarly);
        }

        if date > today {
            return Err(Error::InTheFuture);
        }

        Ok(Self(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl std::fmt::Display for Birthday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}
