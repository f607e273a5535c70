//! src/domain/employee/mod.rs
mod birthday;
pub use birthday::Birthday;

mod email;
pub use email::EmployeeEmail;

mod name;
pub use name::EmployeeName;

use crate::routes::EmployeeForm;
use chrono::NaiveDate;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error(transparent)]
    Name(#[from] name::Error),
    #[error(transparent)]
    Email(#[from] email::Error),
    #[error(transparent)]
    Birthday(#[from] birthday::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub email: EmployeeEmail,
    pub name: EmployeeName,
    pub birthday: Birthday,
}

impl Employee {
    /// `today` bounds the birthday and is the current date in the target timezone.
    pub fn parse(
        email: String,
        name: String,
        birthday: String,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            email: EmployeeEmail::parse(email)?,
            name: EmployeeName::parse(name)?,
            birthday: Birthday::parse(birthday, today)?,
        })
    }

    pub fn from_form(form: EmployeeForm, today: NaiveDate) -> Result<Self, ValidationError> {
        Self::parse(form.email, form.name, form.birthday, today)
    }
}
