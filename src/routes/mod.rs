//! src/routes/mod.rs
mod home;
pub use home::*;

mod employees;
pub use employees::*;

use crate::store::StoreError;
use actix_web::http::{header::LOCATION, StatusCode};
use actix_web::{HttpResponse, ResponseError};

#[derive(thiserror::Error)]
pub enum AdminError {
    #[error("The employee database is unavailable")]
    Unavailable(#[source] StoreError),
    #[error("Something went wrong")]
    Unexpected(#[source] StoreError),
}

impl From<StoreError> for AdminError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Connection(_) => AdminError::Unavailable(e),
            e => AdminError::Unexpected(e),
        }
    }
}

impl std::fmt::Debug for AdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for AdminError {
    fn status_code(&self) -> StatusCode {
        match self {
            AdminError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AdminError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
