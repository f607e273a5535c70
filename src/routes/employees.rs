//! src/routes/employees.rs
use crate::domain::{Employee, EmployeeEmail};
use crate::routes::{see_other, AdminError};
use crate::store::{self, EmployeeRecord, StoreError, Upserted};
use crate::wisher::today_in;
use actix_web::{http::header::ContentType, web, HttpResponse};
use chrono::{FixedOffset, Utc};
use actix_web_flash_messages::FlashMessage;
use sqlx::PgPool;
use std::fmt::Write;
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct EmployeeForm {
    pub email: String,
    pub name: String,
    pub birthday: String,
}

#[tracing::instrument(
    name = "Saving an employee",
    skip(form, pool, offset),
    fields(
        request_id = %Uuid::new_v4(),
        employee_email = %form.email,
        employee_name = %form.name
    )
)]
pub async fn save_employee(
    form: web::Form<EmployeeForm>,
    pool: web::Data<PgPool>,
    offset: web::Data<FixedOffset>,
) -> Result<HttpResponse, AdminError> {
    let today = today_in(**offset, Utc::now());
    let employee = match Employee::from_form(form.into_inner(), today) {
        Ok(employee) => employee,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return Ok(see_other("/"));
        }
    };

    let message = match store::upsert_employee(&pool, &employee).await? {
        Upserted::Inserted => format!("Added {}.", employee.name),
        Upserted::Updated => format!("Updated {}.", employee.name),
    };
    FlashMessage::info(message).send();

    Ok(see_other("/"))
}

#[derive(serde::Deserialize)]
pub struct SearchParameters {
    #[serde(default)]
    query: String,
}

#[tracing::instrument(name = "Searching employees", skip(parameters, pool), fields(query = %parameters.query))]
pub async fn search_employees(
    parameters: web::Query<SearchParameters>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AdminError> {
    let records = store::search_employees(&pool, &parameters.query).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_search_results(&parameters.query, &records)))
}

fn render_search_results(query: &str, records: &[EmployeeRecord]) -> String {
    let results_html = if records.is_empty() {
        "<p>No employee records found.</p>".to_string()
    } else {
        let mut rows = String::new();
        for record in records {
            let _ = writeln!(
                rows,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                htmlescape::encode_minimal(&record.name),
                htmlescape::encode_minimal(&record.email),
                record.birthday.format("%B %d, %Y")
            );
        }
        format!(
            "<table>\n<tr><th>Name</th><th>Email</th><th>Birthday</th></tr>\n{}</table>",
            rows
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8">
    <title>Employee Finder</title>
</head>
<body>
    <form action="/employees" method="get">
        <input type="search" name="query" value="{query}">
        <button type="submit">Search</button>
    </form>
    {results_html}
    <p><a href="/">&lt;- Back</a></p>
</body>
</html>"#,
        query = htmlescape::encode_attribute(query),
    )
}

#[derive(serde::Deserialize)]
pub struct DeleteForm {
    pub email: String,
}

#[tracing::instrument(
    name = "Deleting an employee",
    skip(form, pool),
    fields(request_id = %Uuid::new_v4(), employee_email = %form.email)
)]
pub async fn delete_employee(
    form: web::Form<DeleteForm>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AdminError> {
    let email = match EmployeeEmail::parse(form.into_inner().email) {
        Ok(email) => email,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return Ok(see_other("/"));
        }
    };

    match store::delete_employee(&pool, &email).await {
        Ok(()) => FlashMessage::info(format!("Deleted {}.", email)).send(),
        Err(e @ StoreError::NotFound(_)) => FlashMessage::error(format!("{}.", e)).send(),
        Err(e) => return Err(e.into()),
    }

    Ok(see_other("/"))
}
