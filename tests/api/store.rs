//! tests/api/store.rs

use crate::helpers::setup;
use birthday_wisher::domain::{Employee, EmployeeEmail};
use birthday_wisher::store::{self, EmployeeRecord, StoreError, Upserted};
use chrono::NaiveDate;
use claims::{assert_none, assert_ok};

fn email(s: &str) -> EmployeeEmail {
    EmployeeEmail::parse(s.to_string()).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn an_upserted_employee_can_be_found_by_email() {
    // Arrange
    let app = setup().await;

    // Act
    let employee = app.add_employee("emily@example.com", "Emily Clark", "1990-06-15").await;
    let found = store::find_employee(&app.db_pool, &employee.email)
        .await
        .unwrap();

    // Assert
    assert_eq!(
        found,
        Some(EmployeeRecord {
            email: "emily@example.com".into(),
            name: "Emily Clark".into(),
            birthday: date(1990, 6, 15),
        })
    );
}

#[tokio::test]
async fn upserting_reports_insert_then_update() {
    // Arrange
    let app = setup().await;
    let first = Employee::parse(
        "emily@example.com".into(),
        "Emily Clark".into(),
        "1990-06-15".into(),
        app.today(),
    )
    .unwrap();
    let second = Employee::parse(
        "emily@example.com".into(),
        "Emily Stone".into(),
        "1990-06-16".into(),
        app.today(),
    )
    .unwrap();

    // Act
    let inserted = store::upsert_employee(&app.db_pool, &first).await.unwrap();
    let updated = store::upsert_employee(&app.db_pool, &second).await.unwrap();

    // Assert
    assert_eq!(inserted, Upserted::Inserted);
    assert_eq!(updated, Upserted::Updated);
    assert_eq!(app.employee_count().await, 1);

    let found = store::find_employee(&app.db_pool, &second.email)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "Emily Stone");
    assert_eq!(found.birthday, date(1990, 6, 16));
}

#[tokio::test]
async fn emails_differing_only_in_case_share_one_record() {
    // Arrange
    let app = setup().await;
    app.add_employee("Emily.Clark@Example.COM", "Emily Clark", "1990-06-15").await;

    // Act
    let employee = app.add_employee("emily.clark@example.com", "Emily Stone", "1990-06-15").await;

    // Assert
    assert_eq!(app.employee_count().await, 1);
    let found = store::find_employee(&app.db_pool, &employee.email)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.email, "emily.clark@example.com");
    assert_eq!(found.name, "Emily Stone");

    let results = store::search_employees(&app.db_pool, "EMILY.CLARK@example.com")
        .await
        .unwrap();
    assert_eq!(results, vec![found]);
}

#[tokio::test]
async fn a_deleted_employee_can_no_longer_be_found() {
    // Arrange
    let app = setup().await;
    let employee = app.add_employee("emily@example.com", "Emily Clark", "1990-06-15").await;

    // Act
    assert_ok!(store::delete_employee(&app.db_pool, &employee.email).await);

    // Assert
    let found = store::find_employee(&app.db_pool, &employee.email)
        .await
        .unwrap();
    assert_none!(found);
}

#[tokio::test]
async fn deleting_an_unknown_email_is_not_found() {
    // Arrange
    let app = setup().await;

    // Act
    let result = store::delete_employee(&app.db_pool, &email("nobody@example.com")).await;

    // Assert
    assert!(matches!(result, Err(StoreError::NotFound(e)) if e == "nobody@example.com"));
}

#[tokio::test]
async fn only_matching_month_and_day_are_selected() {
    // Arrange
    let app = setup().await;
    app.add_employee("first@example.com", "First", "1990-06-15").await;
    app.add_employee("second@example.com", "Second", "2001-06-15").await;
    app.add_employee("third@example.com", "Third", "1985-07-15").await;

    // Act
    let records = store::employees_born_on(&app.db_pool, 6, 15).await.unwrap();

    // Assert
    let emails: Vec<_> = records.iter().map(|r| r.email.as_str()).collect();
    assert_eq!(emails, vec!["first@example.com", "second@example.com"]);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    // Arrange
    let app = setup().await;
    app.add_employee("underscore@example.com", "Ann_Lee", "1990-06-15").await;
    app.add_employee("letter@example.com", "AnnXLee", "1990-06-15").await;

    // Act
    let records = store::search_employees(&app.db_pool, "ann_").await.unwrap();

    // Assert
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Ann_Lee");
}

#[tokio::test]
async fn an_empty_search_lists_everyone() {
    // Arrange
    let app = setup().await;
    app.add_employee("bob@example.com", "Bob Lee", "1985-12-25").await;
    app.add_employee("alice@example.com", "Alice Johnson", "1990-01-01").await;

    // Act
    let records = store::search_employees(&app.db_pool, "  ").await.unwrap();

    // Assert
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Alice Johnson", "Bob Lee"]);
}
