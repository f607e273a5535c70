//! tests/api/daily_wisher.rs

use crate::helpers::{email_settings, setup};
use birthday_wisher::configuration::get_configuration;
use birthday_wisher::email::Mailer;
use birthday_wisher::startup::get_connection_pool;
use birthday_wisher::store::StoreError;
use birthday_wisher::wisher::{wish_happy_birthdays, LeapDayPolicy, MatchDays};
use chrono::NaiveDate;
use wiremock::matchers::{any, body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn june_15th() -> MatchDays {
    MatchDays::for_date(
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        LeapDayPolicy::default(),
    )
}

#[tokio::test]
async fn only_employees_born_today_are_wished() {
    // Arrange
    let app = setup().await;
    app.add_employee("first@example.com", "First Person", "1990-06-15").await;
    app.add_employee("second@example.com", "Second Person", "2001-06-15").await;
    app.add_employee("third@example.com", "Third Person", "1985-07-15").await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    // Act
    let report = wish_happy_birthdays(&app.db_pool, &app.mailer(), &june_15th())
        .await
        .unwrap();

    // Assert
    assert!(report.is_success());
    assert_eq!(report.matched, 2);
    let sent: Vec<_> = report.sent.iter().map(|e| e.as_ref().to_string()).collect();
    assert_eq!(sent, vec!["first@example.com", "second@example.com"]);
}

#[tokio::test]
async fn the_birthday_email_is_addressed_to_the_employee() {
    // Arrange
    let app = setup().await;
    app.add_employee("emily@example.com", "Emily Clark", "1990-06-15").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // Act
    wish_happy_birthdays(&app.db_pool, &app.mailer(), &june_15th())
        .await
        .unwrap();

    // Assert
    let requests = app.email_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["to"][0]["email"], "emily@example.com");
    assert_eq!(body["to"][0]["name"], "Emily Clark");
    assert_eq!(body["sender"]["email"], "people@example.com");
    assert_eq!(
        body["subject"],
        "🎂 Happy Birthday from the Team, Emily Clark!"
    );
    assert!(body["htmlContent"]
        .as_str()
        .unwrap()
        .contains("Happy Birthday, Emily Clark!"));
}

#[tokio::test]
async fn one_failed_email_does_not_stop_the_others() {
    // Arrange
    let app = setup().await;
    app.add_employee("alice@example.com", "Alice", "1990-06-15").await;
    app.add_employee("bob@example.com", "Bob", "1991-06-15").await;
    app.add_employee("carol@example.com", "Carol", "1992-06-15").await;

    Mock::given(body_string_contains("bob@example.com"))
        .respond_with(ResponseTemplate::new(500))
        .named("Bob's inbox is broken")
        .expect(1)
        .mount(&app.email_server)
        .await;
    for recipient in ["alice@example.com", "carol@example.com"] {
        Mock::given(body_string_contains(recipient))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&app.email_server)
            .await;
    }

    // Act
    let report = wish_happy_birthdays(&app.db_pool, &app.mailer(), &june_15th())
        .await
        .unwrap();

    // Assert
    assert!(!report.is_success());
    assert_eq!(report.matched, 3);
    let sent: Vec<_> = report.sent.iter().map(|e| e.as_ref().to_string()).collect();
    assert_eq!(sent, vec!["alice@example.com", "carol@example.com"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].email.as_ref(), "bob@example.com");
}

#[tokio::test]
async fn nobody_is_emailed_when_there_are_no_birthdays() {
    // Arrange
    let app = setup().await;
    app.add_employee("third@example.com", "Third Person", "1985-07-15").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    // Act
    let report = wish_happy_birthdays(&app.db_pool, &app.mailer(), &june_15th())
        .await
        .unwrap();

    // Assert
    assert_eq!(report.matched, 0);
    assert!(report.is_success());
}

#[tokio::test]
async fn leap_day_birthdays_are_wished_on_feb_28_in_common_years() {
    // Arrange
    let app = setup().await;
    app.add_employee("leap@example.com", "Leap Person", "2000-02-29").await;
    app.add_employee("feb28@example.com", "Feb Person", "1990-02-28").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let feb_28th = MatchDays::for_date(
        NaiveDate::from_ymd_opt(2023, 2, 28).unwrap(),
        LeapDayPolicy::Feb28,
    );

    // Act
    let report = wish_happy_birthdays(&app.db_pool, &app.mailer(), &feb_28th)
        .await
        .unwrap();

    // Assert
    assert_eq!(report.sent.len(), 2);
}

#[tokio::test]
async fn an_unreachable_store_aborts_the_run() {
    // Arrange
    let email_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&email_server)
        .await;
    let mailer = Mailer::from_settings(&email_settings(email_server.uri())).unwrap();

    let mut config = get_configuration().expect("Failed to read configuration.");
    // Nothing listens on port 1.
    config.database.port = 1;
    let pool = get_connection_pool(&config.database);

    // Act
    let result = wish_happy_birthdays(&pool, &mailer, &june_15th()).await;

    // Assert
    assert!(matches!(result, Err(StoreError::Connection(_))));
}
