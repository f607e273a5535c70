//! src/routes/home.rs
use actix_web::{http::header::ContentType, HttpResponse};
use actix_web_flash_messages::IncomingFlashMessages;
use std::fmt::Write;

pub async fn home(flash_messages: IncomingFlashMessages) -> HttpResponse {
    let mut messages_html = String::new();
    for message in flash_messages.iter() {
        let _ = writeln!(
            messages_html,
            "<p><i>{}</i></p>",
            htmlescape::encode_minimal(message.content())
        );
    }

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8">
    <title>Employee Management Panel</title>
</head>
<body>
    <h1>Employee Management Panel</h1>
    {messages_html}
    <h2>Add or Update Employee</h2>
    <p>Enter an existing email to update the record, or a new email to create one.</p>
    <form action="/employees" method="post">
        <label>Full Name
            <input type="text" placeholder="e.g. Emily Clark" name="name" maxlength="255">
        </label>
        <label>Email Address
            <input type="email" placeholder="emily@example.com" name="email" maxlength="255">
        </label>
        <label>Birthday
            <input type="date" name="birthday" min="1900-01-01">
        </label>
        <button type="submit">Save Employee Record</button>
    </form>
    <h2>Find Employee</h2>
    <form action="/employees" method="get">
        <label>Name or email
            <input type="search" placeholder="Search for an employee..." name="query">
        </label>
        <button type="submit">Search</button>
    </form>
    <h2>Delete Employee</h2>
    <p>Deletion is permanent.</p>
    <form action="/employees/delete" method="post">
        <label>Email Address
            <input type="email" placeholder="emily@example.com" name="email">
        </label>
        <button type="submit">Delete</button>
    </form>
</body>
</html>"#,
        ))
}
