//! src/startup.rs
use crate::configuration::{DatabaseSettings, Settings};
use crate::routes::{delete_employee, health_check, home, save_employee, search_employees};
use actix_web::cookie::Key;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use actix_web_flash_messages::storage::CookieMessageStore;
use actix_web_flash_messages::FlashMessagesFramework;
use anyhow::Context;
use chrono::FixedOffset;
use secrecy::{ExposeSecret, Secret};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use std::time::Duration;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(configuration.with_db())
}

pub async fn build(config: Settings) -> Result<Application, anyhow::Error> {
    let connection_pool = get_connection_pool(&config.database);
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .context("Failed to migrate the database")?;

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
    let port = listener.local_addr()?.port();

    let offset = config.wisher.offset()?;
    let server = run(listener, connection_pool, offset, config.application.hmac_secret)?;

    Ok(Application { port, server })
}

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    offset: FixedOffset,
    hmac_secret: Secret<String>,
) -> Result<Server, anyhow::Error> {
    // Cookie signing keys need at least 64 bytes.
    let secret = hmac_secret.expose_secret().as_bytes();
    if secret.len() < 64 {
        anyhow::bail!("application.hmac_secret must be at least 64 bytes long");
    }
    let message_store = CookieMessageStore::builder(Key::from(secret)).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let connection = web::Data::new(connection);
    // Birthdays are bounded by today in the target timezone.
    let offset = web::Data::new(offset);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/", web::get().to(home))
            .route("/employees", web::get().to(search_employees))
            .route("/employees", web::post().to(save_employee))
            .route("/employees/delete", web::post().to(delete_employee))
            .app_data(connection.clone())
            .app_data(offset.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
