use anyhow::Context;
use birthday_wisher::configuration::get_configuration;
use birthday_wisher::startup::build;
use birthday_wisher::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("birthday_wisher".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let config = get_configuration().context("Failed to read configuration.")?;
    let app = build(config).await?;
    app.run().await?;

    Ok(())
}
