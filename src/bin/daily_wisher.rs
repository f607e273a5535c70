use anyhow::Context;
use birthday_wisher::configuration::get_configuration;
use birthday_wisher::email::Mailer;
use birthday_wisher::startup::get_connection_pool;
use birthday_wisher::telemetry::{get_subscriber, init_subscriber};
use birthday_wisher::store::StoreError;
use birthday_wisher::wisher::{
    cron_expression, find_birthday_employees, today_in, trigger_time_utc, wish_happy_birthdays,
    MatchDays, RunStatus,
};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Send a birthday email to every employee born today and exit"
)]
struct Args {
    /// Run for this date (YYYY-MM-DD) instead of today in the target timezone
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Log who has a birthday without sending any email
    #[arg(long)]
    dry_run: bool,

    /// Print the UTC cron schedule for the external scheduler and exit
    #[arg(long)]
    print_schedule: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let subscriber = get_subscriber("daily_wisher".into(), "info".into(), std::io::stdout);
    if let Err(e) = init_subscriber(subscriber) {
        eprintln!("Failed to set up logging: {:?}", e);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Daily wisher aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode, anyhow::Error> {
    let config = get_configuration().context("Failed to read configuration.")?;
    let offset = config.wisher.offset()?;

    if args.print_schedule {
        let utc_time = trigger_time_utc(offset, config.wisher.trigger_time()?);
        println!("{}", cron_expression(utc_time));
        return Ok(ExitCode::SUCCESS);
    }

    let today = args.date.unwrap_or_else(|| today_in(offset, Utc::now()));
    let match_days = MatchDays::for_date(today, config.wisher.leap_day_policy);
    tracing::info!(
        "Daily wisher running for {} (system time {} UTC)",
        today,
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    );

    let mailer = if args.dry_run {
        None
    } else {
        let email_settings = config
            .email
            .as_ref()
            .context("Missing email settings. Set the EMAIL_CLIENT_* variables.")?;
        Some(Mailer::from_settings(email_settings).context("Failed to set up the mailer")?)
    };

    let pool = get_connection_pool(&config.database);
    let status = match &mailer {
        None => match find_birthday_employees(&pool, &match_days).await {
            Ok(employees) => {
                for employee in &employees {
                    tracing::info!("Would wish {} <{}>", employee.name, employee.email);
                }
                RunStatus::Success
            }
            Err(e) => {
                log_abort(&e);
                RunStatus::Aborted
            }
        },
        Some(mailer) => {
            let outcome = wish_happy_birthdays(&pool, mailer, &match_days).await;
            match &outcome {
                Ok(report) => {
                    tracing::info!(
                        matched = report.matched,
                        sent = report.sent.len(),
                        failed = report.failures.len(),
                        "Daily wisher finished for {}",
                        report.date
                    );
                    for failure in &report.failures {
                        tracing::error!(error.cause_chain = ?failure.error, "Not delivered to {}", failure.email);
                    }
                }
                Err(e) => log_abort(e),
            }
            RunStatus::of(&outcome)
        }
    };
    pool.close().await;

    Ok(status.into())
}

fn log_abort(e: &StoreError) {
    tracing::error!(error.cause_chain = ?e, "Failed to read today's birthdays: {}", e);
}
