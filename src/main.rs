use clap::{Parser, Subcommand};
use library_lending::{
    adapters::{
        SystemClock, email::EmailNotificationService, json::JsonRepositories,
        security::Argon2SecurityService,
    },
    application::{ServiceDependencies, catalog, notification},
    config::AppConfig,
    domain::ItemKind,
};
use std::process;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Library lending notifications
///
/// Runs one reminder sweep or catalog search over the JSON stores in the data directory.
#[derive(Parser, Debug)]
#[command(name = "library-lending")]
#[command(about = "Send overdue, account and return reminders for library loans", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One reminder per user and item kind with overdue loans
    Overdue,
    /// At most one account summary per user with overdue loans or unpaid fines
    Combined,
    /// Remind users of book loans due soon
    ReturnReminders {
        /// Days ahead to look (defaults to LIBRARY_RETURN_REMINDER_DAYS)
        #[arg(long)]
        days: Option<i64>,
    },
    /// Switch to real mode and send a test message
    TestEmail {
        #[arg(value_name = "ADDRESS")]
        address: String,
    },
    /// Show the email service status
    Status,
    /// Search the catalog by title, author or artist, ISBN and genre
    Search {
        /// Search CDs instead of books
        #[arg(long)]
        cd: bool,
        #[arg(value_name = "QUERY", default_value = "")]
        query: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_lending=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    tracing::info!("Data directory: {}", config.data_dir.display());

    // Initialize adapters
    let repositories = JsonRepositories::open(&config.data_dir).await;
    let notifier = Arc::new(EmailNotificationService::new(
        config.email.clone(),
        &config.outbox_path,
    ));
    if config.email_real_mode && !notifier.enable_real_mode() {
        tracing::warn!("LIBRARY_EMAIL_REAL_MODE is set but SMTP settings are incomplete");
    }

    // Create service dependencies
    let deps = ServiceDependencies {
        users: repositories.users,
        loans: repositories.loans,
        fines: repositories.fines,
        catalog: repositories.catalog,
        notifier: notifier.clone(),
        security: Arc::new(Argon2SecurityService::new()),
        clock: Arc::new(SystemClock),
        policy: config.policy.clone(),
    };

    match args.command {
        Command::Overdue => {
            let sent = notification::send_overdue_reminders(&deps).await;
            println!("Sent {} overdue reminder(s)", sent);
        }
        Command::Combined => {
            let sent = notification::send_combined_reminders(&deps).await;
            println!("Sent {} combined reminder(s)", sent);
        }
        Command::ReturnReminders { days } => {
            let days = days.unwrap_or(config.return_reminder_days);
            let sent = notification::send_return_reminders(&deps, days).await;
            println!("Sent {} return reminder(s)", sent);
        }
        Command::TestEmail { address } => {
            if notification::test_email_configuration(&deps, &address).await {
                println!("Test email queued in {}", notifier.outbox_path().display());
            } else {
                eprintln!("Test email failed, check SMTP settings");
                process::exit(1);
            }
        }
        Command::Status => {
            println!("{}", notifier.status());
        }
        Command::Search { cd, query } => {
            let kind = if cd { ItemKind::Cd } else { ItemKind::Book };
            for item in catalog::search_items(&deps, kind, &query).await {
                let availability = if item.available { "available" } else { "on loan" };
                println!(
                    "{}  {} / {} ({})",
                    item.id.as_ref().map(|id| id.as_str()).unwrap_or("-"),
                    item.title,
                    item.creator,
                    availability
                );
            }
        }
    }
}
