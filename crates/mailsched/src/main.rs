use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

mod wiring;

use mailsched_scheduler::{
    recurrence::describe_next_run, Column, RawRow, SubmitOutcome, TimezoneCatalog,
    TriggerDispatcher, TriggerUid,
};
use wiring::Services;

/// Recurring mail scheduler.
#[derive(Parser)]
#[command(name = "mailsched")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.mailsched/mailsched.toml)
    #[arg(long, env = "MAILSCHED_CONFIG", global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a schedule row and register its trigger
    Add(AddArgs),
    /// (Re-)register the trigger for an existing row
    Submit {
        #[arg(long)]
        row: u32,
    },
    /// Run the fire handler for a trigger uid once, now
    Fire { uid: String },
    /// Delete triggers no row references any more
    Sweep,
    /// Show schedule rows with their uid, status and next run
    List,
    /// Show live trigger registrations
    Triggers,
    /// Show messages queued in the dry-run outbox
    Outbox,
    /// Run the trigger dispatcher until Ctrl-C
    Run,
}

#[derive(clap::Args)]
struct AddArgs {
    /// Comma-separated recipient addresses
    #[arg(long)]
    to: String,
    #[arg(long, default_value = "")]
    subject: String,
    /// HTML body
    #[arg(long, default_value = "")]
    message: String,
    /// None, Daily, Weekly, Monthly or Custom (display labels are accepted too)
    #[arg(long, default_value = "Daily")]
    recurrence: String,
    /// Fire time, HH:MM
    #[arg(long)]
    time: String,
    /// Weekday for weekly rows
    #[arg(long)]
    weekday: Option<String>,
    /// Fire date (YYYY-MM-DD) for one-shot rows
    #[arg(long)]
    date: Option<String>,
    /// Day of month for monthly rows
    #[arg(long)]
    month_day: Option<u8>,
    /// IANA zone or display label; defaults to the ambient zone
    #[arg(long)]
    timezone: Option<String>,
    /// Send one message per recipient
    #[arg(long)]
    unique: bool,
    #[arg(long)]
    start: Option<String>,
    #[arg(long)]
    end: Option<String>,
    /// Honour --end (rows never expire by default)
    #[arg(long)]
    expires: bool,
}

impl AddArgs {
    fn into_row(self) -> RawRow {
        let timezone = self.timezone.map(|tz| {
            TimezoneCatalog::label_for_zone(&tz)
                .map(str::to_string)
                .unwrap_or(tz)
        });
        let optional = [
            (Column::Weekday, self.weekday),
            (Column::FireDate, self.date),
            (Column::MonthDay, self.month_day.map(|d| d.to_string())),
            (Column::Timezone, timezone),
            (Column::StartDate, self.start),
            (Column::EndDate, self.end),
        ];

        let mut row = RawRow::new()
            .with(Column::Recipients, self.to)
            .with(Column::Subject, self.subject)
            .with(Column::Message, self.message)
            .with(Column::Recurrence, self.recurrence)
            .with(Column::FireTime, self.time)
            .with(Column::UniqueMessage, self.unique.to_string())
            .with(Column::NeverExpires, (!self.expires).to_string());
        for (column, value) in optional {
            if let Some(value) = value {
                row.set(column, value);
            }
        }
        row
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailsched=info,mailsched_scheduler=info,mailsched_mailer=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config =
        mailsched_core::MailschedConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
            warn!("Config load failed ({}), using defaults", e);
            mailsched_core::MailschedConfig::default()
        });

    let services = Services::open(&config)?;
    let manager = services.lifecycle_manager(&config)?;

    match cli.command {
        Commands::Add(args) => {
            let row = manager.repository().append(&args.into_row())?;
            report_submit(manager.on_submit(row));
        }
        Commands::Submit { row } => report_submit(manager.on_submit(row)),
        Commands::Fire { uid } => {
            let outcome = manager.on_fire(&TriggerUid::from(uid));
            println!("{outcome:?}");
        }
        Commands::Sweep => {
            let report = manager.sweep();
            println!(
                "examined {}, deleted {}, failed {}",
                report.examined,
                report.deleted.len(),
                report.failed.len()
            );
            for uid in &report.failed {
                println!("  could not delete {uid}");
            }
        }
        Commands::List => {
            let repo = manager.repository();
            let now = services.clock.now();
            for entry in repo.list()? {
                let zone = entry
                    .timezone
                    .map(|tz| tz.name().to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "row {:>4}  {:<8} {:02}:{:02} {:<20} {:<30} uid={} next={} status={}",
                    entry.row_no,
                    repo.labels().label(entry.mode.label_key()),
                    entry.hour,
                    entry.minute,
                    zone,
                    entry.recipients,
                    entry.uid.as_ref().map_or("-", |u| u.as_str()),
                    describe_next_run(&entry, manager.ambient_timezone(), now),
                    entry.execution.as_deref().unwrap_or("-"),
                );
            }
        }
        Commands::Triggers => {
            for registration in services.registry.registrations()? {
                println!(
                    "{}  {:<22} next={}",
                    registration.uid,
                    registration.handler,
                    registration
                        .next_fire
                        .map_or_else(|| "none".to_string(), |t| t.to_rfc3339()),
                );
            }
        }
        Commands::Outbox => {
            let outbox = services.outbox(&config)?;
            for message in outbox.messages()? {
                println!(
                    "#{} {} to={} subject={:?}",
                    message.id, message.queued_at, message.recipients, message.subject
                );
            }
        }
        Commands::Run => {
            let cleanup = manager
                .ensure_cleanup_trigger(config.scheduler.cleanup_hour)
                .context("installing the cleanup trigger")?;
            info!(%cleanup, hour = config.scheduler.cleanup_hour, "daily orphan sweep armed");

            let dispatcher = TriggerDispatcher::new(
                manager,
                Arc::clone(&services.registry),
                services.clock.clone(),
                Duration::from_secs(config.scheduler.poll_interval_secs),
            );
            let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
            let handle = tokio::spawn(async move { dispatcher.run(shutdown_rx).await });

            tokio::signal::ctrl_c().await?;
            info!("Ctrl-C received, stopping dispatcher");
            let _ = shutdown_tx.send(true);
            handle.await?;
        }
    }

    Ok(())
}

fn report_submit(outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Registered { row, uid } => println!("row {row}: registered trigger {uid}"),
        SubmitOutcome::Skipped { row, reason } => println!("row {row}: skipped ({reason})"),
        SubmitOutcome::Failed { row, reason } => println!("row {row}: failed ({reason})"),
    }
}
