//! Opens the database and assembles the collaborators from config.

use std::sync::Arc;

use mailsched_core::MailschedConfig;
use mailsched_mailer::{OutboxMailer, SmtpMailer};
use mailsched_scheduler::{
    recurrence::ambient_timezone, Clock, EntryRepository, Labels, LifecycleManager, MailSender,
    SqliteRowStore, SqliteTriggerRegistry, SystemClock,
};
use rusqlite::Connection;
use tracing::info;

pub struct Services {
    rows: Arc<SqliteRowStore>,
    pub registry: Arc<SqliteTriggerRegistry>,
    pub clock: Arc<dyn Clock>,
    db_path: String,
}

impl Services {
    /// Open the SQLite file and run the schema setup. Each store gets its own
    /// connection.
    pub fn open(config: &MailschedConfig) -> anyhow::Result<Self> {
        let db_path = config.database.path.clone();
        ensure_parent_dir(&db_path);
        info!(path = %db_path, "opening SQLite database");

        let db = Connection::open(&db_path)?;
        db.execute_batch("PRAGMA journal_mode=WAL;")?;
        mailsched_scheduler::db::init_db(&db)?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let rows = Arc::new(SqliteRowStore::new(Connection::open(&db_path)?)?);
        let registry = Arc::new(SqliteTriggerRegistry::new(
            Connection::open(&db_path)?,
            clock.clone(),
        )?);

        Ok(Self {
            rows,
            registry,
            clock,
            db_path,
        })
    }

    pub fn outbox(&self, config: &MailschedConfig) -> anyhow::Result<OutboxMailer> {
        Ok(OutboxMailer::new(
            Connection::open(&self.db_path)?,
            config.mail.from.clone(),
            self.clock.clone(),
        )?)
    }

    /// SMTP when configured, the outbox table otherwise.
    fn mailer(&self, config: &MailschedConfig) -> anyhow::Result<Arc<dyn MailSender>> {
        match &config.mail.smtp {
            Some(smtp) => Ok(Arc::new(SmtpMailer::new(&config.mail.from, smtp)?)),
            None => {
                info!("no SMTP section configured, queueing mail in the outbox table");
                Ok(Arc::new(self.outbox(config)?))
            }
        }
    }

    pub fn lifecycle_manager(&self, config: &MailschedConfig) -> anyhow::Result<LifecycleManager> {
        let ambient = ambient_timezone(config.scheduler.timezone.as_deref());
        info!(zone = %ambient.name(), "ambient timezone");

        Ok(LifecycleManager::new(
            EntryRepository::new(self.rows.clone(), Labels::with_overrides(&config.labels)),
            self.registry.clone(),
            self.mailer(config)?,
            self.clock.clone(),
            ambient,
        ))
    }
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
