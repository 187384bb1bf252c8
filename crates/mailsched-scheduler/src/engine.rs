use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    error::Result,
    lifecycle::LifecycleManager,
    platform::Clock,
    registry::SqliteTriggerRegistry,
    types::{CLEANUP_HANDLER, FIRE_HANDLER, SUBMIT_HANDLER},
};

/// Local stand-in for the platform scheduler: polls the SQLite registry and
/// invokes the lifecycle handlers for due triggers.
pub struct TriggerDispatcher {
    manager: LifecycleManager,
    registry: Arc<SqliteTriggerRegistry>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
}

impl TriggerDispatcher {
    /// `registry` must be the same registry the manager creates triggers in.
    pub fn new(
        manager: LifecycleManager,
        registry: Arc<SqliteTriggerRegistry>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            manager,
            registry,
            clock,
            poll_interval,
        }
    }

    pub fn manager(&self) -> &LifecycleManager {
        &self.manager
    }

    /// Main event loop. Polls until `shutdown` broadcasts `true`.
    ///
    /// Ticks run on the blocking pool since handlers do synchronous I/O
    /// (SQLite, SMTP). Shutdown does not wait for an in-flight tick.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = self.poll_interval.as_secs(), "trigger dispatcher started");

        let dispatcher = Arc::new(self);
        let mut interval = tokio::time::interval(dispatcher.poll_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let this = Arc::clone(&dispatcher);
                    let mut tick = tokio::task::spawn_blocking(move || this.tick());
                    let stop = loop {
                        tokio::select! {
                            joined = &mut tick => {
                                match joined {
                                    Ok(Ok(_)) => {}
                                    Ok(Err(e)) => error!("dispatcher tick error: {e}"),
                                    Err(e) => error!("dispatcher tick panicked: {e}"),
                                }
                                break false;
                            }
                            changed = shutdown.changed() => {
                                if changed.is_err() || *shutdown.borrow() {
                                    break true;
                                }
                            }
                        }
                    };
                    if stop {
                        info!("trigger dispatcher shutting down with a tick in flight");
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("trigger dispatcher shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Fire everything that is due. Returns the number of triggers processed.
    ///
    /// Missed occurrences (dispatcher offline) fire once, then re-arm from now.
    pub fn tick(&self) -> Result<usize> {
        let now = self.clock.now();
        let due = self.registry.due(now)?;

        for registration in &due {
            match registration.handler.as_str() {
                FIRE_HANDLER => {
                    let outcome = self.manager.on_fire(&registration.uid);
                    debug!(uid = %registration.uid, ?outcome, "fire handled");
                }
                CLEANUP_HANDLER => {
                    self.manager.sweep();
                }
                SUBMIT_HANDLER => {
                    debug!(uid = %registration.uid, "submit triggers are event driven, not timed");
                }
                other => {
                    warn!(uid = %registration.uid, handler = %other, "no handler for trigger");
                }
            }
            if let Err(e) = self.registry.rearm(&registration.uid, now) {
                error!(uid = %registration.uid, "failed to re-arm trigger: {e}");
            }
        }
        Ok(due.len())
    }
}
