//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (top of every hour)
//!     │
//!     └─► send_deadline_reminders(now)
//!             └─► opportunities closing in [now+24h, now+25h)
//!                     └─► dispatch "deadline_reminder" per interested student
//! ```

use anyhow::Result;
use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::deadlines::send_deadline_reminders;
use crate::kernel::ServerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(deps: ServerDeps) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let reminder_job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let deps = deps.clone();
        Box::pin(async move {
            match send_deadline_reminders(Utc::now(), &deps).await {
                Ok(sent) => tracing::info!(sent, "Deadline reminder scan finished"),
                Err(e) => tracing::error!("Deadline reminder scan failed: {}", e),
            }
        })
    })?;

    scheduler.add(reminder_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (deadline reminders every hour)");
    Ok(scheduler)
}
