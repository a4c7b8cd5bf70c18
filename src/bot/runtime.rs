//! Bot runtime - long-polling loop.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, info};

use super::dispatcher::{dispatch, AppState};

/// Long-poll tuning.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    /// How long one fetch may wait for new updates.
    pub timeout_secs: u32,
    /// Pause after a failed fetch.
    pub retry_delay: Duration,
}

/// Fetch and handle updates until `shutdown` resolves.
///
/// Updates are handled one at a time, in order. The cursor moves past each
/// update before it is handled, so a failing update is never fetched again.
pub async fn run(state: AppState, poll: PollSettings, shutdown: impl Future<Output = ()>) {
    tokio::pin!(shutdown);
    let mut cursor: Option<u32> = None;

    info!("Bot is now monitoring for chat member changes...");

    loop {
        let fetched = tokio::select! {
            _ = &mut shutdown => break,
            fetched = state.gateway.fetch_events(cursor, poll.timeout_secs) => fetched,
        };

        let batch = match fetched {
            Ok(batch) => batch,
            Err(e) => {
                error!("Failed to fetch updates: {}", e);
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(poll.retry_delay) => continue,
                }
            }
        };

        for delivery in batch {
            cursor = Some(delivery.update_id.wrapping_add(1));

            let Some(event) = delivery.event else {
                debug!("Skipping unsupported update {}", delivery.update_id);
                continue;
            };

            if let Err(e) = dispatch(&state, event).await {
                error!("Error handling update {}: {:#}", delivery.update_id, e);
            }
        }
    }

    info!("Shutdown signal received, stopping");
}
