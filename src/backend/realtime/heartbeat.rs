//! Heartbeat ping/pong liveness monitoring.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use super::connection::{ClientConnection, WriteOutcome};

/// Outcome of the heartbeat loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatResult {
    /// The client stopped responding within the timeout window.
    TimedOut,
    /// The connection closed (or its outbound side went away).
    Cancelled,
}

/// Run heartbeat pings for a connection until it times out or closes.
///
/// Every `interval` a ping is queued and the alive flag is checked. Each tick
/// without activity since the previous one counts as a miss; after
/// `timeout / interval` consecutive misses (at least one) the loop returns
/// `TimedOut`. The caller is responsible for evicting the connection.
pub async fn run_heartbeat(
    connection: Arc<ClientConnection>,
    interval: Duration,
    timeout: Duration,
) -> HeartbeatResult {
    let cancel = connection.shutdown_token();
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
    // First tick fires immediately; the client has not had a chance to answer yet.
    ticker.tick().await;

    let interval_ms = interval.as_millis().max(1);
    let max_missed = u32::try_from(timeout.as_millis() / interval_ms)
        .unwrap_or(u32::MAX)
        .max(1);
    let mut missed: u32 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if connection.check_alive() {
                    missed = 0;
                } else {
                    missed += 1;
                    if missed >= max_missed {
                        tracing::warn!(
                            "[Realtime] Connection {} missed {} heartbeats (last seen {:?} ago)",
                            connection.id,
                            missed,
                            connection.last_seen_elapsed()
                        );
                        return HeartbeatResult::TimedOut;
                    }
                }
                if connection.ping() == WriteOutcome::Closed {
                    return HeartbeatResult::Cancelled;
                }
            }
            () = cancel.cancelled() => {
                return HeartbeatResult::Cancelled;
            }
        }
    }
}
