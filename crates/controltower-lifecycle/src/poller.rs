//! Completion polling.
//!
//! Drives one asynchronous provisioning record to a terminal status.
//! Account provisioning and deprovisioning routinely take tens of minutes,
//! so the loop has no internal iteration bound; the configured deadline and
//! the caller's cancellation token are the only exits besides a terminal
//! status, and both surface as a timeout-classified error distinct from a
//! remote-side failure.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use controltower_client::catalog::CatalogClient;
use controltower_client::ids::RecordId;
use controltower_client::types::{ProvisioningRecord, RecordStatus};

use crate::error::{LifecycleError, LifecycleResult};

/// Polling configuration.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Wait between status fetches.
    pub interval: Duration,
    /// Per-operation deadline for reaching a terminal status.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(20 * 60),
        }
    }
}

/// Polls a provisioning record until it reaches a terminal status.
pub struct RecordPoller {
    catalog: Arc<dyn CatalogClient>,
    config: PollConfig,
}

impl RecordPoller {
    /// Create a poller over a catalog client.
    pub fn new(catalog: Arc<dyn CatalogClient>, config: PollConfig) -> Self {
        Self { catalog, config }
    }

    /// Block until the record succeeds, fails, or the deadline passes.
    ///
    /// - `Succeeded` returns the full record, outputs included.
    /// - `Failed` becomes [`LifecycleError::ProvisioningFailed`] carrying
    ///   the first remote error description when one exists.
    /// - A fetch failure is surfaced immediately as a transport error; the
    ///   poller never retries a failed fetch.
    /// - Deadline expiry or cancellation becomes [`LifecycleError::Timeout`].
    ///   The remote operation may still be running in that case.
    #[instrument(skip(self, cancel), fields(account = %account_name, record_id = %record_id))]
    pub async fn wait_for_completion(
        &self,
        record_id: &RecordId,
        account_name: &str,
        operation: &'static str,
        cancel: &CancellationToken,
    ) -> LifecycleResult<ProvisioningRecord> {
        let deadline = Instant::now() + self.config.timeout;

        loop {
            if cancel.is_cancelled() {
                warn!("Cancelled while waiting for provisioning record");
                return Err(LifecycleError::timeout(account_name, operation));
            }

            let record = self
                .catalog
                .describe_record(record_id)
                .await
                .map_err(|e| {
                    LifecycleError::transport(
                        "reading provisioning status of account",
                        account_name.to_string(),
                        e,
                    )
                })?;

            match record.status {
                RecordStatus::Succeeded => {
                    debug!("Provisioning record succeeded");
                    return Ok(record);
                }
                RecordStatus::Failed => {
                    let message = record
                        .errors
                        .first()
                        .and_then(|e| e.description.clone())
                        .unwrap_or_else(|| "failed with unknown error".to_string());
                    return Err(LifecycleError::ProvisioningFailed {
                        account: account_name.to_string(),
                        message,
                    });
                }
                status => {
                    debug!(status = %status, "Provisioning still pending");
                }
            }

            if Instant::now() + self.config.interval > deadline {
                warn!("Deadline reached while waiting for provisioning record");
                return Err(LifecycleError::timeout(account_name, operation));
            }

            tokio::select! {
                () = sleep(self.config.interval) => {}
                () = cancel.cancelled() => {
                    warn!("Cancelled during poll wait");
                    return Err(LifecycleError::timeout(account_name, operation));
                }
            }
        }
    }
}
