//! Catalog synchronization engine.
//!
//! Pulls the full remote catalog page by page and upserts each product into
//! the local store, keyed by its remote identity. Exactly one sync runs at
//! a time process-wide; overlapping triggers return immediately with an
//! empty report. Remote failures abort the remaining pass but keep the
//! pages already committed - the scheduler stays alive regardless.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::domain::catalog::{ProductRecord, SyncSource};
use crate::ports::{ProductStore, RemoteCatalogClient, RemoteProduct};

/// Process-scoped sync state, shared between the engine, the scheduler,
/// and the search service. Explicitly constructed and passed by handle;
/// never a process-wide singleton.
pub struct SyncState {
    enabled: AtomicBool,
    in_progress: AtomicBool,
    last_sync: RwLock<Option<DateTime<Utc>>>,
}

impl SyncState {
    /// Creates sync state; `enabled` reflects whether remote credentials
    /// validated at startup.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            in_progress: AtomicBool::new(false),
            last_sync: RwLock::new(None),
        }
    }

    /// Whether remote sync and remote search are enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Whether a sync pass is currently running.
    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Snapshot for the status endpoint.
    pub async fn snapshot(&self) -> SyncStatus {
        SyncStatus {
            enabled: self.is_enabled(),
            sync_in_progress: self.is_in_progress(),
            last_sync: *self.last_sync.read().await,
        }
    }

    /// Tries to claim the single-flight slot. Returns false if a sync is
    /// already running.
    fn try_begin(&self) -> bool {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn finish(&self) {
        self.in_progress.store(false, Ordering::Release);
    }
}

/// Read-only view of [`SyncState`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct SyncStatus {
    pub enabled: bool,
    pub sync_in_progress: bool,
    pub last_sync: Option<DateTime<Utc>>,
}

/// Outcome of one sync pass.
///
/// `total` counts remote products observed, `changed` the upserts that
/// created or altered a record, `failed` the per-item upserts that errored.
/// `aborted` marks a pass cut short by a remote failure; counts then cover
/// the pages that completed before the abort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub total: u64,
    pub changed: u64,
    pub failed: u64,
    pub aborted: bool,
}

impl SyncReport {
    /// The empty report returned for skipped and disabled passes.
    pub fn skipped() -> Self {
        Self::default()
    }
}

/// Drives paginated full-catalog sync from the remote platform into the
/// local product store.
pub struct CatalogSyncEngine {
    remote: Arc<dyn RemoteCatalogClient>,
    store: Arc<dyn ProductStore>,
    state: Arc<SyncState>,
    page_size: u32,
}

impl CatalogSyncEngine {
    pub fn new(
        remote: Arc<dyn RemoteCatalogClient>,
        store: Arc<dyn ProductStore>,
        state: Arc<SyncState>,
        page_size: u32,
    ) -> Self {
        Self {
            remote,
            store,
            state,
            page_size,
        }
    }

    /// Runs one full catalog sync.
    ///
    /// Single-flight: a concurrent call returns [`SyncReport::skipped`]
    /// immediately, without blocking or queuing. Disabled integrations
    /// likewise return an empty report without touching the store.
    pub async fn sync_all(&self) -> SyncReport {
        if !self.state.is_enabled() {
            info!("catalog sync disabled, using local products");
            return SyncReport::skipped();
        }

        if !self.state.try_begin() {
            info!("sync already in progress, skipping");
            return SyncReport::skipped();
        }

        let report = self.run_pass().await;
        self.state.finish();

        if report.aborted {
            warn!(
                total = report.total,
                changed = report.changed,
                failed = report.failed,
                "catalog sync aborted partway; committed pages retained"
            );
        } else {
            *self.state.last_sync.write().await = Some(Utc::now());
            info!(
                total = report.total,
                changed = report.changed,
                failed = report.failed,
                "catalog sync complete"
            );
        }

        report
    }

    async fn run_pass(&self) -> SyncReport {
        let mut report = SyncReport::default();
        let mut cursor: Option<String> = None;
        let mut page_no = 0u32;

        loop {
            page_no += 1;
            let page = match self
                .remote
                .list_products(self.page_size, cursor.as_deref())
                .await
            {
                Ok(page) => page,
                Err(err) => {
                    error!(page = page_no, error = %err, "page fetch failed, aborting sync pass");
                    report.aborted = true;
                    return report;
                }
            };

            if page.products.is_empty() {
                return report;
            }

            let synced_at = Utc::now();
            for remote in &page.products {
                report.total += 1;
                let record = record_from_remote(remote, synced_at);
                match self.store.upsert_by_external_key(&record).await {
                    Ok(outcome) if outcome.changed() => report.changed += 1,
                    Ok(_) => {}
                    Err(err) => {
                        // Per-item failures are isolated: log, count, move on.
                        warn!(key = %remote.key, error = %err, "product upsert failed");
                        report.failed += 1;
                    }
                }
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => return report,
            }
        }
    }

    /// Starts periodic syncing: one pass immediately, then one per
    /// `interval`. Overlapping ticks are absorbed by the single-flight
    /// guard. The task runs until the handle is dropped or aborted.
    pub fn start_auto_sync(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        info!(interval_secs = interval.as_secs(), "starting catalog auto-sync");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.sync_all().await;
            }
        })
    }
}

/// Converts a normalized remote product into a local catalog record.
pub fn record_from_remote(remote: &RemoteProduct, synced_at: DateTime<Utc>) -> ProductRecord {
    ProductRecord {
        id: None,
        external_key: Some(remote.key.clone()),
        name: remote.name.clone(),
        description: remote.description.clone(),
        price: remote.price,
        category: remote.category.clone(),
        tags: remote.tags.clone(),
        image: remote.image.clone(),
        url: remote.url.clone(),
        in_stock: remote.quantity > 0,
        quantity: remote.quantity,
        rating: 4.5,
        variants: remote
            .variants
            .iter()
            .map(|v| crate::domain::catalog::ProductVariant {
                id: v.id.clone(),
                title: v.title.clone(),
                price: v.price,
                available: v.available,
                sku: v.sku.clone(),
                inventory_quantity: v.inventory_quantity,
            })
            .collect(),
        source: SyncSource::Shopify,
        synced_at: Some(synced_at),
    }
}
