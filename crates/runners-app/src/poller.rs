//! Fixed-interval poll loop.
//!
//! # Design
//! - One pass refreshes the token when stale, loads the folder map when empty,
//!   then counts runners folder by folder.
//! - Failures never escape the loop: each is logged once and mapped to an
//!   [`IterationOutcome`] whose delay comes from the [`RetryPolicy`].
//! - The folder map is loaded once and kept; an empty listing is re-queried on
//!   the next pass.

use std::time::Duration;

use runners_cloud::{
    BearerToken, FolderDirectory, FolderMap, InstanceCensus, InstanceSource, TokenSource,
};
use runners_config::ScheduleSettings;
use runners_telemetry::{Metrics, ReportExt, cycle_span};
use tokio::time::Instant;
use tracing::{Instrument, error, info, warn};

/// Delay applied after each kind of pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause after a pass that published metrics.
    pub scrape_delay: Duration,
    /// Pause after a failed token acquisition.
    pub token_failure_delay: Duration,
}

impl RetryPolicy {
    /// Use the scrape interval for both delays. Folder and census failures
    /// restart immediately.
    #[must_use]
    pub const fn from_interval(interval: Duration) -> Self {
        Self {
            scrape_delay: interval,
            token_failure_delay: interval,
        }
    }
}

/// What a single pass achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    /// Every folder was visited.
    Published {
        /// Folders in the cached map.
        folders: usize,
        /// Folders whose gauge was written.
        updated: usize,
    },
    /// No token could be obtained.
    TokenFailed,
    /// The folder listing failed.
    FoldersFailed,
    /// Counting failed for a folder; later folders were skipped.
    ScrapeFailed {
        /// Folder whose census failed.
        folder: String,
    },
}

impl IterationOutcome {
    /// Pause before the next pass, if any.
    #[must_use]
    pub const fn delay(&self, policy: &RetryPolicy) -> Option<Duration> {
        match self {
            Self::Published { .. } => Some(policy.scrape_delay),
            Self::TokenFailed => Some(policy.token_failure_delay),
            Self::FoldersFailed | Self::ScrapeFailed { .. } => None,
        }
    }
}

/// Stage the next pass starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// No token, or the cached one has outlived its TTL.
    NeedsToken,
    /// Token is fresh but the folder map is empty.
    NeedsFolders,
    /// Token and folders are ready.
    Scraping,
}

#[derive(Debug)]
struct CachedToken {
    token: BearerToken,
    acquired_at: Instant,
}

/// Drives token refresh, folder discovery, and runner counting.
pub struct Poller<T, D, S> {
    tokens: T,
    directory: D,
    census: InstanceCensus<S>,
    metrics: Metrics,
    token_ttl: Duration,
    retry: RetryPolicy,
    token: Option<CachedToken>,
    folders: FolderMap,
    cycle: u64,
}

impl<T, D, S> Poller<T, D, S>
where
    T: TokenSource,
    D: FolderDirectory,
    S: InstanceSource,
{
    /// Assemble a poller from its collaborators.
    #[must_use]
    pub const fn new(
        tokens: T,
        directory: D,
        census: InstanceCensus<S>,
        metrics: Metrics,
        schedule: ScheduleSettings,
    ) -> Self {
        Self {
            tokens,
            directory,
            census,
            metrics,
            token_ttl: schedule.token_ttl,
            retry: RetryPolicy::from_interval(schedule.scrape_interval),
            token: None,
            folders: FolderMap::new(),
            cycle: 0,
        }
    }

    /// Stage the next pass will start in.
    #[must_use]
    pub fn state(&self) -> PollState {
        if self.fresh_token().is_none() {
            PollState::NeedsToken
        } else if self.folders.is_empty() {
            PollState::NeedsFolders
        } else {
            PollState::Scraping
        }
    }

    /// Folder map cached so far.
    #[must_use]
    pub const fn folders(&self) -> &FolderMap {
        &self.folders
    }

    /// Retry policy in effect.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Poll forever.
    pub async fn run(mut self) {
        info!(
            scrape_interval_secs = self.retry.scrape_delay.as_secs(),
            token_ttl_secs = self.token_ttl.as_secs(),
            "poll loop started"
        );
        loop {
            self.step().await;
        }
    }

    /// Run one pass, then wait the delay its outcome calls for.
    pub async fn step(&mut self) -> IterationOutcome {
        let outcome = self.run_iteration().await;
        if let Some(delay) = outcome.delay(&self.retry) {
            tokio::time::sleep(delay).await;
        }
        outcome
    }

    /// Run one pass without sleeping.
    pub async fn run_iteration(&mut self) -> IterationOutcome {
        self.cycle += 1;
        let span = cycle_span(self.cycle);
        self.iterate().instrument(span).await
    }

    async fn iterate(&mut self) -> IterationOutcome {
        let Some(token) = self.ensure_token().await else {
            return IterationOutcome::TokenFailed;
        };

        if self.folders.is_empty() {
            match self.directory.list_folders(&token).await {
                Ok(folders) => {
                    info!(folders = ?folders, total = folders.len(), "folder map loaded");
                    self.folders = folders;
                }
                Err(err) => {
                    error!(error = %err.report(), "folder listing failed");
                    return IterationOutcome::FoldersFailed;
                }
            }
        }

        let mut updated = 0;
        for (folder_name, folder_id) in &self.folders {
            let counted = self
                .census
                .count_matching_instances(folder_id.as_deref(), folder_name, &token)
                .await;
            match counted {
                Ok(Some(count)) => {
                    let folder_id = folder_id.as_deref().unwrap_or_default();
                    self.metrics.set_runner_count(folder_name, folder_id, count);
                    updated += 1;
                }
                Ok(None) => {}
                Err(err) => {
                    error!(
                        folder_name = %folder_name,
                        error = %err.report(),
                        "runner census failed"
                    );
                    return IterationOutcome::ScrapeFailed {
                        folder: folder_name.clone(),
                    };
                }
            }
        }

        IterationOutcome::Published {
            folders: self.folders.len(),
            updated,
        }
    }

    async fn ensure_token(&mut self) -> Option<BearerToken> {
        if let Some(token) = self.fresh_token() {
            return Some(token.clone());
        }

        info!("requesting IAM token");
        match self.tokens.acquire_token().await {
            Ok(token) => {
                info!(token_suffix = token.suffix(), "received IAM token");
                self.token = Some(CachedToken {
                    token: token.clone(),
                    acquired_at: Instant::now(),
                });
                Some(token)
            }
            Err(err) => {
                if self.token.is_some() {
                    warn!("expired IAM token could not be refreshed");
                }
                error!(error = %err.report(), "failed to acquire IAM token");
                None
            }
        }
    }

    fn fresh_token(&self) -> Option<&BearerToken> {
        self.token
            .as_ref()
            .filter(|cached| cached.acquired_at.elapsed() <= self.token_ttl)
            .map(|cached| &cached.token)
    }
}
