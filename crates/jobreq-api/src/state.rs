//! Application state management

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use jobreq_core::{AppConfig, Result};
use jobreq_extractor::RequirementsExtractor;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Extraction pipeline, shared with blocking worker threads
    pub extractor: Arc<RequirementsExtractor>,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Texts analyzed successfully
    pub analyzed_count: AtomicU64,
    /// Analyses produced without entity recognition
    pub degraded_count: AtomicU64,
}

impl AppState {
    /// Create state around an already-built extractor
    pub fn new(config: AppConfig, extractor: RequirementsExtractor) -> Self {
        Self {
            config,
            extractor: Arc::new(extractor),
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            analyzed_count: AtomicU64::new(0),
            degraded_count: AtomicU64::new(0),
        }
    }

    /// Build the extractor (and its recognizer) from configuration
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let extractor = RequirementsExtractor::from_config(&config)?;
        Ok(Self::new(config, extractor))
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Record one finished analysis
    pub fn record_analysis(&self, degraded: bool) {
        self.analyzed_count.fetch_add(1, Ordering::SeqCst);
        if degraded {
            self.degraded_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    pub fn get_analyzed_count(&self) -> u64 {
        self.analyzed_count.load(Ordering::SeqCst)
    }

    pub fn get_degraded_count(&self) -> u64 {
        self.degraded_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
