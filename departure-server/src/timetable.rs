//! Swappable handle to the active query engine.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::cache::CacheConfig;
use crate::engine::{DepartureSource, ScheduleEngine, UnavailableEngine};
use crate::feed::{self, FeedError};
use crate::planner::SearchConfig;
use crate::schedule::ScheduleStore;

/// Errors that can occur when (re)loading the timetable.
#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    /// No feed directory is configured.
    #[error("no feed directory configured")]
    NotConfigured,

    /// The feed could not be read.
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    /// The loader task panicked or was cancelled.
    #[error("loader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Builds engines from a feed directory.
#[derive(Debug, Clone)]
pub struct FeedLoader {
    dir: PathBuf,
}

impl FeedLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read the feed and build an engine. Blocking.
    pub fn load(&self) -> Result<ScheduleEngine, FeedError> {
        let tables = feed::load_dir(&self.dir)?;
        let store = Arc::new(ScheduleStore::new(tables));
        Ok(ScheduleEngine::new(
            store,
            SearchConfig::default(),
            &CacheConfig::default(),
        ))
    }
}

/// Thread-safe, reloadable engine handle.
///
/// Queries take a clone of the current engine and run against it without
/// holding any lock, so a reload never disturbs queries already in flight.
#[derive(Clone)]
pub struct Timetable {
    inner: Arc<RwLock<Arc<dyn DepartureSource>>>,
    loader: Option<FeedLoader>,
    reloading: Arc<Mutex<()>>,
}

impl Timetable {
    /// Wrap a fixed engine. `reload` always fails with `NotConfigured`.
    pub fn fixed(source: Arc<dyn DepartureSource>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(source)),
            loader: None,
            reloading: Arc::new(Mutex::new(())),
        }
    }

    /// A handle with no schedule data.
    pub fn unavailable() -> Self {
        Self::fixed(Arc::new(UnavailableEngine))
    }

    /// Load the feed once and keep the loader for later reloads.
    ///
    /// Fails if the initial load fails.
    pub async fn open(loader: FeedLoader) -> Result<Self, ReloadError> {
        let engine: Arc<dyn DepartureSource> = Arc::new(load_blocking(loader.clone()).await?);
        Ok(Self {
            inner: Arc::new(RwLock::new(engine)),
            loader: Some(loader),
            reloading: Arc::new(Mutex::new(())),
        })
    }

    /// The engine to use for one query.
    pub async fn current(&self) -> Arc<dyn DepartureSource> {
        let guard = self.inner.read().await;
        Arc::clone(&guard)
    }

    /// Whether a feed directory backs this handle.
    pub fn is_reloadable(&self) -> bool {
        self.loader.is_some()
    }

    /// Re-read the feed and swap in the new engine.
    ///
    /// On success returns the new stop count. On failure the current engine
    /// stays in place. Concurrent calls run one at a time. Callers report the
    /// result.
    pub async fn reload(&self) -> Result<usize, ReloadError> {
        let loader = self.loader.clone().ok_or(ReloadError::NotConfigured)?;
        let _running = self.reloading.lock().await;

        let engine = load_blocking(loader).await?;
        let stops = engine.stop_count();

        let mut guard = self.inner.write().await;
        *guard = Arc::new(engine);
        debug!(stops, "swapped in new timetable snapshot");

        Ok(stops)
    }
}

async fn load_blocking(loader: FeedLoader) -> Result<ScheduleEngine, ReloadError> {
    let engine = tokio::task::spawn_blocking(move || loader.load()).await??;
    Ok(engine)
}
