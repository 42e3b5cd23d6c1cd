// src/services/site_data.rs

//! Public site data provider.
//!
//! Serves the landing page aggregate with stale-while-revalidate semantics:
//! a warm cache is shown immediately and refreshed in the background, a cold
//! start fetches in the foreground. A failed fetch never blanks data that was
//! already shown.
//!
//! Every fetch takes a sequence number. A response older than the last one
//! applied is dropped, so overlapping refreshes cannot roll the page back.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::cache::{ResultCache, SITE_DATA_KEY};
use crate::models::AllSiteData;

const LOAD_FAILED: &str = "Gagal memuat data";

/// Observable provider state.
#[derive(Debug, Clone, Default)]
pub struct SiteState {
    pub data: Option<Arc<AllSiteData>>,

    /// A foreground fetch is outstanding
    pub loading: bool,

    /// Message of the last failed fetch, cleared by the next success
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Shows the loading indicator and clears the previous error.
    Foreground,
    /// Silent revalidation behind data that is already shown.
    Background,
}

struct Inner {
    api: ApiClient,
    cache: Arc<ResultCache<Arc<AllSiteData>>>,
    state: watch::Sender<SiteState>,
    issued: AtomicU64,
    applied: Mutex<u64>,
    in_flight: AtomicUsize,
}

/// Counts a running load; aborted loads drop out of the count too.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn begin(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct SiteDataProvider {
    inner: Arc<Inner>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SiteDataProvider {
    /// Create the provider, seeding state from the cache.
    pub fn new(api: ApiClient, cache: Arc<ResultCache<Arc<AllSiteData>>>) -> Self {
        let initial = match cache.get(SITE_DATA_KEY) {
            Some(data) => SiteState {
                data: Some(data),
                loading: false,
                error: None,
            },
            None => SiteState {
                data: None,
                loading: true,
                error: None,
            },
        };
        let (state, _) = watch::channel(initial);

        Self {
            inner: Arc::new(Inner {
                api,
                cache,
                state,
                issued: AtomicU64::new(0),
                applied: Mutex::new(0),
                in_flight: AtomicUsize::new(0),
            }),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Start the initial fetch without waiting for it.
    ///
    /// Warm state revalidates silently; cold state loads in the foreground.
    pub fn mount(&self) {
        let mode = if self.inner.state.borrow().data.is_some() {
            Mode::Background
        } else {
            Mode::Foreground
        };
        log::debug!("Mounting site data provider ({mode:?})");

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { inner.load(mode).await });

        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle);
    }

    /// Foreground fetch; resolves once the response has been applied or dropped.
    pub async fn refresh(&self) {
        self.inner.load(Mode::Foreground).await;
    }

    /// Silent fetch that leaves `loading` untouched.
    pub async fn revalidate(&self) {
        self.inner.load(Mode::Background).await;
    }

    pub fn state(&self) -> SiteState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SiteState> {
        self.inner.state.subscribe()
    }

    /// Abort fetches started by [`mount`](Self::mount).
    ///
    /// A `refresh` still awaited elsewhere keeps running and settles `loading`.
    pub fn shutdown(&self) {
        let tasks: Vec<_> = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for task in tasks {
            task.abort();
        }
    }
}

impl Drop for SiteDataProvider {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    async fn load(&self, mode: Mode) {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = InFlight::begin(&self.in_flight);
        if mode == Mode::Foreground {
            self.state.send_modify(|s| {
                s.loading = true;
                s.error = None;
            });
        }

        let result = self.api.fetch_all().await;

        let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
        if seq < *applied {
            log::debug!("Dropping stale site data response #{seq} (applied #{})", *applied);
            return;
        }
        *applied = seq;
        // Loading ends with the newest request, or with the last one still running.
        let settled = seq == self.issued.load(Ordering::SeqCst)
            || self.in_flight.load(Ordering::SeqCst) == 1;

        match result {
            Ok(data) => {
                let data = Arc::new(data);
                self.cache.set(SITE_DATA_KEY, Arc::clone(&data));
                log::debug!("Site data #{seq} applied");
                self.state.send_modify(|s| {
                    s.data = Some(data);
                    s.error = None;
                    if settled {
                        s.loading = false;
                    }
                });
            }
            Err(e) => {
                let mut message = e.to_string();
                if message.trim().is_empty() {
                    message = LOAD_FAILED.to_string();
                }
                log::warn!("Failed to load site data: {message}");
                self.state.send_modify(|s| {
                    s.error = Some(message);
                    if settled {
                        s.loading = false;
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::api::testing::{FakeTransport, site_json};
    use crate::error::AppError;

    fn provider(
        fake: &Arc<FakeTransport>,
        cache: &Arc<ResultCache<Arc<AllSiteData>>>,
    ) -> SiteDataProvider {
        SiteDataProvider::new(ApiClient::new(fake.clone()), Arc::clone(cache))
    }

    fn cached_site(title: &str) -> Arc<AllSiteData> {
        Arc::new(serde_json::from_value(site_json(title)).unwrap())
    }

    fn hero_title(state: &SiteState) -> Option<String> {
        state.data.as_ref().map(|d| d.hero.title.clone())
    }

    #[tokio::test]
    async fn test_cold_start_loads_in_foreground() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_ok("getAll", site_json("Segar"));
        let cache = Arc::new(ResultCache::default());

        let provider = provider(&fake, &cache);
        let initial = provider.state();
        assert!(initial.loading);
        assert!(initial.data.is_none());

        provider.refresh().await;
        let state = provider.state();
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(hero_title(&state).as_deref(), Some("Segar"));
        assert!(cache.get(SITE_DATA_KEY).is_some());
    }

    #[tokio::test]
    async fn test_cold_start_failure_has_no_data() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_err("getAll", AppError::invalid_body("getAll", "<html>"));
        let cache = Arc::new(ResultCache::default());

        let provider = provider(&fake, &cache);
        provider.refresh().await;

        let state = provider.state();
        assert!(!state.loading);
        assert!(state.data.is_none());
        assert!(state.error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_warm_start_shows_cache_then_revalidates() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_ok_after("getAll", Duration::from_millis(500), site_json("Segar"));
        let cache = Arc::new(ResultCache::default());
        cache.set(SITE_DATA_KEY, cached_site("Lama"));

        let provider = provider(&fake, &cache);
        let mut rx = provider.subscribe();
        let initial = provider.state();
        assert!(!initial.loading);
        assert_eq!(hero_title(&initial).as_deref(), Some("Lama"));

        provider.mount();
        rx.changed().await.unwrap();

        let state = provider.state();
        assert!(!state.loading);
        assert_eq!(hero_title(&state).as_deref(), Some("Segar"));
        assert_eq!(fake.calls_to("getAll").len(), 1);
    }

    #[tokio::test]
    async fn test_failed_revalidation_keeps_shown_data() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_err("getAll", AppError::timeout("getAll", 30));
        let cache = Arc::new(ResultCache::default());
        cache.set(SITE_DATA_KEY, cached_site("Lama"));

        let provider = provider(&fake, &cache);
        provider.revalidate().await;

        let state = provider.state();
        assert_eq!(hero_title(&state).as_deref(), Some("Lama"));
        assert_eq!(state.error.as_deref(), Some("getAll timed out after 30s"));
    }

    #[tokio::test]
    async fn test_refresh_failure_after_success_keeps_data() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_ok("getAll", site_json("Pertama"));
        fake.respond_err("getAll", AppError::remote("getAll", "Sheet tidak ditemukan"));
        let cache = Arc::new(ResultCache::default());

        let provider = provider(&fake, &cache);
        provider.refresh().await;
        provider.refresh().await;

        let state = provider.state();
        assert_eq!(hero_title(&state).as_deref(), Some("Pertama"));
        assert_eq!(state.error.as_deref(), Some("Sheet tidak ditemukan"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_empty_error_message_uses_default() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_err("getAll", AppError::remote("getAll", ""));
        let cache = Arc::new(ResultCache::default());

        let provider = provider(&fake, &cache);
        provider.refresh().await;

        assert_eq!(provider.state().error.as_deref(), Some(LOAD_FAILED));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_dropped() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_ok_after("getAll", Duration::from_secs(5), site_json("Lambat"));
        fake.respond_ok_after("getAll", Duration::from_secs(1), site_json("Cepat"));
        let cache = Arc::new(ResultCache::default());

        let provider = provider(&fake, &cache);
        tokio::join!(provider.refresh(), provider.refresh());

        let state = provider.state();
        assert!(!state.loading);
        assert_eq!(hero_title(&state).as_deref(), Some("Cepat"));
        let cached = cache.get(SITE_DATA_KEY).unwrap();
        assert_eq!(cached.hero.title, "Cepat");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cold_mount_loads_in_background_task() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_ok_after("getAll", Duration::from_millis(300), site_json("Segar"));
        let cache = Arc::new(ResultCache::default());

        let provider = provider(&fake, &cache);
        let mut rx = provider.subscribe();
        provider.mount();

        while rx.borrow_and_update().data.is_none() {
            rx.changed().await.unwrap();
        }

        let state = provider.state();
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(hero_title(&state).as_deref(), Some("Segar"));
        assert!(cache.get(SITE_DATA_KEY).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_settles_loading_after_mount_is_aborted() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_ok_after("getAll", Duration::from_secs(2), site_json("Segar"));
        fake.respond_ok_after("getAll", Duration::from_secs(5), site_json("Terlambat"));
        let cache = Arc::new(ResultCache::default());

        let provider = provider(&fake, &cache);
        tokio::join!(provider.refresh(), async {
            tokio::task::yield_now().await;
            provider.mount();
            tokio::time::sleep(Duration::from_millis(100)).await;
            provider.shutdown();
        });

        let state = provider.state();
        assert_eq!(fake.calls_to("getAll").len(), 2);
        assert!(!state.loading);
        assert_eq!(hero_title(&state).as_deref(), Some("Segar"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_aborts_pending_fetch() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_ok_after("getAll", Duration::from_secs(5), site_json("Terlambat"));
        let cache = Arc::new(ResultCache::default());

        let provider = provider(&fake, &cache);
        provider.mount();
        tokio::time::sleep(Duration::from_secs(1)).await;
        provider.shutdown();
        tokio::time::sleep(Duration::from_secs(10)).await;

        let state = provider.state();
        assert!(state.data.is_none());
        assert!(cache.is_empty());
    }
}
