use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::EnrichedGame,
    services::providers::GameMetadataProvider,
};

type Slot = Arc<OnceCell<Option<EnrichedGame>>>;

/// Per-candidate metadata lookup with a timeout and an in-memory cache
///
/// Failures never leave this type: timeouts, transport errors and malformed
/// responses all come back as `None` and are logged.
///
/// The cache holds one slot per game name. Concurrent lookups for the same
/// name share the slot, so only one of them reaches the provider. Successful
/// answers (including "no match") stay cached until evicted; a failed fetch
/// gives its slot back so a later request tries again and failures never
/// push cached answers out.
pub struct EnrichmentGateway {
    provider: Arc<dyn GameMetadataProvider>,
    timeout: Duration,
    cache: Mutex<LruCache<String, Slot>>,
}

impl EnrichmentGateway {
    pub fn new(
        provider: Arc<dyn GameMetadataProvider>,
        timeout: Duration,
        cache_capacity: usize,
    ) -> AppResult<Self> {
        let capacity = NonZeroUsize::new(cache_capacity).ok_or_else(|| {
            AppError::InvalidInput("Enrichment cache capacity must be at least 1".to_string())
        })?;

        Ok(Self {
            provider,
            timeout,
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Looks up metadata for a game name
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn lookup(&self, name: &str) -> Option<EnrichedGame> {
        let slot = self.slot(name);

        match slot.get_or_try_init(|| self.fetch(name)).await {
            Ok(game) => game.clone(),
            Err(e) => {
                tracing::warn!(
                    candidate = %name,
                    provider = self.provider.name(),
                    error = %e,
                    "Enrichment lookup failed"
                );
                self.release_empty_slot(name, &slot);
                None
            }
        }
    }

    /// Number of names currently holding a cache slot
    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    fn slot(&self, name: &str) -> Slot {
        let mut cache = self.lock_cache();
        if let Some(slot) = cache.get(name) {
            return slot.clone();
        }
        let slot = Slot::default();
        cache.put(name.to_string(), slot.clone());
        slot
    }

    /// Drops a slot that no fetch managed to fill, unless it was replaced
    fn release_empty_slot(&self, name: &str, slot: &Slot) {
        let mut cache = self.lock_cache();
        let unfilled = cache
            .peek(name)
            .is_some_and(|cached| Arc::ptr_eq(cached, slot) && cached.get().is_none());
        if unfilled {
            cache.pop(name);
        }
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, LruCache<String, Slot>> {
        // Guarded sections never panic mid-update
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn fetch(&self, name: &str) -> AppResult<Option<EnrichedGame>> {
        match tokio::time::timeout(self.timeout, self.provider.lookup(name)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::ExternalApi(format!(
                "Lookup timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockGameMetadataProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn game(name: &str) -> EnrichedGame {
        EnrichedGame {
            name: name.to_string(),
            image: "img.png".to_string(),
            rating: 4.0,
            genres: vec!["Strategy".to_string()],
        }
    }

    fn gateway(provider: MockGameMetadataProvider, capacity: usize) -> EnrichmentGateway {
        EnrichmentGateway::new(Arc::new(provider), Duration::from_secs(5), capacity).unwrap()
    }

    /// Provider that counts calls and answers after a delay
    struct SlowProvider {
        delay: Duration,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl GameMetadataProvider for SlowProvider {
        async fn lookup(&self, name: &str) -> AppResult<Option<EnrichedGame>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(Some(game(name)))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_hit_is_cached() {
        let mut provider = MockGameMetadataProvider::new();
        provider
            .expect_lookup()
            .times(1)
            .returning(|name| Ok(Some(game(name))));
        provider.expect_name().return_const("mock");

        let gateway = gateway(provider, 100);
        assert_eq!(gateway.lookup("Chess Quest").await, Some(game("Chess Quest")));
        assert_eq!(gateway.lookup("Chess Quest").await, Some(game("Chess Quest")));
        assert_eq!(gateway.cached_len(), 1);
    }

    #[tokio::test]
    async fn test_no_match_is_cached() {
        let mut provider = MockGameMetadataProvider::new();
        provider.expect_lookup().times(1).returning(|_| Ok(None));
        provider.expect_name().return_const("mock");

        let gateway = gateway(provider, 100);
        assert_eq!(gateway.lookup("Unknown").await, None);
        assert_eq!(gateway.lookup("Unknown").await, None);
    }

    #[tokio::test]
    async fn test_failure_becomes_none_and_is_retried() {
        let mut provider = MockGameMetadataProvider::new();
        provider
            .expect_lookup()
            .times(2)
            .returning(|_| Err(AppError::ExternalApi("boom".to_string())));
        provider.expect_name().return_const("mock");

        let gateway = gateway(provider, 100);
        assert_eq!(gateway.lookup("Chess Quest").await, None);
        assert_eq!(gateway.lookup("Chess Quest").await, None);
    }

    #[tokio::test]
    async fn test_least_recently_used_is_evicted() {
        let mut provider = MockGameMetadataProvider::new();
        provider
            .expect_lookup()
            .withf(|name| name.to_string() == "A")
            .times(2)
            .returning(|name| Ok(Some(game(name))));
        provider
            .expect_lookup()
            .withf(|name| name.to_string() != "A")
            .times(2)
            .returning(|name| Ok(Some(game(name))));
        provider.expect_name().return_const("mock");

        let gateway = gateway(provider, 2);
        gateway.lookup("A").await;
        gateway.lookup("B").await;
        gateway.lookup("C").await;
        assert_eq!(gateway.cached_len(), 2);
        // "A" was evicted by "C", so this goes back to the provider
        gateway.lookup("A").await;
    }

    #[tokio::test]
    async fn test_failures_do_not_evict_cached_answers() {
        let mut provider = MockGameMetadataProvider::new();
        provider
            .expect_lookup()
            .withf(|name| name.to_string() == "A" || name.to_string() == "B")
            .times(2)
            .returning(|name| Ok(Some(game(name))));
        provider
            .expect_lookup()
            .withf(|name| name.to_string() != "A" && name.to_string() != "B")
            .times(4)
            .returning(|_| Err(AppError::ExternalApi("boom".to_string())));
        provider.expect_name().return_const("mock");

        let gateway = gateway(provider, 2);
        gateway.lookup("A").await;
        gateway.lookup("B").await;
        for name in ["C", "D", "E", "F"] {
            assert_eq!(gateway.lookup(name).await, None);
        }

        assert_eq!(gateway.cached_len(), 2);
        // Both answers are still cached, so the provider is not asked again
        assert_eq!(gateway.lookup("A").await, Some(game("A")));
        assert_eq!(gateway.lookup("B").await, Some(game("B")));
    }

    #[tokio::test]
    async fn test_failed_slot_is_released() {
        let mut provider = MockGameMetadataProvider::new();
        provider
            .expect_lookup()
            .times(1)
            .returning(|_| Err(AppError::ExternalApi("boom".to_string())));
        provider.expect_name().return_const("mock");

        let gateway = gateway(provider, 10);
        assert_eq!(gateway.lookup("Chess Quest").await, None);
        assert_eq!(gateway.cached_len(), 0);
    }

    #[tokio::test]
    async fn test_timeout_yields_none() {
        let provider = SlowProvider {
            delay: Duration::from_secs(10),
            calls: AtomicUsize::new(0),
        };
        let gateway =
            EnrichmentGateway::new(Arc::new(provider), Duration::from_millis(50), 10).unwrap();

        let started = std::time::Instant::now();
        assert_eq!(gateway.lookup("Chess Quest").await, None);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_one_fetch() {
        let provider = Arc::new(SlowProvider {
            delay: Duration::from_millis(100),
            calls: AtomicUsize::new(0),
        });
        let gateway = Arc::new(
            EnrichmentGateway::new(provider.clone(), Duration::from_secs(5), 10).unwrap(),
        );

        let tasks: Vec<_> = (0..5)
            .map(|_| {
                let gateway = gateway.clone();
                tokio::spawn(async move { gateway.lookup("Chess Quest").await })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap(), Some(game("Chess Quest")));
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let provider = MockGameMetadataProvider::new();
        assert!(EnrichmentGateway::new(Arc::new(provider), Duration::from_secs(5), 0).is_err());
    }
}
