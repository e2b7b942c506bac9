use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::{
    error::{AppError, AppResult},
    models::{Candidate, EnrichedGame},
    services::enrichment::EnrichmentGateway,
};

/// Runs enrichment lookups for a batch of candidates concurrently
///
/// The permit pool is shared by every request using this coordinator, so at
/// most `workers` lookups hit the external source at any moment.
#[derive(Clone)]
pub struct FanOutCoordinator {
    gateway: Arc<EnrichmentGateway>,
    permits: Arc<Semaphore>,
}

impl FanOutCoordinator {
    pub fn new(gateway: Arc<EnrichmentGateway>, workers: usize) -> AppResult<Self> {
        if workers == 0 {
            return Err(AppError::InvalidInput(
                "Enrichment worker pool needs at least one worker".to_string(),
            ));
        }

        Ok(Self {
            gateway,
            permits: Arc::new(Semaphore::new(workers)),
        })
    }

    /// Enriches every candidate and returns the successful lookups
    ///
    /// Waits for every dispatched lookup before returning. Output follows
    /// candidate order; candidates without a result are dropped.
    pub async fn enrich_all(&self, candidates: &[Candidate]) -> Vec<EnrichedGame> {
        let mut tasks = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let gateway = self.gateway.clone();
            let permits = self.permits.clone();
            let name = candidate.name.clone();
            let task = tokio::spawn(async move {
                // The semaphore is never closed
                let _permit = permits.acquire_owned().await.ok()?;
                gateway.lookup(&name).await
            });
            tasks.push((candidate.name.as_str(), task));
        }

        let mut results = Vec::with_capacity(tasks.len());
        let mut dropped = 0;

        for (name, task) in tasks {
            match task.await {
                Ok(Some(game)) => results.push(game),
                Ok(None) => dropped += 1,
                Err(e) => {
                    tracing::error!(candidate = %name, error = %e, "Enrichment task join error");
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            tracing::warn!(
                success_count = results.len(),
                dropped_count = dropped,
                "Partial enrichment failure"
            );
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::GameMetadataProvider;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    /// Answers after a delay, fails for names starting with "fail", hangs for "slow"
    struct FakeProvider {
        delay: Duration,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl FakeProvider {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl GameMetadataProvider for FakeProvider {
        async fn lookup(&self, name: &str) -> AppResult<Option<EnrichedGame>> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(current, Ordering::SeqCst);

            let delay = if name.starts_with("slow") {
                Duration::from_secs(30)
            } else {
                self.delay
            };
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if name.starts_with("fail") {
                return Err(AppError::ExternalApi("unavailable".to_string()));
            }
            Ok(Some(EnrichedGame {
                name: name.to_string(),
                image: String::new(),
                rating: 0.0,
                genres: Vec::new(),
            }))
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    fn candidates(names: &[&str]) -> Vec<Candidate> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| Candidate {
                index,
                name: name.to_string(),
                genre: "Arcade".to_string(),
                score: 0.5,
            })
            .collect()
    }

    fn coordinator(provider: Arc<FakeProvider>, timeout: Duration, workers: usize) -> FanOutCoordinator {
        let gateway = EnrichmentGateway::new(provider, timeout, 100).unwrap();
        FanOutCoordinator::new(Arc::new(gateway), workers).unwrap()
    }

    #[tokio::test]
    async fn test_failures_are_dropped() {
        let provider = Arc::new(FakeProvider::new(Duration::from_millis(5)));
        let coordinator = coordinator(provider, Duration::from_secs(5), 3);

        let results = coordinator
            .enrich_all(&candidates(&["alpha", "fail-beta", "gamma", "fail-delta"]))
            .await;

        let names: Vec<&str> = results.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "gamma"]);
    }

    #[tokio::test]
    async fn test_every_success_appears_once() {
        let provider = Arc::new(FakeProvider::new(Duration::from_millis(5)));
        let coordinator = coordinator(provider, Duration::from_secs(5), 3);
        let names: Vec<String> = (0..10).map(|i| format!("game-{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        let results = coordinator.enrich_all(&candidates(&refs)).await;

        assert_eq!(results.len(), 10);
        let unique: HashSet<&str> = results.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(unique.len(), 10);
    }

    #[tokio::test]
    async fn test_worker_pool_bounds_concurrency() {
        let provider = Arc::new(FakeProvider::new(Duration::from_millis(30)));
        let coordinator = coordinator(provider.clone(), Duration::from_secs(5), 3);
        let names: Vec<String> = (0..9).map(|i| format!("game-{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        coordinator.enrich_all(&candidates(&refs)).await;

        assert!(provider.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_pool_is_shared_between_batches() {
        let provider = Arc::new(FakeProvider::new(Duration::from_millis(30)));
        let coordinator = coordinator(provider.clone(), Duration::from_secs(5), 2);
        let first: Vec<String> = (0..4).map(|i| format!("first-{}", i)).collect();
        let second: Vec<String> = (0..4).map(|i| format!("second-{}", i)).collect();
        let first_refs: Vec<&str> = first.iter().map(String::as_str).collect();
        let second_refs: Vec<&str> = second.iter().map(String::as_str).collect();
        let (first, second) = (candidates(&first_refs), candidates(&second_refs));

        let (a, b) = tokio::join!(
            coordinator.enrich_all(&first),
            coordinator.enrich_all(&second)
        );

        assert_eq!(a.len() + b.len(), 8);
        assert!(provider.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_one_timeout_does_not_stall_batch() {
        let provider = Arc::new(FakeProvider::new(Duration::from_millis(10)));
        let coordinator = coordinator(provider, Duration::from_millis(200), 3);
        let mut names: Vec<String> = (0..9).map(|i| format!("game-{}", i)).collect();
        names.insert(4, "slow-game".to_string());
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        let started = Instant::now();
        let results = coordinator.enrich_all(&candidates(&refs)).await;

        assert_eq!(results.len(), 9);
        assert!(results.iter().all(|g| g.name != "slow-game"));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let provider = Arc::new(FakeProvider::new(Duration::from_millis(5)));
        let coordinator = coordinator(provider, Duration::from_secs(5), 3);
        assert!(coordinator.enrich_all(&[]).await.is_empty());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let provider = Arc::new(FakeProvider::new(Duration::from_millis(5)));
        let gateway = EnrichmentGateway::new(provider, Duration::from_secs(5), 10).unwrap();
        assert!(FanOutCoordinator::new(Arc::new(gateway), 0).is_err());
    }
}
