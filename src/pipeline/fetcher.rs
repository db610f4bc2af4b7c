//! Bounded parallel fetcher
//!
//! Every fetch wave (transfer pages, transaction detail, contract lookups)
//! goes through `bounded_parallel_map`:
//! 1. All inputs are spawned onto a `JoinSet` up front
//! 2. Each task acquires a semaphore permit before doing work, capping in-flight work
//! 3. Outputs are stored at their input index, so order survives completion order
//!
//! A failed request never aborts its siblings; it simply occupies its slot
//! with an `Err`.

use crate::error::FetchError;
use crate::http::HttpClient;
use crate::pipeline::requests::{HttpMethod, RequestDescriptor};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Parsed body of a successful request
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPayload {
    pub status: u16,
    pub body: Value,
}

/// Outcome of one request, positionally matched to its descriptor
pub type FetchResult = Result<FetchedPayload, FetchError>;

/// Run `worker` over every input with at most `limit` invocations in flight
///
/// Returns one slot per input in input order. A slot is `None` only if its
/// worker panicked.
pub async fn bounded_parallel_map<I, O, F, Fut>(inputs: Vec<I>, limit: usize, worker: F) -> Vec<Option<O>>
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = O> + Send + 'static,
{
    let count = inputs.len();
    let mut slots: Vec<Option<O>> = (0..count).map(|_| None).collect();
    if count == 0 {
        return slots;
    }

    let semaphore = Arc::new(Semaphore::new(limit.clamp(1, Semaphore::MAX_PERMITS)));
    let worker = Arc::new(worker);
    let mut join_set = JoinSet::new();

    for (idx, input) in inputs.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        let worker = worker.clone();

        join_set.spawn(async move {
            // The semaphore is owned here and never closed
            let permit = semaphore.acquire_owned().await;
            let output = worker(input).await;
            drop(permit);
            (idx, output)
        });
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((idx, output)) => slots[idx] = Some(output),
            Err(e) => log::error!("❌ Fetch worker task failed: {}", e),
        }
    }

    slots
}

/// Execute a batch of requests with a fixed concurrency ceiling
///
/// Always returns exactly `requests.len()` results in submission order.
pub async fn fetch_all(
    client: Arc<dyn HttpClient>,
    requests: Vec<RequestDescriptor>,
    concurrency: usize,
) -> Vec<FetchResult> {
    let slots = bounded_parallel_map(requests, concurrency, move |request| {
        let client = client.clone();
        async move { fetch_one(client.as_ref(), &request).await }
    })
    .await;

    slots
        .into_iter()
        .map(|slot| slot.unwrap_or(Err(FetchError::Aborted)))
        .collect()
}

async fn fetch_one(client: &dyn HttpClient, request: &RequestDescriptor) -> FetchResult {
    let response = match request.method {
        HttpMethod::Get => client.get(&request.url).await,
    };

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            log::debug!("⚠️  GET {} failed: {}", request.url, e);
            return Err(e);
        }
    };

    let body: Value = serde_json::from_str(&response.body).map_err(|e| {
        log::debug!("⚠️  GET {} returned undecodable body: {}", request.url, e);
        FetchError::Decode(e.to_string())
    })?;

    Ok(FetchedPayload {
        status: response.status,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_preserve_input_order() {
        let inputs: Vec<u64> = (0..50).collect();

        // later inputs finish first
        let slots = bounded_parallel_map(inputs, 8, |i| async move {
            tokio::time::sleep(Duration::from_millis(50 - i)).await;
            i * 10
        })
        .await;

        let outputs: Vec<u64> = slots.into_iter().map(|s| s.unwrap()).collect();
        assert_eq!(outputs, (0..50).map(|i| i * 10).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_ceiling_respected() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let worker_in_flight = in_flight.clone();
        let worker_peak = peak.clone();
        let slots = bounded_parallel_map((0..64).collect::<Vec<u32>>(), 5, move |i| {
            let in_flight = worker_in_flight.clone();
            let peak = worker_peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                i
            }
        })
        .await;

        assert_eq!(slots.len(), 64);
        assert!(peak.load(Ordering::SeqCst) <= 5);
        assert!(peak.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_panicking_worker_leaves_empty_slot() {
        let slots = bounded_parallel_map(vec![1u32, 2, 3], 2, |i| async move {
            if i == 2 {
                panic!("boom");
            }
            i
        })
        .await;

        assert_eq!(slots, vec![Some(1), None, Some(3)]);
    }

    #[tokio::test]
    async fn test_unbounded_limit_is_clamped() {
        let slots = bounded_parallel_map(vec![1u8, 2], usize::MAX, |i| async move { i }).await;
        assert_eq!(slots, vec![Some(1), Some(2)]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let slots = bounded_parallel_map(Vec::<u32>::new(), 4, |i| async move { i }).await;
        assert!(slots.is_empty());
    }
}
