// --------------------------------------------------
// Advice text shown above the alarm list.
//
// The provider is an external collaborator behind a trait;
// the service in front of it keeps the current text, enforces
// a single in-flight refresh and never lets a failure through.
// --------------------------------------------------

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

pub const DEFAULT_ADVICE: &str = "Tonight you don't have to be strong or have every answer. \
Let your heart rest, the way the sky slowly darkens when it's time.";

// A provider call still pending after this long counts as failed
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

// Shown whenever the provider fails
pub const FALLBACK_ADVICE: &str = "Take a deep breath. Rest is part of the work.";

const MORNING_PHRASES: [&str; 4] = [
    "Good morning. Drink some water before anything else.",
    "A slow start is still a start. Stretch and open a window.",
    "Today only needs your next small step, not all of them.",
    "Let the light in. You slept, and that counts.",
];

const EVENING_PHRASES: [&str; 4] = [
    "Put the screen down a little earlier tonight. Tomorrow will wait.",
    "You did enough today. Let the rest of it go.",
    "Dim the lights and let your shoulders drop.",
    "Sleep is not a reward you earn. It's something you need.",
];

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("advice provider did not answer within {0:?}")]
    TimedOut(Duration),

    #[error("advice provider returned an empty message")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceRequest {
    pub time_label: String, // "HH:MM" local time
    pub is_morning: bool,
}

#[async_trait]
pub trait AdviceProvider: Send + Sync {
    async fn fetch_advice(&self, request: &AdviceRequest) -> Result<String, AdviceError>;
}

// Built-in provider choosing from a fixed phrase list, keyed on the time label
// so the same minute gives the same phrase
pub struct PhraseAdviceProvider;

#[async_trait]
impl AdviceProvider for PhraseAdviceProvider {
    async fn fetch_advice(&self, request: &AdviceRequest) -> Result<String, AdviceError> {
        let phrases: &[&str] = if request.is_morning {
            &MORNING_PHRASES
        } else {
            &EVENING_PHRASES
        };
        let seed: usize = request.time_label.bytes().map(usize::from).sum();
        phrases
            .get(seed % phrases.len())
            .map(|p| p.to_string())
            .ok_or(AdviceError::Empty)
    }
}

// Provider call that always resolves to something displayable
pub async fn fetch_or_fallback(provider: &dyn AdviceProvider, request: &AdviceRequest) -> String {
    let result = tokio::time::timeout(PROVIDER_TIMEOUT, provider.fetch_advice(request))
        .await
        .unwrap_or(Err(AdviceError::TimedOut(PROVIDER_TIMEOUT)));

    match result {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            log::warn!("Advice provider error: {}", AdviceError::Empty);
            FALLBACK_ADVICE.to_string()
        }
        Err(e) => {
            log::warn!("Advice provider error: {e}");
            FALLBACK_ADVICE.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AdviceSnapshot {
    pub advice: String,
    pub loading: bool,
}

/// Current advice text plus the busy flag guarding refreshes.
#[derive(Clone)]
pub struct AdviceService {
    provider: Arc<dyn AdviceProvider>,
    current: Arc<RwLock<String>>,
    busy: Arc<AtomicBool>,
}

impl AdviceService {
    pub fn new(provider: Arc<dyn AdviceProvider>) -> Self {
        Self {
            provider,
            current: Arc::new(RwLock::new(DEFAULT_ADVICE.to_string())),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> AdviceSnapshot {
        AdviceSnapshot {
            advice: self.current.read().await.clone(),
            loading: self.is_busy(),
        }
    }

    /// Start a refresh in the background; the caller does not wait for it.
    ///
    /// Returns `false` without calling the provider when a refresh is already in
    /// flight. Requests are dropped, not queued. The busy flag is taken before
    /// returning, so a second call made right after this one is rejected and
    /// snapshots already report `loading`.
    pub fn spawn_refresh(&self, request: AdviceRequest) -> bool {
        if !self.try_claim() {
            return false;
        }
        let service = self.clone();
        tokio::spawn(async move {
            service.fetch_claimed(request).await;
        });
        true
    }

    fn try_claim(&self) -> bool {
        let claimed = self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if !claimed {
            log::debug!("Advice refresh already in flight, dropping request");
        }
        claimed
    }

    // Caller must hold the busy flag; it is released once the text is stored
    async fn fetch_claimed(&self, request: AdviceRequest) {
        let text = fetch_or_fallback(self.provider.as_ref(), &request).await;
        *self.current.write().await = text;
        self.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct FailingProvider;

    #[async_trait]
    impl AdviceProvider for FailingProvider {
        async fn fetch_advice(&self, _request: &AdviceRequest) -> Result<String, AdviceError> {
            Err(AdviceError::Empty)
        }
    }

    struct HangingProvider;

    #[async_trait]
    impl AdviceProvider for HangingProvider {
        async fn fetch_advice(&self, _request: &AdviceRequest) -> Result<String, AdviceError> {
            std::future::pending().await
        }
    }

    struct BlankProvider;

    #[async_trait]
    impl AdviceProvider for BlankProvider {
        async fn fetch_advice(&self, _request: &AdviceRequest) -> Result<String, AdviceError> {
            Ok("   ".to_string())
        }
    }

    struct SlowProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AdviceProvider for SlowProvider {
        async fn fetch_advice(&self, request: &AdviceRequest) -> Result<String, AdviceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(format!("advice for {}", request.time_label))
        }
    }

    fn request(time: &str, is_morning: bool) -> AdviceRequest {
        AdviceRequest {
            time_label: time.to_string(),
            is_morning,
        }
    }

    #[tokio::test]
    async fn phrases_follow_time_of_day() {
        let morning = PhraseAdviceProvider.fetch_advice(&request("07:10", true)).await.unwrap();
        let evening = PhraseAdviceProvider.fetch_advice(&request("22:10", false)).await.unwrap();
        assert!(MORNING_PHRASES.contains(&morning.as_str()));
        assert!(EVENING_PHRASES.contains(&evening.as_str()));
    }

    #[tokio::test]
    async fn failures_resolve_to_fallback() {
        assert_eq!(fetch_or_fallback(&FailingProvider, &request("01:00", false)).await, FALLBACK_ADVICE);
        assert_eq!(fetch_or_fallback(&BlankProvider, &request("01:00", false)).await, FALLBACK_ADVICE);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_provider_times_out_to_fallback() {
        let service = AdviceService::new(Arc::new(HangingProvider));
        assert!(service.spawn_refresh(request("03:00", false)));

        tokio::time::sleep(PROVIDER_TIMEOUT - Duration::from_secs(1)).await;
        assert!(service.snapshot().await.loading);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(service.snapshot().await.advice, FALLBACK_ADVICE);
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn service_starts_with_default_text() {
        let service = AdviceService::new(Arc::new(PhraseAdviceProvider));
        assert_eq!(
            service.snapshot().await,
            AdviceSnapshot {
                advice: DEFAULT_ADVICE.to_string(),
                loading: false
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_stores_fallback() {
        let service = AdviceService::new(Arc::new(FailingProvider));
        assert!(service.spawn_refresh(request("09:00", true)));
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(service.snapshot().await.advice, FALLBACK_ADVICE);
        assert!(!service.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_refresh_updates_text() {
        let provider = Arc::new(SlowProvider {
            calls: AtomicUsize::new(0),
        });
        let service = AdviceService::new(provider);

        assert!(service.spawn_refresh(request("21:30", false)));
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(service.snapshot().await.advice, "advice for 21:30");
    }

    #[tokio::test(start_paused = true)]
    async fn back_to_back_spawn_refresh_takes_only_the_first() {
        let provider = Arc::new(SlowProvider {
            calls: AtomicUsize::new(0),
        });
        let service = AdviceService::new(provider.clone());

        assert!(service.spawn_refresh(request("22:00", false)));
        assert!(service.is_busy());
        assert!(service.snapshot().await.loading);
        assert!(!service.spawn_refresh(request("22:01", false)));

        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert!(!service.is_busy());
        assert_eq!(service.snapshot().await.advice, "advice for 22:00");
        assert!(service.spawn_refresh(request("22:05", false)));
    }
}
