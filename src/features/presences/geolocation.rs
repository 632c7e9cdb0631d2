//! Device location as reported by the check-in page.
//!
//! A location read has three outcomes. [`GeolocationReport`] is the flattened
//! shape submitted over the wire and is validated before it reaches the gate.
//!
//! [`GeolocationAcquirer`], [`LocationSource`] and [`AcquisitionState`] model
//! the check-in page's acquisition flow; only tests drive them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::geo::Coordinates;

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeolocationOutcome {
    Acquired(Coordinates),
    /// Permission refused by the user or the browser
    Denied,
    /// No fix: hardware missing, timeout, or position unknown
    Unavailable,
}

/// Location state sent along with an eligibility check or a check-in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationReport {
    #[validate(nested)]
    pub coordinates: Option<Coordinates>,
    pub is_available: bool,
    pub is_enabled: bool,
}

impl GeolocationReport {
    pub fn unavailable() -> Self {
        GeolocationOutcome::Unavailable.into()
    }
}

impl From<GeolocationOutcome> for GeolocationReport {
    fn from(outcome: GeolocationOutcome) -> Self {
        match outcome {
            GeolocationOutcome::Acquired(coordinates) => Self {
                coordinates: Some(coordinates),
                is_available: true,
                is_enabled: true,
            },
            GeolocationOutcome::Denied => Self {
                coordinates: None,
                is_available: true,
                is_enabled: false,
            },
            GeolocationOutcome::Unavailable => Self {
                coordinates: None,
                is_available: false,
                is_enabled: false,
            },
        }
    }
}

/// Anything that can produce a single position read
#[allow(dead_code)]
#[async_trait]
pub trait LocationSource: Send + Sync + 'static {
    async fn current_position(&self) -> GeolocationOutcome;
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionState {
    Idle,
    Acquiring,
    Ready(GeolocationReport),
}

/// Issues location reads; a read superseded by a newer request is discarded
#[allow(dead_code)]
pub struct GeolocationAcquirer<S> {
    source: Arc<S>,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<AcquisitionState>>,
}

#[allow(dead_code)]
impl<S: LocationSource> GeolocationAcquirer<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(AcquisitionState::Idle);
        Self {
            source: Arc::new(source),
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AcquisitionState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> AcquisitionState {
        self.state.borrow().clone()
    }

    /// Start a new read. Also serves as the manual retry after a denial or
    /// an out-of-radius result.
    pub fn request_acquisition(&self) -> JoinHandle<()> {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = AcquisitionState::Acquiring;
        });

        let source = Arc::clone(&self.source);
        let latest = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let report = GeolocationReport::from(source.current_position().await);

            let published = state.send_if_modified(|current| {
                if latest.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *current = AcquisitionState::Ready(report);
                true
            });

            if !published {
                tracing::debug!("Dropping superseded location read (generation {})", generation);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Each read blocks until the test releases the matching gate
    struct GatedSource {
        calls: AtomicUsize,
        gates: Mutex<Vec<Option<oneshot::Receiver<GeolocationOutcome>>>>,
    }

    impl GatedSource {
        fn new(reads: usize) -> (Self, Vec<oneshot::Sender<GeolocationOutcome>>) {
            let (senders, receivers): (Vec<_>, Vec<_>) =
                (0..reads).map(|_| oneshot::channel()).unzip();
            let source = Self {
                calls: AtomicUsize::new(0),
                gates: Mutex::new(receivers.into_iter().map(Some).collect()),
            };
            (source, senders)
        }
    }

    #[async_trait]
    impl LocationSource for GatedSource {
        async fn current_position(&self) -> GeolocationOutcome {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gates.lock().unwrap()[index].take().unwrap();
            gate.await.unwrap_or(GeolocationOutcome::Unavailable)
        }
    }

    struct FixedSource(GeolocationOutcome);

    #[async_trait]
    impl LocationSource for FixedSource {
        async fn current_position(&self) -> GeolocationOutcome {
            self.0
        }
    }

    async fn wait_for_calls(acquirer: &GeolocationAcquirer<GatedSource>, n: usize) {
        while acquirer.source.calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_report_from_outcome() {
        let here = Coordinates::new(-7.005, 110.0);
        let acquired = GeolocationReport::from(GeolocationOutcome::Acquired(here));
        assert_eq!(acquired.coordinates, Some(here));
        assert!(acquired.is_available && acquired.is_enabled);

        let denied = GeolocationReport::from(GeolocationOutcome::Denied);
        assert!(denied.coordinates.is_none());
        assert!(denied.is_available);
        assert!(!denied.is_enabled);

        let unavailable = GeolocationReport::unavailable();
        assert!(unavailable.coordinates.is_none());
        assert!(!unavailable.is_available);
    }

    #[test]
    fn test_report_wire_shape() {
        let report: GeolocationReport = serde_json::from_value(serde_json::json!({
            "coordinates": { "latitude": -7.005, "longitude": 110.0 },
            "isAvailable": true,
            "isEnabled": true
        }))
        .unwrap();
        assert_eq!(report.coordinates, Some(Coordinates::new(-7.005, 110.0)));
    }

    #[tokio::test]
    async fn test_acquire_publishes_report() {
        let here = Coordinates::new(-7.0, 110.0);
        let acquirer = GeolocationAcquirer::new(FixedSource(GeolocationOutcome::Acquired(here)));
        assert_eq!(acquirer.current(), AcquisitionState::Idle);

        let mut rx = acquirer.subscribe();
        acquirer.request_acquisition().await.unwrap();

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(
            state,
            AcquisitionState::Ready(GeolocationOutcome::Acquired(here).into())
        );
    }

    #[tokio::test]
    async fn test_retry_after_denial() {
        let here = Coordinates::new(-7.0, 110.0);
        let (source, mut gates) = GatedSource::new(2);
        let acquirer = GeolocationAcquirer::new(source);

        let first = acquirer.request_acquisition();
        wait_for_calls(&acquirer, 1).await;
        gates.remove(0).send(GeolocationOutcome::Denied).unwrap();
        first.await.unwrap();
        assert_eq!(
            acquirer.current(),
            AcquisitionState::Ready(GeolocationReport::from(GeolocationOutcome::Denied))
        );

        let retry = acquirer.request_acquisition();
        assert_eq!(acquirer.current(), AcquisitionState::Acquiring);
        wait_for_calls(&acquirer, 2).await;
        gates
            .remove(0)
            .send(GeolocationOutcome::Acquired(here))
            .unwrap();
        retry.await.unwrap();
        assert_eq!(
            acquirer.current(),
            AcquisitionState::Ready(GeolocationOutcome::Acquired(here).into())
        );
    }

    #[tokio::test]
    async fn test_last_request_wins() {
        let stale = Coordinates::new(-7.020, 110.0);
        let fresh = Coordinates::new(-7.005, 110.0);
        let (source, mut gates) = GatedSource::new(2);
        let acquirer = GeolocationAcquirer::new(source);

        let first = acquirer.request_acquisition();
        wait_for_calls(&acquirer, 1).await;
        let second = acquirer.request_acquisition();
        wait_for_calls(&acquirer, 2).await;

        let second_gate = gates.remove(1);
        let first_gate = gates.remove(0);

        second_gate
            .send(GeolocationOutcome::Acquired(fresh))
            .unwrap();
        second.await.unwrap();

        // The older read resolves last and must not overwrite the newer one
        first_gate
            .send(GeolocationOutcome::Acquired(stale))
            .unwrap();
        first.await.unwrap();

        assert_eq!(
            acquirer.current(),
            AcquisitionState::Ready(GeolocationOutcome::Acquired(fresh).into())
        );
    }
}
