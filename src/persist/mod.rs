use crate::model::{UserAction, Waypoint};
use rand::Rng;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

#[cfg(test)]
mod tests;

/// Failure signal from the persistence backend.
///
/// The core never interprets the cause, only whether the attempt succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// Backend did not accept the request (network down, injected failure, ...)
    Unavailable,
    /// Backend rejected the payload
    Rejected(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Unavailable => write!(f, "persistence backend unavailable"),
            PersistenceError::Rejected(reason) => {
                write!(f, "persistence backend rejected request: {}", reason)
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

/// Asynchronous persistence boundary behind the observable store.
///
/// `apply` resolves to the authoritative snapshot as accepted by the backend;
/// the store replaces its copy with that echo on success.
pub trait Persistence {
    /// Fetch the full collection (store bootstrap).
    fn load(&self) -> impl std::future::Future<Output = Result<Vec<Waypoint>, PersistenceError>>;

    /// Apply a single mutation.
    fn apply(
        &self,
        action: UserAction,
        waypoint: &Waypoint,
    ) -> impl std::future::Future<Output = Result<Waypoint, PersistenceError>>;
}

/// In-memory persistence backend with configurable latency and failure
/// injection, for demos and tests.
pub struct MockPersistence {
    journal: Mutex<Vec<Waypoint>>,
    latency: Duration,
    failure_rate: f64,
    fail_next: AtomicBool,
}

impl MockPersistence {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            journal: Mutex::new(waypoints),
            latency: Duration::ZERO,
            failure_rate: 0.0,
            fail_next: AtomicBool::new(false),
        }
    }

    /// Simulated round-trip latency for every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Probability in [0, 1] that any given `apply` call fails.
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    /// Force the next `apply` call to fail (deterministic failure injection).
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn should_fail(&self) -> bool {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return true;
        }
        self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Persistence for MockPersistence {
    async fn load(&self) -> Result<Vec<Waypoint>, PersistenceError> {
        self.simulate_latency().await;
        Ok(self.journal.lock().expect("journal lock poisoned").clone())
    }

    async fn apply(
        &self,
        action: UserAction,
        waypoint: &Waypoint,
    ) -> Result<Waypoint, PersistenceError> {
        self.simulate_latency().await;

        if self.should_fail() {
            debug!(waypoint_id = %waypoint.id, ?action, "Mock persistence failing request");
            return Err(PersistenceError::Unavailable);
        }

        let mut journal = self.journal.lock().expect("journal lock poisoned");
        match action {
            UserAction::Add => journal.push(waypoint.clone()),
            UserAction::Update => {
                match journal.iter_mut().find(|stored| stored.id == waypoint.id) {
                    Some(stored) => *stored = waypoint.clone(),
                    None => {
                        return Err(PersistenceError::Rejected(format!(
                            "unknown waypoint {}",
                            waypoint.id
                        )))
                    }
                }
            }
            UserAction::Remove => journal.retain(|stored| stored.id != waypoint.id),
        }

        // Echo the accepted snapshot back as authoritative
        Ok(waypoint.clone())
    }
}
