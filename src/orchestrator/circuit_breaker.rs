use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open { tripped_at: Instant },
    /// One probe request is in flight after the cooldown
    HalfOpen,
}

/// Consecutive-failure tracker for one provider. After `trip_threshold`
/// failures in a row the provider is skipped; once `cooldown` has passed a
/// single probe is let through, and its outcome closes or re-opens the circuit.
pub struct CircuitBreaker {
    state: CircuitState,
    failure_count: u32,
    trip_threshold: u32,
    cooldown: Duration,
}

impl CircuitBreaker {
    pub fn new(trip_threshold: u32, cooldown: Duration) -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            trip_threshold: trip_threshold.max(1),
            cooldown,
        }
    }

    pub fn is_request_allowed(&mut self) -> bool {
        match self.state {
            CircuitState::Closed => true,
            CircuitState::HalfOpen => false,
            CircuitState::Open { tripped_at } => {
                if tripped_at.elapsed() >= self.cooldown {
                    self.state = CircuitState::HalfOpen;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&mut self) {
        if self.state != CircuitState::Closed {
            tracing::info!("Circuit breaker closed after successful probe");
        }
        self.failure_count = 0;
        self.state = CircuitState::Closed;
    }

    pub fn record_failure(&mut self) {
        self.failure_count = self.failure_count.saturating_add(1);

        let reopen = matches!(self.state, CircuitState::HalfOpen);
        if reopen || self.failure_count >= self.trip_threshold {
            self.state = CircuitState::Open {
                tripped_at: Instant::now(),
            };
            tracing::warn!("Circuit breaker tripped, failure_count={}", self.failure_count);
        }
    }

    pub fn reset(&mut self) {
        self.failure_count = 0;
        self.state = CircuitState::Closed;
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn state(&self) -> CircuitState {
        self.state
    }
}
