//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;
pub mod ws_server;

use live_scope::Session;
use std::time::{Duration, Instant};

/// Create a test timeout duration
pub fn test_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Pump `session` until `done` holds or the timeout elapses.
///
/// Returns whether the condition was met.
pub fn pump_until(session: &mut Session, mut done: impl FnMut(&Session) -> bool) -> bool {
    let deadline = Instant::now() + test_timeout();
    loop {
        session.pump();
        if done(session) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}
