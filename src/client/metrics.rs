// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for request pipeline outcomes.
#[derive(Debug, Default)]
pub struct RequestMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	reauthorizations: AtomicU64,
}
impl RequestMetrics {
	/// Returns the total number of pipeline executions.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of executions that produced a validated response.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of executions that surfaced an error to the caller.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns the number of interactive re-authorizations triggered by unauthorized attempts.
	pub fn reauthorizations(&self) -> u64 {
		self.reauthorizations.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_reauthorization(&self) {
		self.reauthorizations.fetch_add(1, Ordering::Relaxed);
	}
}
