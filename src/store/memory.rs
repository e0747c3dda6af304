//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{Authorization, StoreKey},
	store::{CredentialStore, StoreFuture},
};

#[derive(Debug, Default)]
struct State {
	entries: HashMap<StoreKey, Authorization>,
	last_key: Option<StoreKey>,
}

type SharedState = Arc<RwLock<State>>;

/// Thread-safe storage backend that keeps records in-process for tests and demos.
///
/// Starts empty; the last-stored key is populated by the first [`save`](CredentialStore::save).
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(SharedState);
impl MemoryStore {
	fn save_now(state: SharedState, key: StoreKey, authorization: Authorization) {
		let mut guard = state.write();

		guard.entries.insert(key.clone(), authorization);
		guard.last_key = Some(key);
	}

	fn retrieve_now(state: SharedState, key: StoreKey) -> Option<Authorization> {
		state.read().entries.get(&key).cloned()
	}

	fn delete_now(state: SharedState, key: StoreKey) {
		let mut guard = state.write();

		guard.entries.remove(&key);

		if guard.last_key.as_ref() == Some(&key) {
			guard.last_key = None;
		}
	}

	fn last_key_now(state: SharedState) -> Option<StoreKey> {
		state.read().last_key.clone()
	}
}
impl CredentialStore for MemoryStore {
	fn retrieve<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<Authorization>> {
		let state = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::retrieve_now(state, key)) })
	}

	fn save(&self, key: StoreKey, authorization: Authorization) -> StoreFuture<'_, ()> {
		let state = self.0.clone();

		Box::pin(async move {
			Self::save_now(state, key, authorization);

			Ok(())
		})
	}

	fn delete<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, ()> {
		let state = self.0.clone();
		let key = key.to_owned();

		Box::pin(async move {
			Self::delete_now(state, key);

			Ok(())
		})
	}

	fn last_stored_key(&self) -> StoreFuture<'_, Option<StoreKey>> {
		let state = self.0.clone();

		Box::pin(async move { Ok(Self::last_key_now(state)) })
	}
}
