//! Storage contracts and built-in store implementations for authorization records.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{Authorization, StoreKey},
};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for authorization records.
///
/// The store is the system-of-record for credentials between pipeline invocations: entries are
/// created or overwritten on successful authorization, read on every authenticated request, and
/// replaced wholesale on re-authorization (never mutated in place). Implementations additionally
/// remember the most-recently-saved key so clients constructed without an explicit user can fall
/// back to the last credential written.
///
/// Lookups (`retrieve`, `last_stored_key`) must report an unavailable backend as `None`; the
/// request pipeline treats a missing credential and an unreachable store identically, by
/// triggering re-authorization. Mutations surface [`StoreError`] instead.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Fetches the record stored under `key`, if present.
	fn retrieve<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<Authorization>>;

	/// Persists `authorization` under `key`, overwriting any prior entry, and marks `key` as the
	/// last-stored key.
	fn save(&self, key: StoreKey, authorization: Authorization) -> StoreFuture<'_, ()>;

	/// Removes the entry under `key`; clears the last-stored key if it pointed at the entry.
	fn delete<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, ()>;

	/// Returns the most recently saved key, or `None` if the store is empty or never written.
	fn last_stored_key(&self) -> StoreFuture<'_, Option<StoreKey>>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
