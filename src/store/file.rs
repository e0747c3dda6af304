//! Simple file-backed [`CredentialStore`] for lightweight deployments and scripting hosts.
//!
//! Platform keychains should be preferred where available; they plug in behind the same
//! [`CredentialStore`] trait. The file store keeps the full snapshot (entries plus the
//! last-stored key) in one JSON document and replaces it atomically after each mutation, so a
//! crash mid-write never loses the previous generation.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{Authorization, StoreKey},
	store::{CredentialStore, StoreError, StoreFuture},
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
	#[serde(default)]
	last_key: Option<StoreKey>,
	#[serde(default)]
	entries: Vec<(StoreKey, Authorization)>,
}

#[derive(Debug, Default)]
struct State {
	entries: HashMap<StoreKey, Authorization>,
	last_key: Option<StoreKey>,
}
impl State {
	fn from_snapshot(snapshot: Snapshot) -> Self {
		Self { entries: snapshot.entries.into_iter().collect(), last_key: snapshot.last_key }
	}

	fn to_snapshot(&self) -> Snapshot {
		Snapshot {
			last_key: self.last_key.clone(),
			entries: self.entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
		}
	}
}

/// Persists authorization records to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<State>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let state =
			if path.exists() { State::from_snapshot(Self::load_snapshot(&path)?) } else { State::default() };

		Ok(Self { path, inner: Arc::new(RwLock::new(state)) })
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(Snapshot::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, state: &State) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(&state.to_snapshot()).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl CredentialStore for FileStore {
	fn retrieve<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<Authorization>> {
		Box::pin(async move { Ok(self.inner.read().entries.get(key).cloned()) })
	}

	fn save(&self, key: StoreKey, authorization: Authorization) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			guard.entries.insert(key.clone(), authorization);
			guard.last_key = Some(key);
			self.persist_locked(&guard)?;

			Ok(())
		})
	}

	fn delete<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			guard.entries.remove(key);

			if guard.last_key.as_ref() == Some(key) {
				guard.last_key = None;
			}

			self.persist_locked(&guard)?;

			Ok(())
		})
	}

	fn last_stored_key(&self) -> StoreFuture<'_, Option<StoreKey>> {
		Box::pin(async move { Ok(self.inner.read().last_key.clone()) })
	}
}
