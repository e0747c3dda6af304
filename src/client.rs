//! High-level Salesforce client owning the authenticated request pipeline.

mod authorize;
mod metrics;
mod request;

pub use metrics::RequestMetrics;

// self
use crate::{
	_prelude::*,
	auth::{Authorization, OrgId, StoreKey, UserId},
	client::authorize::PendingAuthorization,
	config::Configuration,
	error::ConfigError,
	session::BrowserSession,
	store::CredentialStore,
};

/// Explicit user binding for clients that manage a known credential set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
	/// User identifier.
	pub user_id: UserId,
	/// Organization identifier.
	pub org_id: OrgId,
}
impl User {
	/// Creates a binding from its identifiers.
	pub fn new(user_id: UserId, org_id: OrgId) -> Self {
		Self { user_id, org_id }
	}
}

/// Per-call options accepted by the request pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
	/// Fails unauthorized calls immediately instead of starting an interactive login.
	///
	/// Login-probe style calls set this so they never present UI.
	pub suppress_authentication: bool,
}
impl RequestOptions {
	/// Default options: interactive re-authorization enabled.
	pub const fn new() -> Self {
		Self { suppress_authentication: false }
	}

	/// Disables interactive re-authorization for this call.
	pub const fn suppressing_authentication(mut self) -> Self {
		self.suppress_authentication = true;

		self
	}
}

/// Coordinates authenticated REST requests for one connected app.
///
/// The client owns the HTTP transport, the credential store, and the interactive session
/// reference so the pipeline modules can focus on orchestration. Cloning is cheap and clones
/// share the same pending-authorization handle, preserving the at-most-one-session invariant
/// across clones.
#[derive(Clone)]
pub struct Salesforce {
	/// Connected-app configuration driving authorization URLs and store keys.
	pub config: Configuration,
	/// HTTP client used for every outbound request.
	pub http_client: ReqwestClient,
	/// Credential store consulted before each request and updated after authorization.
	pub store: Arc<dyn CredentialStore>,
	/// Interactive browsing surface that performs the user-agent login.
	pub session: Arc<dyn BrowserSession>,
	/// In-process counters for pipeline outcomes.
	pub request_metrics: Arc<RequestMetrics>,
	bound_key: Arc<Mutex<Option<StoreKey>>>,
	pending: Arc<Mutex<Option<PendingAuthorization>>>,
}
impl Salesforce {
	/// Creates a client with a crate-provisioned HTTP transport.
	///
	/// The transport never follows redirects: API results come back directly, and the
	/// authorization redirect must reach the interactive session rather than the HTTP stack.
	pub fn new(
		config: Configuration,
		store: Arc<dyn CredentialStore>,
		session: Arc<dyn BrowserSession>,
	) -> Result<Self, ConfigError> {
		let http_client =
			ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self::with_http_client(config, store, session, http_client))
	}

	/// Creates a client that reuses the caller-provided HTTP transport.
	pub fn with_http_client(
		config: Configuration,
		store: Arc<dyn CredentialStore>,
		session: Arc<dyn BrowserSession>,
		http_client: ReqwestClient,
	) -> Self {
		Self {
			config,
			http_client,
			store,
			session,
			request_metrics: Default::default(),
			bound_key: Default::default(),
			pending: Default::default(),
		}
	}

	/// Binds the client to an explicit user/organization pair.
	///
	/// Unbound clients fall back to the store's last-stored key on every call until an
	/// authorization binds one.
	pub fn with_user(self, user: User) -> Self {
		let key = StoreKey::new(user.user_id, user.org_id, self.config.consumer_key.clone());

		*self.bound_key.lock() = Some(key);

		self
	}

	/// Returns the stored authorization for this client's key, if any.
	pub async fn authorization(&self) -> Result<Option<Authorization>> {
		match self.current_key().await? {
			Some(key) => Ok(self.store.retrieve(&key).await?),
			None => Ok(None),
		}
	}

	/// Deletes the stored authorization for this client's key and unbinds it.
	pub async fn deauthorize(&self) -> Result<()> {
		if let Some(key) = self.current_key().await? {
			self.store.delete(&key).await?;
		}

		*self.bound_key.lock() = None;

		Ok(())
	}

	pub(crate) async fn current_key(&self) -> Result<Option<StoreKey>> {
		if let Some(key) = self.bound_key.lock().clone() {
			return Ok(Some(key));
		}

		Ok(self.store.last_stored_key().await?)
	}

	pub(crate) fn bind_key(&self, key: StoreKey) {
		*self.bound_key.lock() = Some(key);
	}
}
impl Debug for Salesforce {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Salesforce")
			.field("config", &self.config)
			.field("bound_key", &*self.bound_key.lock())
			.field("authorizing", &self.pending.lock().is_some())
			.finish()
	}
}
