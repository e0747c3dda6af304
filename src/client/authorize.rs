//! Interactive authorization coordination with single-flight deduplication.
//!
//! [`Salesforce::authorize`] drives the OAuth2 user-agent flow through the configured
//! [`BrowserSession`](crate::session::BrowserSession). The pending result is a shared handle
//! guarded by a mutex test-and-set: a call made while a session is outstanding receives the
//! *same* handle instead of opening a second browser session, and every waiter observes the
//! single resolution. The handle clears itself when the session resolves, so the next call
//! starts fresh.

// crates.io
use futures_util::{FutureExt, future::Shared};
// self
use crate::{
	_prelude::*,
	auth::{Authorization, StoreKey},
	client::Salesforce,
	error::MalformedResponseError,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::SessionOutcome,
	store::StoreError,
};

/// Shared handle to the one in-flight interactive authorization.
pub(crate) type PendingAuthorization =
	Shared<Pin<Box<dyn Future<Output = Result<Authorization, AuthorizeError>> + Send>>>;

/// Cloneable failure distributed through the shared pending handle.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub(crate) enum AuthorizeError {
	/// The end user dismissed the interactive session.
	#[error("Interactive login was cancelled.")]
	Cancelled,
	/// The redirect could not be parsed into an authorization record.
	#[error(transparent)]
	MalformedResponse(MalformedResponseError),
	/// Persisting the new record failed.
	#[error("{0}")]
	Storage(StoreError),
}
impl From<AuthorizeError> for Error {
	fn from(e: AuthorizeError) -> Self {
		match e {
			// Cancellation leaves the caller exactly as unauthorized as it started.
			AuthorizeError::Cancelled => Error::Unauthorized,
			AuthorizeError::MalformedResponse(inner) => Error::MalformedResponse(inner),
			AuthorizeError::Storage(inner) => Error::Storage(inner),
		}
	}
}

impl Salesforce {
	/// Drives one interactive user-agent authorization and returns the resulting record.
	///
	/// Concurrent calls share a single browser session. On success the record is persisted
	/// under its derived user/org plus the configured consumer key, and the client binds to
	/// that key for subsequent requests.
	pub async fn authorize(&self) -> Result<Authorization> {
		const KIND: FlowKind = FlowKind::Authorization;

		let span = FlowSpan::new(KIND, "authorize");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let handle = self.pending_authorization();
		let result = span.instrument(handle).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result.map_err(Error::from)
	}

	/// Returns the in-flight handle, creating one only when the coordinator is idle.
	fn pending_authorization(&self) -> PendingAuthorization {
		let mut pending = self.pending.lock();

		if let Some(handle) = pending.as_ref() {
			return handle.clone();
		}

		let handle = self.launch_session();

		*pending = Some(handle.clone());

		handle
	}

	fn launch_session(&self) -> PendingAuthorization {
		let this = self.clone();
		let fut = async move {
			let result = this.run_interactive_session().await;

			// Clear the handle before waiters observe the result, so a later call starts a
			// fresh session instead of replaying this one.
			this.pending.lock().take();

			result
		};

		fut.boxed().shared()
	}

	async fn run_interactive_session(&self) -> Result<Authorization, AuthorizeError> {
		let authorization_url = self.config.authorization_url();
		let outcome =
			self.session.authenticate(authorization_url, self.config.callback_scheme()).await;
		let redirect = match outcome {
			SessionOutcome::Redirect(url) => url,
			SessionOutcome::Cancelled => return Err(AuthorizeError::Cancelled),
		};
		let authorization = Authorization::from_redirect_url(&redirect)
			.map_err(AuthorizeError::MalformedResponse)?;
		let key = StoreKey::for_authorization(&authorization, self.config.consumer_key.clone())
			.map_err(|e| {
				AuthorizeError::MalformedResponse(MalformedResponseError::InvalidIdentifier(e))
			})?;

		self.store
			.save(key.clone(), authorization.clone())
			.await
			.map_err(AuthorizeError::Storage)?;
		self.bind_key(key);

		Ok(authorization)
	}
}
