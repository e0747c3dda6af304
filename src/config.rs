//! Connected-app configuration consumed by the client.

// self
use crate::{_prelude::*, auth::ConsumerKey};

const DEFAULT_AUTHORIZATION_HOST: &str = "https://login.salesforce.com";
const AUTHORIZE_PATH: &str = "/services/oauth2/authorize";

/// Describes the connected app on whose behalf the client authenticates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
	/// Consumer key registered for the connected app.
	pub consumer_key: ConsumerKey,
	/// Redirect URL registered for the connected app; its scheme is the callback scheme the
	/// interactive session watches for.
	pub callback_url: Url,
	/// Host that serves the OAuth2 authorize endpoint.
	pub authorization_host: Url,
	/// OAuth scopes requested during authorization (space-joined on the wire). An empty list
	/// omits the `scope` parameter and falls back to the connected app's defaults.
	pub scopes: Vec<String>,
}
impl Configuration {
	/// Creates a configuration targeting the production login host.
	pub fn new(consumer_key: ConsumerKey, callback_url: Url) -> Self {
		// The default host is a compile-time constant; parsing it cannot fail.
		let authorization_host = Url::parse(DEFAULT_AUTHORIZATION_HOST)
			.expect("Default authorization host is a valid URL.");

		Self { consumer_key, callback_url, authorization_host, scopes: Vec::new() }
	}

	/// Overrides the authorization host (e.g. `https://test.salesforce.com` for sandboxes).
	pub fn with_authorization_host(mut self, host: Url) -> Self {
		self.authorization_host = host;

		self
	}

	/// Sets the OAuth scopes requested during authorization.
	pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Builds the user-agent flow authorize URL for this connected app.
	pub fn authorization_url(&self) -> Url {
		let mut url = self.authorization_host.clone();

		url.set_path(AUTHORIZE_PATH);
		url.set_query(None);

		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("response_type", "token");
		pairs.append_pair("client_id", self.consumer_key.as_ref());
		pairs.append_pair("redirect_uri", self.callback_url.as_str());

		if !self.scopes.is_empty() {
			pairs.append_pair("scope", &self.scopes.join(" "));
		}

		drop(pairs);

		url
	}

	/// Scheme of the registered callback URL, watched for by the interactive session.
	pub fn callback_scheme(&self) -> &str {
		self.callback_url.scheme()
	}
}
