//! Immutable authorization record produced by the OAuth2 user-agent flow.

// self
use crate::{_prelude::*, auth::secret::TokenSecret, error::MalformedResponseError};

/// Holds the result of one successful OAuth2 user-agent authorization.
///
/// All four fields are consistent outputs of a single authorization event. The user and
/// organization identifiers are derived from [`identity_url`](Self::identity_url) on access and
/// never stored redundantly. Records are immutable; re-authorization replaces them wholesale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AuthorizationParts", into = "AuthorizationParts")]
pub struct Authorization {
	access_token: TokenSecret,
	instance_url: Url,
	identity_url: Url,
	refresh_token: Option<TokenSecret>,
}
impl Authorization {
	/// Creates a record after validating that the identity URL carries organization and user
	/// path segments, which keeps [`user_id`](Self::user_id) and [`org_id`](Self::org_id) total.
	pub fn new(
		access_token: TokenSecret,
		instance_url: Url,
		identity_url: Url,
		refresh_token: Option<TokenSecret>,
	) -> Result<Self, MalformedResponseError> {
		if identity_ids(&identity_url).is_none() {
			return Err(MalformedResponseError::MalformedIdentityUrl);
		}

		Ok(Self { access_token, instance_url, identity_url, refresh_token })
	}

	/// Parses the redirect URL produced by the user-agent flow.
	///
	/// The authorization payload rides in the URL fragment, so the first `#` is rewritten into
	/// a `?` and the payload is read back as an ordinary query string. `access_token`, a
	/// parseable `instance_url`, and a parseable `id` URL are required; `refresh_token` is
	/// present only when the connected app's scopes grant offline access. When a parameter is
	/// duplicated, the first occurrence wins.
	pub fn from_redirect_url(url: &Url) -> Result<Self, MalformedResponseError> {
		let rewritten = url.as_str().replacen('#', "?", 1);
		let parsed = Url::parse(&rewritten)
			.map_err(|source| MalformedResponseError::UnparseableRedirect { source })?;
		let access_token = query_value(&parsed, "access_token")
			.ok_or(MalformedResponseError::MissingParameter { name: "access_token" })?;
		let instance_url = query_url(&parsed, "instance_url")?;
		let identity_url = query_url(&parsed, "id")?;
		let refresh_token = query_value(&parsed, "refresh_token").map(TokenSecret::new);

		Self::new(TokenSecret::new(access_token), instance_url, identity_url, refresh_token)
	}

	/// Bearer credential presented on every API call.
	pub fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	/// Org-specific base endpoint for API requests.
	pub fn instance_url(&self) -> &Url {
		&self.instance_url
	}

	/// Identity URL encoding the organization and user identifiers as path segments.
	pub fn identity_url(&self) -> &Url {
		&self.identity_url
	}

	/// Refresh token, when the connected app's scopes grant offline access.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref()
	}

	/// User identifier, the identity URL's last path segment.
	pub fn user_id(&self) -> &str {
		// Construction validated the identity URL, so both segments are always present.
		identity_ids(&self.identity_url).map(|(_, user)| user).unwrap_or_default()
	}

	/// Organization identifier, the identity URL's second-to-last path segment.
	pub fn org_id(&self) -> &str {
		identity_ids(&self.identity_url).map(|(org, _)| org).unwrap_or_default()
	}
}

/// Wire/persistence mirror of [`Authorization`]; deserialization re-validates through
/// [`Authorization::new`].
#[derive(Clone, Serialize, Deserialize)]
struct AuthorizationParts {
	access_token: TokenSecret,
	instance_url: Url,
	identity_url: Url,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	refresh_token: Option<TokenSecret>,
}
impl TryFrom<AuthorizationParts> for Authorization {
	type Error = MalformedResponseError;

	fn try_from(parts: AuthorizationParts) -> Result<Self, Self::Error> {
		Authorization::new(
			parts.access_token,
			parts.instance_url,
			parts.identity_url,
			parts.refresh_token,
		)
	}
}
impl From<Authorization> for AuthorizationParts {
	fn from(authorization: Authorization) -> Self {
		Self {
			access_token: authorization.access_token,
			instance_url: authorization.instance_url,
			identity_url: authorization.identity_url,
			refresh_token: authorization.refresh_token,
		}
	}
}

fn identity_ids(identity_url: &Url) -> Option<(&str, &str)> {
	let mut segments = identity_url.path_segments()?.filter(|segment| !segment.is_empty());
	let user = segments.next_back()?;
	let org = segments.next_back()?;

	Some((org, user))
}

fn query_value(url: &Url, name: &str) -> Option<String> {
	url.query_pairs().find_map(|(key, value)| (key == name).then(|| value.into_owned()))
}

fn query_url(url: &Url, name: &'static str) -> Result<Url, MalformedResponseError> {
	let raw = query_value(url, name).ok_or(MalformedResponseError::MissingParameter { name })?;

	Url::parse(&raw).map_err(|source| MalformedResponseError::InvalidParameterUrl { name, source })
}
