//! Client-level error types shared across the pipeline, stores, and sessions.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// No stored credential is available, or the server rejected the presented one (HTTP 401).
	///
	/// Recoverable through re-authorization unless the caller suppressed it.
	#[error("Request is not authorized.")]
	Unauthorized,
	/// Redirect URL or response body did not match any expected shape.
	#[error(transparent)]
	MalformedResponse(#[from] MalformedResponseError),
	/// Server-reported application error carrying the platform error envelope.
	#[error(transparent)]
	Resource(#[from] ResourceError),
	/// Validated response body did not match the caller's requested type.
	#[error("Response body did not match the requested type.")]
	Decoding {
		/// Structured decoding failure including the JSON path that mismatched.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},

	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Failures raised while parsing an authorization redirect or classifying a response body.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum MalformedResponseError {
	/// Redirect URL could not be reparsed once its fragment became a query string.
	#[error("Redirect URL could not be parsed as an authorization payload.")]
	UnparseableRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Redirect URL is missing a required authorization parameter.
	#[error("Redirect URL is missing the `{name}` parameter.")]
	MissingParameter {
		/// Parameter name defined by the user-agent flow.
		name: &'static str,
	},
	/// Redirect URL carried a parameter that is not a parseable URL.
	#[error("Redirect URL parameter `{name}` is not a valid URL.")]
	InvalidParameterUrl {
		/// Parameter name defined by the user-agent flow.
		name: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Identity URL does not end with organization and user path segments.
	#[error("Identity URL does not carry organization and user path segments.")]
	MalformedIdentityUrl,
	/// Identity URL segments are not usable as store identifiers.
	#[error("Identity URL segments are not valid identifiers.")]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
}

/// Server-reported application error (any non-success status other than 401).
///
/// Carries enough structure for callers to branch on [`error_code`](Self::error_code) or
/// [`fields`](Self::fields) without further network calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceError {
	/// HTTP status code of the failed response.
	pub http_status: u16,
	/// Platform error code (e.g. `INVALID_FIELD`), or the OAuth `error` value.
	pub error_code: Option<String>,
	/// Human-readable message reported by the server.
	pub message: String,
	/// Field names implicated by validation failures, when reported.
	pub fields: Option<Vec<String>>,
	/// Raw body preserved when it matched none of the known error envelopes.
	pub raw_body: Option<String>,
}
impl Display for ResourceError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Salesforce resource error (HTTP {})", self.http_status)?;

		if let Some(code) = &self.error_code {
			write!(f, " [{code}]")?;
		}

		write!(f, ": {}", self.message)
	}
}
impl std::error::Error for ResourceError {}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Resource descriptor produced an invalid request URL.
	#[error("Resource path produced an invalid request URL.")]
	InvalidResourceUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Salesforce endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the Salesforce endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
