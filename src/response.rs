//! Response validation and platform error-envelope classification.
//!
//! The platform reports failures in two distinct JSON envelopes depending on which subsystem
//! rejected the request: the resource layer uses `{message, errorCode, fields?}` while the
//! OAuth layer uses `{error, error_description?}`. Callers have no prior knowledge of which
//! endpoint produced a failure, so classification attempts both shapes in that order and falls
//! back to a generic error that preserves the raw body for diagnostics.

// self
use crate::{_prelude::*, error::ResourceError};

/// Raw HTTP response (status plus body) surfaced by the request pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl DataResponse {
	/// Wraps a status code and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Classifies the response, returning it unchanged on success.
	///
	/// Statuses in `[200, 300)` pass through. A 401 yields [`Error::Unauthorized`] regardless
	/// of body content, which is the request pipeline's re-authorization trigger. Any other
	/// status is decoded through the known error envelopes.
	pub fn validated(self) -> Result<Self> {
		match self.status {
			200..=299 => Ok(self),
			401 => Err(Error::Unauthorized),
			status => Err(classify_error(status, &self.body).into()),
		}
	}

	/// Deserializes the body, reporting mismatches with the failing JSON path.
	pub fn json<T>(&self) -> Result<T>
	where
		T: serde::de::DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::Decoding { source })
	}
}

/// Resource-layer error envelope.
#[derive(Debug, Deserialize)]
struct ResourceErrorBody {
	message: String,
	#[serde(rename = "errorCode")]
	error_code: String,
	fields: Option<Vec<String>>,
}

/// OAuth-layer error envelope.
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
	error: String,
	error_description: Option<String>,
}

fn classify_error(status: u16, body: &[u8]) -> ResourceError {
	if let Ok(err) = serde_json::from_slice::<ResourceErrorBody>(body) {
		return ResourceError {
			http_status: status,
			error_code: Some(err.error_code),
			message: err.message,
			fields: err.fields,
			raw_body: None,
		};
	}
	if let Ok(err) = serde_json::from_slice::<OAuthErrorBody>(body) {
		let message = err.error_description.unwrap_or_else(|| err.error.clone());

		return ResourceError {
			http_status: status,
			error_code: Some(err.error),
			message,
			fields: None,
			raw_body: None,
		};
	}

	ResourceError {
		http_status: status,
		error_code: None,
		message: "Salesforce resource error.".into(),
		fields: None,
		raw_body: Some(String::from_utf8_lossy(body).into_owned()),
	}
}
