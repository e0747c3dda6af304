//! Generic REST resource descriptors consumed by the request pipeline.
//!
//! A [`Resource`] names an endpoint relative to the authorized instance (or an absolute URL for
//! endpoints outside it, such as the identity service) together with the method, query, and
//! optional JSON body. Catalog helpers for specific platform objects belong to callers; the
//! pipeline only needs this shape.

// crates.io
use reqwest::Method;
// self
use crate::{_prelude::*, error::ConfigError};

/// Descriptor for one REST endpoint invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
	method: Method,
	target: Target,
	query: Vec<(String, String)>,
	body: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Target {
	Path(String),
	Absolute(Url),
}

impl Resource {
	/// Describes a `GET` of an instance-relative path.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, Target::Path(path.into()))
	}

	/// Describes a `POST` to an instance-relative path.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, Target::Path(path.into()))
	}

	/// Describes a `PATCH` of an instance-relative path.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::PATCH, Target::Path(path.into()))
	}

	/// Describes a `DELETE` of an instance-relative path.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, Target::Path(path.into()))
	}

	/// Describes a request against an absolute URL (e.g. the identity endpoint).
	pub fn absolute(method: Method, url: Url) -> Self {
		Self::new(method, Target::Absolute(url))
	}

	fn new(method: Method, target: Target) -> Self {
		Self { method, target, query: Vec::new(), body: None }
	}

	/// Appends one query parameter.
	pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((name.into(), value.into()));

		self
	}

	/// Attaches a JSON body serialized from `value`.
	pub fn with_json_body(mut self, value: &impl Serialize) -> Result<Self, serde_json::Error> {
		self.body = Some(serde_json::to_vec(value)?);

		Ok(self)
	}

	/// HTTP method of the described invocation.
	pub fn method(&self) -> &Method {
		&self.method
	}

	pub(crate) fn body(&self) -> Option<&[u8]> {
		self.body.as_deref()
	}

	/// Resolves the full request URL against the authorized instance endpoint.
	pub(crate) fn url(&self, instance_url: &Url) -> Result<Url, ConfigError> {
		let mut url = match &self.target {
			Target::Path(path) => instance_url
				.join(path)
				.map_err(|source| ConfigError::InvalidResourceUrl { source })?,
			Target::Absolute(absolute) => absolute.clone(),
		};

		if !self.query.is_empty() {
			url.query_pairs_mut()
				.extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
		}

		Ok(url)
	}
}
