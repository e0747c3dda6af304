//! Authenticated request execution with automatic re-authorization on expiry.
//!
//! [`Salesforce::execute`] looks up the stored authorization, issues the HTTP call, and runs
//! the response validator. An unauthorized outcome (missing record or HTTP 401) triggers one
//! interactive re-authorization—unless the caller suppressed it—followed by exactly one retry;
//! a second unauthorized outcome reaches the caller unmodified. [`Salesforce::fetch`] adds the
//! typed decode step on top.

// crates.io
use reqwest::header::{ACCEPT, CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	auth::Authorization,
	client::{RequestOptions, Salesforce},
	error::TransportError,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	resource::Resource,
	response::DataResponse,
};

impl Salesforce {
	/// Executes `resource` with the stored authorization and returns the validated response.
	pub async fn execute(
		&self,
		resource: &Resource,
		options: RequestOptions,
	) -> Result<DataResponse> {
		const KIND: FlowKind = FlowKind::Request;

		let span = FlowSpan::new(KIND, "execute");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.request_metrics.record_attempt();

		let result = span.instrument(self.execute_inner(resource, options)).await;

		match &result {
			Ok(_) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
				self.request_metrics.record_success();
			},
			Err(_) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				self.request_metrics.record_failure();
			},
		}

		result
	}

	/// Executes `resource` and decodes the validated response body into `T`.
	pub async fn fetch<T>(&self, resource: &Resource, options: RequestOptions) -> Result<T>
	where
		T: serde::de::DeserializeOwned,
	{
		self.execute(resource, options).await?.json()
	}

	async fn execute_inner(
		&self,
		resource: &Resource,
		options: RequestOptions,
	) -> Result<DataResponse> {
		let attempt = match self.authorization().await? {
			Some(authorization) => self.attempt(resource, &authorization).await,
			None => Err(Error::Unauthorized),
		};

		match attempt {
			Err(Error::Unauthorized) if !options.suppress_authentication => {
				self.request_metrics.record_reauthorization();

				let authorization = self.authorize().await?;

				self.attempt(resource, &authorization).await
			},
			other => other,
		}
	}

	async fn attempt(
		&self,
		resource: &Resource,
		authorization: &Authorization,
	) -> Result<DataResponse> {
		let url = resource.url(authorization.instance_url())?;
		let mut request = self
			.http_client
			.request(resource.method().clone(), url)
			.bearer_auth(authorization.access_token().expose())
			.header(ACCEPT, "application/json");

		if let Some(body) = resource.body() {
			request = request.header(CONTENT_TYPE, "application/json").body(body.to_vec());
		}

		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status().as_u16();
		let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

		DataResponse::new(status, body).validated()
	}
}
