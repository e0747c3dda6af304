mod common;

// std
use std::time::Duration;
// crates.io
use httpmock::prelude::*;
// self
use common::{ScriptedSession, build_client, redirect_url};
use salesforce_connect::{
	auth::{Authorization, ConsumerKey, StoreKey},
	client::RequestOptions,
	error::Error,
	resource::Resource,
	store::CredentialStore,
	url::Url,
};

const LIMITS_PATH: &str = "/services/data/v45.0/limits";

fn stored_authorization(access_token: &str, instance_url: &str) -> (StoreKey, Authorization) {
	let authorization = Authorization::from_redirect_url(&redirect_url(access_token, instance_url))
		.expect("Stored authorization fixture should parse.");
	let key = StoreKey::for_authorization(
		&authorization,
		ConsumerKey::new(common::CONSUMER_KEY).expect("Consumer key fixture should be valid."),
	)
	.expect("Store key derivation should succeed.");

	(key, authorization)
}

#[tokio::test]
async fn execute_uses_the_stored_credential() {
	let server = MockServer::start_async().await;
	let session = ScriptedSession::cancelling();
	let (client, store) = build_client(session.clone());
	let (key, authorization) = stored_authorization("stored-token", &server.base_url());

	store.save(key, authorization).await.expect("Seeding the store should succeed.");

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(LIMITS_PATH).header("authorization", "Bearer stored-token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"DailyApiRequests\":{\"Max\":15000}}");
		})
		.await;
	let response = client
		.execute(&Resource::get(LIMITS_PATH), RequestOptions::new())
		.await
		.expect("Request with a stored credential should succeed.");

	assert_eq!(response.status, 200);
	assert_eq!(session.launches(), 0, "a valid credential must not trigger interactive login");

	mock.assert_async().await;

	assert_eq!(client.request_metrics.attempts(), 1);
	assert_eq!(client.request_metrics.successes(), 1);
}

#[tokio::test]
async fn unauthorized_triggers_one_reauthorization_and_retry() {
	let server = MockServer::start_async().await;
	let session = ScriptedSession::redirecting(redirect_url("fresh-token", &server.base_url()));
	let (client, store) = build_client(session.clone());
	let (key, stale) = stored_authorization("stale-token", &server.base_url());

	store.save(key, stale).await.expect("Seeding the stale credential should succeed.");

	let stale_mock = server
		.mock_async(|when, then| {
			when.method(GET).path(LIMITS_PATH).header("authorization", "Bearer stale-token");
			then.status(401).body(
				"{\"message\":\"Session expired or invalid\",\
				\"errorCode\":\"INVALID_SESSION_ID\"}",
			);
		})
		.await;
	let fresh_mock = server
		.mock_async(|when, then| {
			when.method(GET).path(LIMITS_PATH).header("authorization", "Bearer fresh-token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"DailyApiRequests\":{\"Max\":15000}}");
		})
		.await;
	let response = client
		.execute(&Resource::get(LIMITS_PATH), RequestOptions::new())
		.await
		.expect("Request should succeed after transparent re-authorization.");

	assert_eq!(response.status, 200);
	assert_eq!(session.launches(), 1);

	stale_mock.assert_async().await;
	fresh_mock.assert_async().await;

	let refreshed = client
		.authorization()
		.await
		.expect("Authorization lookup should succeed.")
		.expect("A refreshed record should be stored.");

	assert_eq!(refreshed.access_token().expose(), "fresh-token");
	assert_eq!(client.request_metrics.reauthorizations(), 1);
}

#[tokio::test]
async fn second_unauthorized_surfaces_without_another_session() {
	let server = MockServer::start_async().await;
	let session = ScriptedSession::redirecting(redirect_url("still-bad", &server.base_url()));
	let (client, store) = build_client(session.clone());
	let (key, stale) = stored_authorization("stale-token", &server.base_url());

	store.save(key, stale).await.expect("Seeding the stale credential should succeed.");

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(LIMITS_PATH);
			then.status(401).body("");
		})
		.await;
	let err = client
		.execute(&Resource::get(LIMITS_PATH), RequestOptions::new())
		.await
		.expect_err("A 401 on the retry should surface to the caller.");

	assert!(matches!(err, Error::Unauthorized));
	assert_eq!(session.launches(), 1, "the pipeline must not loop on re-authorization");

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn suppressed_authentication_fails_fast_without_a_session() {
	let session = ScriptedSession::redirecting(redirect_url("unused", "https://na85.salesforce.com"));
	let (client, _store) = build_client(session.clone());
	let err = client
		.execute(
			&Resource::get(LIMITS_PATH),
			RequestOptions::new().suppressing_authentication(),
		)
		.await
		.expect_err("A suppressed call without credentials should fail immediately.");

	assert!(matches!(err, Error::Unauthorized));
	assert_eq!(session.launches(), 0, "suppressed calls must never present UI");
}

#[tokio::test]
async fn concurrent_unauthorized_requests_share_one_session() {
	let server = MockServer::start_async().await;
	let session = ScriptedSession::redirecting_after(
		redirect_url("fresh-token", &server.base_url()),
		Duration::from_millis(50),
	);
	let (client, _store) = build_client(session.clone());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(LIMITS_PATH).header("authorization", "Bearer fresh-token");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let resource = Resource::get(LIMITS_PATH);
	let (first, second) = tokio::join!(
		client.execute(&resource, RequestOptions::new()),
		client.execute(&resource, RequestOptions::new()),
	);

	first.expect("First concurrent call should succeed.");
	second.expect("Second concurrent call should succeed.");

	assert_eq!(session.launches(), 1, "concurrent callers must share one interactive session");

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn cancellation_surfaces_unauthorized_and_resets_the_coordinator() {
	let session = ScriptedSession::cancelling();
	let (client, _store) = build_client(session.clone());
	let err = client
		.execute(&Resource::get(LIMITS_PATH), RequestOptions::new())
		.await
		.expect_err("A cancelled login should fail the request.");

	assert!(matches!(err, Error::Unauthorized));
	assert_eq!(session.launches(), 1);

	let err = client.authorize().await.expect_err("A cancelled authorize should fail.");

	assert!(matches!(err, Error::Unauthorized));
	assert_eq!(session.launches(), 2, "a later call should start a fresh session");
}

#[tokio::test]
async fn malformed_redirect_surfaces_without_retry() {
	let bad_redirect =
		Url::parse("sfdc1234://authorized#instance_url=https%3A%2F%2Fna85.salesforce.com")
			.expect("Malformed redirect fixture should parse as a URL.");
	let session = ScriptedSession::redirecting(bad_redirect);
	let (client, _store) = build_client(session.clone());
	let err = client
		.execute(&Resource::get(LIMITS_PATH), RequestOptions::new())
		.await
		.expect_err("A malformed redirect should fail the request.");

	assert!(matches!(err, Error::MalformedResponse(_)));
	assert_eq!(session.launches(), 1);
}

#[tokio::test]
async fn resource_error_envelopes_decode_over_the_wire() {
	let server = MockServer::start_async().await;
	let session = ScriptedSession::cancelling();
	let (client, store) = build_client(session);
	let (key, authorization) = stored_authorization("stored-token", &server.base_url());

	store.save(key, authorization).await.expect("Seeding the store should succeed.");
	server
		.mock_async(|when, then| {
			when.method(POST).path("/services/data/v45.0/sobjects/Account");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"message\":\"bad field\",\"errorCode\":\"INVALID_FIELD\",\"fields\":[\"Name\"]}");
		})
		.await;

	let resource = Resource::post("/services/data/v45.0/sobjects/Account")
		.with_json_body(&serde_json::json!({ "Name": "" }))
		.expect("Body serialization should succeed.");
	let err = client
		.execute(&resource, RequestOptions::new())
		.await
		.expect_err("A 400 response should surface as a resource error.");

	match err {
		Error::Resource(resource_error) => {
			assert_eq!(resource_error.http_status, 400);
			assert_eq!(resource_error.error_code.as_deref(), Some("INVALID_FIELD"));
			assert_eq!(resource_error.message, "bad field");
			assert_eq!(resource_error.fields, Some(vec!["Name".into()]));
		},
		other => panic!("Expected a resource error, got {other:?}."),
	}
}

#[tokio::test]
async fn fetch_decodes_both_server_timestamp_variants() {
	#[derive(Debug, serde::Deserialize)]
	struct IdentitySummary {
		username: String,
		#[serde(with = "salesforce_connect::datetime")]
		last_modified_date: time::OffsetDateTime,
	}

	let server = MockServer::start_async().await;
	let session = ScriptedSession::cancelling();
	let (client, store) = build_client(session);
	let (key, authorization) = stored_authorization("stored-token", &server.base_url());

	store.save(key, authorization).await.expect("Seeding the store should succeed.");
	server
		.mock_async(|when, then| {
			when.method(GET).path("/identity/legacy");
			then.status(200).header("content-type", "application/json").body(
				"{\"username\":\"martin@vandelayindustries.com\",\
				\"last_modified_date\":\"2017-03-13T16:11:13.000+0000\"}",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/identity/current");
			then.status(200).header("content-type", "application/json").body(
				"{\"username\":\"martin@vandelayindustries.com\",\
				\"last_modified_date\":\"2018-10-09T13:47:02.000+0000\"}",
			);
		})
		.await;

	let legacy: IdentitySummary = client
		.fetch(&Resource::get("/identity/legacy"), RequestOptions::new())
		.await
		.expect("Legacy timestamp payload should decode.");
	let current: IdentitySummary = client
		.fetch(&Resource::get("/identity/current"), RequestOptions::new())
		.await
		.expect("Current timestamp payload should decode.");

	assert_eq!(legacy.username, "martin@vandelayindustries.com");
	assert_eq!(legacy.last_modified_date, time::macros::datetime!(2017-03-13 16:11:13 UTC));
	assert_eq!(current.last_modified_date, time::macros::datetime!(2018-10-09 13:47:02 UTC));
}

#[tokio::test]
async fn fetch_surfaces_decoding_errors() {
	let server = MockServer::start_async().await;
	let session = ScriptedSession::cancelling();
	let (client, store) = build_client(session);
	let (key, authorization) = stored_authorization("stored-token", &server.base_url());

	store.save(key, authorization).await.expect("Seeding the store should succeed.");
	server
		.mock_async(|when, then| {
			when.method(GET).path(LIMITS_PATH);
			then.status(200).header("content-type", "application/json").body("{\"Max\":\"many\"}");
		})
		.await;

	#[derive(Debug, serde::Deserialize)]
	struct Limits {
		#[allow(dead_code)]
		#[serde(rename = "Max")]
		max: u64,
	}

	let err = client
		.fetch::<Limits>(&Resource::get(LIMITS_PATH), RequestOptions::new())
		.await
		.expect_err("A type mismatch should surface as a decoding error.");

	assert!(matches!(err, Error::Decoding { .. }));
}

#[tokio::test]
async fn authorize_persists_and_deauthorize_clears() {
	let session = ScriptedSession::redirecting(redirect_url("tok", "https://na85.salesforce.com"));
	let (client, store) = build_client(session);
	let record = client.authorize().await.expect("Interactive authorization should succeed.");

	assert_eq!(record.access_token().expose(), "tok");

	let stored_key = store
		.last_stored_key()
		.await
		.expect("Last-key lookup should succeed.")
		.expect("Authorization should store a key.");

	assert_eq!(stored_key.user_id.as_ref(), "005i00000016PdaBAE");
	assert_eq!(stored_key.org_id.as_ref(), "00Di0000000bcK3FAI");
	assert_eq!(stored_key.consumer_key.as_ref(), common::CONSUMER_KEY);

	client.deauthorize().await.expect("Deauthorization should succeed.");

	assert!(
		client
			.authorization()
			.await
			.expect("Authorization lookup should succeed.")
			.is_none(),
	);
	assert!(
		store.last_stored_key().await.expect("Last-key lookup should succeed.").is_none(),
	);
}
