// std
use std::time::Duration;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use cinode_client::{
	_preludet::*,
	error::{Error, HttpError},
	pipeline::{RequestSpec, RetryPolicy},
};

#[tokio::test]
async fn get_is_retried_until_the_transient_failure_clears() {
	let server = MockServer::start_async().await;
	let retry = RetryPolicy::default().with_limit(3).with_base_delay(Duration::from_millis(300));
	let api = api_with(&server.base_url(), retry);
	let path = company_path("users/7");
	let unavailable = server
		.mock_async(|when, then| {
			when.method(GET).path(path.clone());
			then.status(503);
		})
		.await;
	let request = tokio::spawn(async move { api.get_user(7).await });

	while unavailable.calls_async().await == 0 {
		tokio::time::sleep(Duration::from_millis(5)).await;
	}

	unavailable.delete_async().await;

	let recovered = server
		.mock_async(|when, then| {
			when.method(GET).path(path.clone());
			then.status(200).json_body(json!({ "companyUserId": 7, "firstName": "Jane" }));
		})
		.await;
	let user = request
		.await
		.expect("Request task should not panic.")
		.expect("Request should succeed after a retry.");

	assert_eq!(user.company_user_id, Some(7));
	assert_eq!(user.first_name.as_deref(), Some("Jane"));

	recovered.assert_calls_async(1).await;
}

#[tokio::test]
async fn get_surfaces_the_enriched_error_once_retries_are_exhausted() {
	let server = MockServer::start_async().await;
	let api = api_with(&server.base_url(), fast_retry().with_limit(2));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(company_path("users/7"));
			then.status(503);
		})
		.await;
	let err = api.get_user(7).await.expect_err("Persistent 503 should fail.");

	mock.assert_calls_async(3).await;

	let Error::Http(HttpError { status, attempts, ref url, .. }) = err else {
		panic!("Expected an HTTP error, got {err:?}.");
	};

	assert_eq!(status, 503);
	assert_eq!(attempts, 3);
	assert!(url.ends_with("/v0.1/companies/1234/users/7"));

	let message = err.to_string();

	assert!(message.starts_with(&format!("503 GET {}", server.url(company_path("users/7")))));
	assert!(message.contains("---Source---"));
	assert!(message.contains("users.rs"));
}

#[tokio::test]
async fn plain_post_is_attempted_exactly_once() {
	let server = MockServer::start_async().await;
	let api = api(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(company_path("roles"));
			then.status(503);
		})
		.await;
	let err = api
		.list_assignments(&Default::default())
		.await
		.expect_err("Unretried POST should surface the failure.");

	mock.assert_calls_async(1).await;

	assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn retry_safe_post_is_retried_like_a_get() {
	let server = MockServer::start_async().await;
	let api = api(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(company_path("users/search")).json_body(json!({ "term": "jane" }));
			then.status(502);
		})
		.await;
	let err = api.search_users("jane").await.expect_err("Persistent 502 should fail.");

	mock.assert_calls_async(4).await;

	assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn non_transient_status_is_not_retried() {
	let server = MockServer::start_async().await;
	let api = api(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(company_path("projects/5"));
			then.status(404);
		})
		.await;
	let err = api.get_project(5).await.expect_err("404 should fail.");

	mock.assert_calls_async(1).await;

	assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn expired_static_token_is_never_sent() {
	let server = MockServer::start_async().await;
	let pipeline = pipeline_with(&server.base_url(), expired_token(), fast_retry());
	let mock = server
		.mock_async(|when, then| {
			when.any_request();
			then.status(200).json_body(json!([]));
		})
		.await;
	let err = pipeline
		.execute(RequestSpec::get(company_path("users")))
		.await
		.expect_err("Expired token should fail fast.");

	assert!(matches!(err, Error::CredentialExpired));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn bearer_token_is_injected_into_every_request() {
	let server = MockServer::start_async().await;
	let token = valid_token();
	let pipeline = pipeline_with(&server.base_url(), token.clone(), fast_retry());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(company_path("teams/3"))
				.header("authorization", format!("Bearer {}", token.expose()));
			then.status(200).json_body(json!({ "id": 3, "name": "Backoffice" }));
		})
		.await;
	let response = pipeline
		.execute(RequestSpec::get(company_path("teams/3")))
		.await
		.expect("Authorized request should succeed.");

	mock.assert_async().await;

	assert_eq!(response.status, 200);
	assert_eq!(response.attempts, 1);
	assert_eq!(pipeline.limiter().admitted(), 1);
}
