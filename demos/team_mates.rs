//! Logs in with app credentials against a local mock of the Cinode API and lists the staffing
//! of one project, including profile image URLs.

// std
use std::collections::HashMap;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use cinode_client::{api::Api, config::CinodeConfig, service::Service};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let env = HashMap::from([
		("CINODE_COMPANY_ID", "1234".to_owned()),
		("CINODE_COMPANY_NAME", "acme".to_owned()),
		("CINODE_APP_ID", "demo-app".to_owned()),
		("CINODE_APP_SECRET", "demo-secret".to_owned()),
		("CINODE_API_URL", server.base_url()),
	]);
	let config = CinodeConfig::from_lookup(|key| env.get(key).cloned())?;
	// Unsigned token whose payload is `{"exp":4102444800}` (2100-01-01).
	let access = "eyJhbGciOiJub25lIn0.eyJleHAiOjQxMDI0NDQ4MDB9.demo";
	let login = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(200).json_body(json!({ "access_token": access, "refresh_token": "demo" }));
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v0.1/companies/1234/projects/5");
			then.status(200).json_body(json!({ "id": 5, "assignments": [{ "id": 10 }, { "id": 11 }] }));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v0.1/companies/1234/projects/5/roles/10");
			then.status(200)
				.json_body(json!({ "id": 10, "assigned": { "companyUserId": 7, "firstName": "Jane" } }));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v0.1/companies/1234/projects/5/roles/11");
			then.status(200).json_body(json!({ "id": 11 }));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v0.1/companies/1234/users/7/images");
			then.status(200).json_body(json!([{ "imageFileName": "9c73fe2f", "extension": "jpeg" }]));
		})
		.await;

	let service = Service::new(Api::from_config(&config)?);
	let team = service.get_project_team_mates(5).await?;

	println!("{}", serde_json::to_string_pretty(&team)?);

	login.assert_async().await;

	Ok(())
}
