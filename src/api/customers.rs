// self
use crate::{_prelude::*, api::Api, model::Customer, pipeline::RequestSpec};

impl Api {
	/// Lists every customer (base fields only).
	pub async fn list_all_customers(&self) -> Result<Vec<Customer>> {
		self.pipeline.execute_json(RequestSpec::get(self.path("customers"))).await
	}

	/// Fetches the full customer record.
	pub async fn get_customer(&self, customer_id: u64) -> Result<Customer> {
		self.pipeline
			.execute_json(RequestSpec::get(self.path(format!("customers/{customer_id}"))))
			.await
	}
}
