//! Graph API client and error types.
use crate::{
	GraphVersion,
	config::Config,
	request::{Executable, Request},
	response::Response,
	transport::Transport,
};

mod error;

pub use error::*;

/// Executes Graph API requests over a [`Transport`].
///
/// Every call is one blocking transport round trip. Transport errors are
/// returned as they are, and error-shaped responses become
/// [`GraphError::Remote`]: an `Ok` response is never an error response.
pub struct GraphClient<T> {
	transport: T,
	config: Config,
}

impl<T> GraphClient<T> {
	pub fn new(transport: T, config: Config) -> Self {
		Self { transport, config }
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Changes the targeted graph version, rejecting unsupported versions.
	pub fn set_graph_version(&mut self, version: &str) -> Result<(), ConfigurationError> {
		self.config.graph_version = version.parse::<GraphVersion>()?;
		Ok(())
	}

	pub fn set_use_beta(&mut self, use_beta: bool) {
		self.config.use_beta = use_beta;
	}

	pub fn set_app_secret_proof(&mut self, enable: bool) {
		self.config.enable_app_secret_proof = enable;
	}
}

impl<T: Transport> GraphClient<T> {
	/// Sends a [`Request`] or a [`BatchRequest`](crate::request::BatchRequest).
	pub fn execute<R: Executable>(&self, request: &R) -> Result<R::Response, GraphError> {
		let graph_request = request.graph_request(&self.config)?;
		let response = self.send(&graph_request)?;
		request.process_response(response)
	}

	fn send(&self, request: &Request) -> Result<Response, GraphError> {
		let http_request = request.to_http(&self.config)?;
		log::debug!(
			"{} {}{}",
			request.method(),
			self.config.graph_version,
			request.endpoint()
		);

		let http_response = self.transport.send(http_request)?;
		let response = Response::from_http(request.clone(), http_response);
		log::trace!("graph API response status: {}", response.status());

		if response.is_error() {
			return Err(RemoteApiError::from_response(&response).into());
		}

		Ok(response)
	}
}
