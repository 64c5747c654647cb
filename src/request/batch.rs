//! Batch requests: many Graph API calls in one HTTP round trip.
use std::borrow::Cow;

use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::{
	AccessToken, AccessTokenBuf,
	client::GraphError,
	config::Config,
	request::{Executable, Method, Request},
	response::{BatchResponse, Response},
	transport::encode_form_body,
};

/// Ordered list of requests sent as a single `POST` with a `batch`
/// parameter.
///
/// The optional access token is the fallback for sub-requests that carry no
/// token of their own. The remote batch size limit is not checked locally;
/// exceeding it surfaces as a remote error.
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
	access_token: Option<AccessTokenBuf>,
	requests: Vec<BatchEntry>,
}

#[derive(Debug, Clone)]
struct BatchEntry {
	name: Option<String>,
	request: Request,
}

/// One element of the `batch` parameter.
#[skip_serializing_none]
#[derive(Serialize)]
struct BatchOperation<'a> {
	method: Method,
	relative_url: String,
	name: Option<&'a str>,
	body: Option<String>,
	headers: Option<Vec<String>>,
}

impl BatchRequest {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_access_token(self, access_token: AccessTokenBuf) -> Self {
		Self {
			access_token: Some(access_token),
			..self
		}
	}

	pub fn add(mut self, request: Request) -> Self {
		self.push(None, request);
		self
	}

	/// Adds a request that later operations can reference by `name`.
	pub fn add_named(mut self, name: impl Into<String>, request: Request) -> Self {
		self.push(Some(name.into()), request);
		self
	}

	pub fn push(&mut self, name: Option<String>, request: Request) {
		self.requests.push(BatchEntry { name, request });
	}

	pub fn access_token(&self) -> Option<&AccessToken> {
		self.access_token.as_deref()
	}

	pub fn len(&self) -> usize {
		self.requests.len()
	}

	pub fn is_empty(&self) -> bool {
		self.requests.is_empty()
	}

	/// Sub-requests, in order.
	pub fn requests(&self) -> impl Iterator<Item = &Request> {
		self.requests.iter().map(|entry| &entry.request)
	}

	/// Position of the sub-request registered under `name`.
	pub fn position(&self, name: &str) -> Option<usize> {
		self.requests
			.iter()
			.position(|entry| entry.name.as_deref() == Some(name))
	}

	fn operation<'a>(
		&self,
		config: &Config,
		entry: &'a BatchEntry,
	) -> Result<BatchOperation<'a>, GraphError> {
		let request = &entry.request;
		let params = request.dispatch_params(config, self.access_token());

		let body = match request.method() {
			Method::Get => None,
			Method::Post | Method::Delete => {
				// UNWRAP SAFETY: form encoding only produces ASCII.
				Some(String::from_utf8(encode_form_body(&params)).unwrap())
			}
		};

		let headers = request
			.dispatch_headers()?
			.iter()
			.filter_map(|(name, value)| {
				value
					.to_str()
					.ok()
					.map(|value| format!("{name}: {value}"))
			})
			.collect::<Vec<_>>();

		Ok(BatchOperation {
			method: request.method(),
			relative_url: request.relative_url(config, &params),
			name: entry.name.as_deref(),
			body,
			headers: (!headers.is_empty()).then_some(headers),
		})
	}

	/// The aggregate `POST /` request carrying every sub-request.
	pub(crate) fn to_request(&self, config: &Config) -> Result<Request, GraphError> {
		let operations = self
			.requests
			.iter()
			.map(|entry| self.operation(config, entry))
			.collect::<Result<Vec<_>, _>>()?;

		log::debug!("batching {} requests", operations.len());

		let mut request = Request::post("/")
			// UNWRAP SAFETY: operations only contain strings.
			.with_param("batch", serde_json::to_string(&operations).unwrap())
			.with_param("include_headers", "true");

		if let Some(token) = &self.access_token {
			request = request.with_access_token(token.clone());
		}

		Ok(request)
	}
}

impl Executable for BatchRequest {
	type Response = BatchResponse;

	fn graph_request(&self, config: &Config) -> Result<Cow<'_, Request>, GraphError> {
		self.to_request(config).map(Cow::Owned)
	}

	fn process_response(&self, response: Response) -> Result<Self::Response, GraphError> {
		BatchResponse::new(self, response)
	}
}
