use crate::{client::TransportError, transport::Transport};

impl Transport for reqwest::blocking::Client {
	fn send(
		&self,
		request: http::Request<Vec<u8>>,
	) -> Result<http::Response<Vec<u8>>, TransportError> {
		log::debug!("HTTP {} {}", request.method(), request.uri().path());

		let response = self
			.execute(request.try_into().map_err(TransportError::request)?)
			.map_err(TransportError::request)?;

		let mut builder = http::Response::builder()
			.status(response.status())
			.version(response.version());

		for (name, value) in response.headers().iter() {
			builder = builder.header(name, value);
		}

		let body = response.bytes().map_err(TransportError::response)?.to_vec();
		let response = builder.body(body).map_err(TransportError::response)?;

		log::trace!("HTTP response status: {}", response.status());

		Ok(response)
	}
}
