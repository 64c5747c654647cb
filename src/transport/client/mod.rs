use crate::client::TransportError;

#[cfg(test)]
pub(crate) mod mock;
#[cfg(feature = "reqwest")]
mod reqwest;

/// Blocking HTTP transport.
///
/// Timeouts, retries and connection reuse are the implementation's concern:
/// the client performs exactly one `send` per call and treats any error as
/// terminal.
pub trait Transport {
	fn send(
		&self,
		request: http::Request<Vec<u8>>,
	) -> Result<http::Response<Vec<u8>>, TransportError>;
}

impl<T> Transport for &T
where
	T: Transport + ?Sized,
{
	fn send(
		&self,
		request: http::Request<Vec<u8>>,
	) -> Result<http::Response<Vec<u8>>, TransportError> {
		T::send(*self, request)
	}
}
