//! Client for the Facebook [Graph API][graph].
//!
//! This crate provides:
//!
//! - [`GraphClient`](client::GraphClient), executing single and batch
//!   requests over a pluggable blocking [`Transport`](transport::Transport),
//!   signing them with `appsecret_proof` and classifying error responses.
//! - [`RedirectLoginHelper`](login::RedirectLoginHelper), driving the
//!   server-side OAuth login: login and logout URLs, CSRF state, redirect
//!   validation and code exchange.
//! - [`SignedRequest`](signed_request::SignedRequest) verification.
//!
//! # Modules
//!
//! - [`client`]: Graph API client and error types.
//! - [`config`]: application credentials and client configuration.
//! - [`login`]: redirect login flow and CSRF state storage.
//! - [`request`]: single and batch requests.
//! - [`response`]: responses and body decoding.
//! - [`signed_request`]: signed request verification.
//! - [`transport`]: HTTP transport layer and form encoding.
//! - [`util`]: URI query string utilities.
//!
//! Core types ([`AccessToken`], [`AppSecret`], [`Scope`], [`CsrfState`],
//! [`GraphVersion`], etc.) are re-exported at the crate root.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "reqwest")]
//! # fn main() -> Result<(), graph_sdk::client::GraphError> {
//! use graph_sdk::{
//! 	AccessTokenBuf, AppSecretBuf,
//! 	client::GraphClient,
//! 	config::{App, Config},
//! 	request::Request,
//! };
//!
//! let secret = AppSecretBuf::new("app_secret".to_owned()).unwrap();
//! let config = Config::new(App::new("123", Some(secret)));
//! let client = GraphClient::new(graph_sdk::reqwest::blocking::Client::new(), config);
//!
//! let token = AccessTokenBuf::new("user_token".to_owned()).unwrap();
//! let me = client.execute(&Request::get("/me").with_access_token(token))?;
//! println!("{}", me.decoded()["name"]);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "reqwest"))]
//! # fn main() {}
//! ```
//!
//! [graph]: https://developers.facebook.com/docs/graph-api
#[cfg(feature = "reqwest")]
pub use reqwest;

pub use http;

pub mod client;
pub mod config;
pub mod login;
pub mod request;
pub mod response;
pub mod signed_request;
pub mod transport;
mod types;
pub mod util;

pub use config::{App, Config};
pub use types::*;
