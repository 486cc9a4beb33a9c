// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client for the EC2 instance metadata service.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONNECTION};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{AuthError, Result};

/// Default, link-local instance metadata endpoint.
pub const DEFAULT_METADATA_ENDPOINT: &str = "http://169.254.169.254";

/// Environment variable overriding the metadata endpoint.
pub const METADATA_ENDPOINT_VAR: &str = "AWS_EC2_METADATA_SERVICE_ENDPOINT";

/// Environment variable overriding the connect/read timeout, in
/// milliseconds.
pub const METADATA_TIMEOUT_VAR: &str = "AWS_METADATA_SERVICE_TIMEOUT";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const SECURITY_CREDENTIALS_PATH: &str = "/latest/meta-data/iam/security-credentials/";

/// JSON record issued by the metadata service for one credential profile.
///
/// Constructed per fetch and immediately converted into a credential set
/// plus validity deadline; never cached directly.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityCredential {
	/// The access key id.
	#[serde(rename = "AccessKeyId")]
	pub access_key_id: String,

	/// The secret access key.
	#[serde(rename = "SecretAccessKey")]
	pub secret_access_key: String,

	/// The session token, when one is issued.
	#[serde(rename = "Token")]
	pub token: Option<String>,

	/// When the issued credentials stop being valid.
	#[serde(rename = "Expiration")]
	pub expiration: DateTime<Utc>,
}

/// Builder for [`MetadataClient`].
///
/// The endpoint resolves from the explicit override, then
/// [`METADATA_ENDPOINT_VAR`], then the link-local default. The timeout
/// resolves from the explicit override, then [`METADATA_TIMEOUT_VAR`]
/// (milliseconds), then five seconds.
#[derive(Debug, Default)]
pub struct MetadataClientBuilder {
	endpoint: Option<String>,
	timeout: Option<Duration>,
}

impl MetadataClientBuilder {
	/// Override the metadata service endpoint.
	pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = Some(endpoint.into());
		self
	}

	/// Override the connect/read timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}

	/// Build the client.
	pub fn build(self) -> Result<MetadataClient> {
		let endpoint = self
			.endpoint
			.or_else(|| std::env::var(METADATA_ENDPOINT_VAR).ok())
			.unwrap_or_else(|| DEFAULT_METADATA_ENDPOINT.to_string());
		let base = Url::parse(&endpoint).map_err(|e| {
			AuthError::Configuration(format!("invalid metadata endpoint '{endpoint}': {e}"))
		})?;

		let timeout = match self.timeout {
			Some(timeout) => timeout,
			None => timeout_from_env()?,
		};

		let mut headers = HeaderMap::new();
		headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
		headers.insert(CONNECTION, HeaderValue::from_static("close"));

		let http = skysink_common_http::builder()
			.default_headers(headers)
			.connect_timeout(timeout)
			.timeout(timeout)
			.build()
			.map_err(|e| AuthError::io("building the metadata service HTTP client", e))?;

		Ok(MetadataClient { base, http })
	}
}

fn timeout_from_env() -> Result<Duration> {
	match std::env::var(METADATA_TIMEOUT_VAR) {
		Ok(value) => {
			let millis: u64 = value.parse().map_err(|_| {
				AuthError::Configuration(format!(
					"{METADATA_TIMEOUT_VAR} must be an integer number of milliseconds, got '{value}'"
				))
			})?;
			Ok(Duration::from_millis(millis))
		}
		Err(_) => Ok(DEFAULT_TIMEOUT),
	}
}

/// Client for the two-step credential exchange against the EC2 instance
/// metadata service.
///
/// Both round trips run under the configured connect/read timeout. A
/// timeout resolves to `Ok(None)`: hosts without a metadata service are
/// an expected deployment, and resolution must not hang startup over
/// them. Error responses, by contrast, mean a service is present and
/// misconfigured, and fail hard.
#[derive(Debug, Clone)]
pub struct MetadataClient {
	base: Url,
	http: reqwest::Client,
}

impl MetadataClient {
	/// Builder with endpoint and timeout overrides.
	pub fn builder() -> MetadataClientBuilder {
		MetadataClientBuilder::default()
	}

	/// Client resolved purely from the environment.
	pub fn new() -> Result<Self> {
		Self::builder().build()
	}

	/// The resolved base endpoint.
	pub fn endpoint(&self) -> &str {
		self.base.as_str()
	}

	/// List the credential profile names issued to this instance.
	///
	/// Returns the raw newline-separated body, or `None` when the service
	/// did not answer in time.
	pub async fn security_credentials_list(&self) -> Result<Option<String>> {
		self.get(SECURITY_CREDENTIALS_PATH).await
	}

	/// Fetch the credential record for one profile name.
	pub async fn security_credential(&self, name: &str) -> Result<Option<SecurityCredential>> {
		let path = format!("{SECURITY_CREDENTIALS_PATH}{name}");
		let Some(body) = self.get(&path).await? else {
			return Ok(None);
		};

		let credential = serde_json::from_str(&body).map_err(|e| {
			AuthError::io(format!("decoding the security credential for '{name}'"), e)
		})?;
		Ok(Some(credential))
	}

	async fn get(&self, path: &str) -> Result<Option<String>> {
		let url = self.base.join(path).map_err(|e| {
			AuthError::Configuration(format!("invalid metadata path '{path}': {e}"))
		})?;

		debug!(%url, "querying the instance metadata service");
		let response = match self.http.get(url.clone()).send().await {
			Ok(response) => response,
			Err(e) if e.is_timeout() => {
				debug!(%url, "instance metadata service did not answer in time, skipping");
				return Ok(None);
			}
			Err(e) => {
				return Err(AuthError::io(
					format!("calling the instance metadata service at {url}"),
					e,
				));
			}
		};

		let status = response.status();
		let body = match response.text().await {
			Ok(body) => body,
			Err(e) if e.is_timeout() => {
				debug!(%url, "instance metadata response timed out, skipping");
				return Ok(None);
			}
			Err(e) => {
				return Err(AuthError::io(
					format!("reading the instance metadata response from {url}"),
					e,
				));
			}
		};

		if !status.is_success() {
			return Err(AuthError::HttpResponse {
				method: "GET".to_string(),
				uri: url.to_string(),
				status: status.as_u16(),
				body,
			});
		}

		Ok(Some(body))
	}
}
