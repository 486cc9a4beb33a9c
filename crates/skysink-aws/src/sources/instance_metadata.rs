// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential source backed by the EC2 instance metadata service.

use async_trait::async_trait;
use chrono::Duration;
use tracing::debug;

use crate::credentials::AwsCredentials;
use crate::error::Result;
use crate::imds::MetadataClient;
use crate::lazy::{FetchCredentials, Fetched};

/// How long before the provider-stated expiry the cached credentials are
/// abandoned, so the refresh lands while the old token is still usable.
const RESET_OFFSET_MINUTES: i64 = 15;

/// Fetches the transient credentials issued to this instance's IAM
/// profile through the metadata service.
///
/// A successful fetch carries a validity deadline of the issued expiry
/// minus a fifteen-minute margin; the owning cache re-fetches once that
/// deadline passes. An unreachable metadata service resolves to absent.
#[derive(Debug, Clone)]
pub struct InstanceMetadataSource {
	client: MetadataClient,
}

impl InstanceMetadataSource {
	/// Source with endpoint and timeout resolved from the environment.
	pub fn new() -> Result<Self> {
		Ok(Self {
			client: MetadataClient::new()?,
		})
	}

	/// Source over a pre-configured metadata client.
	pub fn with_client(client: MetadataClient) -> Self {
		Self { client }
	}
}

#[async_trait]
impl FetchCredentials for InstanceMetadataSource {
	async fn fetch(&self) -> Result<Fetched> {
		let Some(listing) = self.client.security_credentials_list().await? else {
			return Ok(Fetched::absent());
		};

		let Some(profile) = listing.lines().map(str::trim).find(|line| !line.is_empty()) else {
			debug!("no credential profiles issued to this instance, skipping");
			return Ok(Fetched::absent());
		};

		let Some(credential) = self.client.security_credential(profile).await? else {
			return Ok(Fetched::absent());
		};

		let valid_until = credential.expiration - Duration::minutes(RESET_OFFSET_MINUTES);
		let credentials = match credential.token {
			Some(token) => AwsCredentials::with_session_token(
				credential.access_key_id,
				credential.secret_access_key,
				token,
			),
			None => AwsCredentials::new(credential.access_key_id, credential.secret_access_key),
		};

		debug!(profile = %profile, valid_until = %valid_until, "fetched instance profile credentials");
		Ok(Fetched::expiring(credentials, valid_until))
	}
}
