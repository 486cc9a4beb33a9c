// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential source backed by caller-supplied runtime properties.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use crate::credentials::AwsCredentials;
use crate::error::Result;
use crate::lazy::{FetchCredentials, Fetched};
use crate::sources::require;

/// Property key for the access key id.
pub const ACCESS_KEY_ID_PROPERTY: &str = "aws.accessKeyId";

/// Property key for the secret access key.
pub const SECRET_KEY_PROPERTY: &str = "aws.secretKey";

/// Property key for the session token.
pub const SESSION_TOKEN_PROPERTY: &str = "aws.sessionToken";

/// Credential source over an explicit property map, typically parsed out
/// of an application configuration layer by the caller.
///
/// Looks for [`ACCESS_KEY_ID_PROPERTY`], [`SECRET_KEY_PROPERTY`] and
/// [`SESSION_TOKEN_PROPERTY`]. None present resolves to absent; some but
/// not all fails naming the missing key.
pub struct PropertiesSource {
	properties: HashMap<String, String>,
}

impl PropertiesSource {
	/// Create the source over the given property map.
	pub fn new(properties: HashMap<String, String>) -> Self {
		Self { properties }
	}

	fn get(&self, key: &str) -> Option<String> {
		self.properties.get(key).cloned()
	}
}

#[async_trait]
impl FetchCredentials for PropertiesSource {
	async fn fetch(&self) -> Result<Fetched> {
		let access_key_id = self.get(ACCESS_KEY_ID_PROPERTY);
		let secret_key = self.get(SECRET_KEY_PROPERTY);
		let session_token = self.get(SESSION_TOKEN_PROPERTY);

		if let Some(session_token) = session_token {
			return Ok(Fetched::permanent(AwsCredentials::with_session_token(
				require(ACCESS_KEY_ID_PROPERTY, access_key_id)?,
				require(SECRET_KEY_PROPERTY, secret_key)?,
				session_token,
			)));
		}

		if access_key_id.is_some() || secret_key.is_some() {
			return Ok(Fetched::permanent(AwsCredentials::new(
				require(ACCESS_KEY_ID_PROPERTY, access_key_id)?,
				require(SECRET_KEY_PROPERTY, secret_key)?,
			)));
		}

		debug!("no credential properties supplied, skipping");
		Ok(Fetched::absent())
	}
}
