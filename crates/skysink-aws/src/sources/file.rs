// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential source backed by a flat `key=value` properties file.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::credentials::AwsCredentials;
use crate::error::{AuthError, Result};
use crate::lazy::{FetchCredentials, Fetched};
use crate::sources::require;

const ACCESS_KEY_ID: &str = "accessKeyId";
const SECRET_ACCESS_KEY: &str = "secretAccessKey";

/// Reads credentials from a flat `key=value` file with the required keys
/// `accessKeyId` and `secretAccessKey`.
///
/// A missing file resolves to absent; any other read failure is a hard
/// I/O error. Blank lines and `#` comments are ignored. A file that
/// exists but lacks either key is a misconfiguration.
#[derive(Debug)]
pub struct PropertiesFileSource {
	path: PathBuf,
}

impl PropertiesFileSource {
	/// Create the source over the file at `path`.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

#[async_trait]
impl FetchCredentials for PropertiesFileSource {
	async fn fetch(&self) -> Result<Fetched> {
		let contents = match tokio::fs::read_to_string(&self.path).await {
			Ok(contents) => contents,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				debug!(path = %self.path.display(), "credentials file not found, skipping");
				return Ok(Fetched::absent());
			}
			Err(e) => {
				return Err(AuthError::io(
					format!("reading credentials file '{}'", self.path.display()),
					e,
				));
			}
		};

		let properties = parse_properties(&contents);
		Ok(Fetched::permanent(AwsCredentials::new(
			require(ACCESS_KEY_ID, properties.get(ACCESS_KEY_ID).cloned())?,
			require(SECRET_ACCESS_KEY, properties.get(SECRET_ACCESS_KEY).cloned())?,
		)))
	}
}

fn parse_properties(contents: &str) -> HashMap<String, String> {
	contents
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty() && !line.starts_with('#'))
		.filter_map(|line| line.split_once('='))
		.map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
		.collect()
}
