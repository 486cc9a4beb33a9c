// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential source backed by the shared AWS credentials file.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::credentials::AwsCredentials;
use crate::error::{AuthError, Result};
use crate::lazy::{FetchCredentials, Fetched};
use crate::sources::require;

const AWS_PROFILE: &str = "AWS_PROFILE";
const AWS_SHARED_CREDENTIALS_FILE: &str = "AWS_SHARED_CREDENTIALS_FILE";
const DEFAULT_PROFILE: &str = "default";
const ACCESS_KEY_ID: &str = "aws_access_key_id";
const SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
const SESSION_TOKEN: &str = "aws_session_token";

/// Reads credentials for a named profile from the shared AWS credentials
/// file (`~/.aws/credentials`).
///
/// The profile name comes from the builder override, then `AWS_PROFILE`,
/// then `default`; the file location from the builder override, then
/// `AWS_SHARED_CREDENTIALS_FILE`, then `$HOME/.aws/credentials`. A
/// missing file, unresolvable home directory or absent profile section
/// resolves to absent; a section that names the profile but lacks a
/// required key is a misconfiguration.
#[derive(Debug, Default)]
pub struct ProfileSource {
	profile: Option<String>,
	path: Option<PathBuf>,
}

impl ProfileSource {
	/// Source resolved purely from the environment.
	pub fn new() -> Self {
		Self::default()
	}

	/// Use an explicit profile name instead of `AWS_PROFILE`.
	pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
		self.profile = Some(profile.into());
		self
	}

	/// Use an explicit file path instead of `AWS_SHARED_CREDENTIALS_FILE`.
	pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.path = Some(path.into());
		self
	}

	fn resolved_profile(&self) -> String {
		self.profile
			.clone()
			.or_else(|| std::env::var(AWS_PROFILE).ok())
			.unwrap_or_else(|| DEFAULT_PROFILE.to_string())
	}

	fn resolved_path(&self) -> Option<PathBuf> {
		if let Some(path) = &self.path {
			return Some(path.clone());
		}
		if let Ok(path) = std::env::var(AWS_SHARED_CREDENTIALS_FILE) {
			return Some(PathBuf::from(path));
		}
		std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".aws").join("credentials"))
	}
}

#[async_trait]
impl FetchCredentials for ProfileSource {
	async fn fetch(&self) -> Result<Fetched> {
		let Some(path) = self.resolved_path() else {
			debug!("no home directory available, skipping shared credentials file");
			return Ok(Fetched::absent());
		};

		let contents = match tokio::fs::read_to_string(&path).await {
			Ok(contents) => contents,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				debug!(path = %path.display(), "shared credentials file not found, skipping");
				return Ok(Fetched::absent());
			}
			Err(e) => {
				return Err(AuthError::io(
					format!("reading shared credentials file '{}'", path.display()),
					e,
				));
			}
		};

		let profile = self.resolved_profile();
		let Some(section) = parse_profile_section(&contents, &profile) else {
			debug!(profile = %profile, "profile not present in shared credentials file, skipping");
			return Ok(Fetched::absent());
		};

		let access_key_id = require(ACCESS_KEY_ID, section.get(ACCESS_KEY_ID).cloned())?;
		let secret_access_key =
			require(SECRET_ACCESS_KEY, section.get(SECRET_ACCESS_KEY).cloned())?;

		let credentials = match section.get(SESSION_TOKEN) {
			Some(token) => {
				AwsCredentials::with_session_token(access_key_id, secret_access_key, token.clone())
			}
			None => AwsCredentials::new(access_key_id, secret_access_key),
		};

		debug!(profile = %profile, "resolved credentials from the shared credentials file");
		Ok(Fetched::permanent(credentials))
	}
}

/// Extract the `[name]` section of an INI-style credentials file.
fn parse_profile_section(contents: &str, name: &str) -> Option<HashMap<String, String>> {
	let mut found: Option<HashMap<String, String>> = None;
	let mut in_section = false;

	for line in contents.lines() {
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
			continue;
		}

		if let Some(header) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
			if found.is_some() {
				break;
			}
			in_section = header.trim() == name;
			if in_section {
				found = Some(HashMap::new());
			}
			continue;
		}

		if in_section {
			if let (Some(section), Some((key, value))) = (found.as_mut(), line.split_once('=')) {
				section.insert(key.trim().to_string(), value.trim().to_string());
			}
		}
	}

	found
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn shared_file(contents: &str) -> (tempfile::TempDir, PathBuf) {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("credentials");
		let mut file = std::fs::File::create(&path).unwrap();
		file.write_all(contents.as_bytes()).unwrap();
		(dir, path)
	}

	#[tokio::test]
	async fn missing_file_resolves_absent() {
		let dir = tempfile::tempdir().unwrap();
		let source = ProfileSource::new().with_path(dir.path().join("credentials"));

		let fetched = source.fetch().await.unwrap();
		assert!(fetched.credentials().is_none());
	}

	#[tokio::test]
	async fn resolves_the_default_profile() {
		let (_dir, path) = shared_file(
			"[default]\naws_access_key_id = AKIATEST\naws_secret_access_key = wJalrXUt\n",
		);
		let source = ProfileSource::new().with_path(path).with_profile("default");

		let fetched = source.fetch().await.unwrap();
		let credentials = fetched.credentials().unwrap();
		assert_eq!(credentials.access_key_id(), "AKIATEST");
		assert!(credentials.session_token().is_none());
	}

	#[tokio::test]
	async fn resolves_a_named_profile_with_a_token() {
		let (_dir, path) = shared_file(
			"[default]\naws_access_key_id = AKIADEFAULT\naws_secret_access_key = defaultsecret\n\n\
			 [forwarder]\naws_access_key_id = AKIATEST\naws_secret_access_key = wJalrXUt\n\
			 aws_session_token = FwoGZXIv\n",
		);
		let source = ProfileSource::new().with_path(path).with_profile("forwarder");

		let fetched = source.fetch().await.unwrap();
		let credentials = fetched.credentials().unwrap();
		assert_eq!(credentials.access_key_id(), "AKIATEST");
		assert_eq!(credentials.session_token(), Some("FwoGZXIv"));
	}

	#[tokio::test]
	async fn absent_profile_section_resolves_absent() {
		let (_dir, path) = shared_file(
			"[default]\naws_access_key_id = AKIATEST\naws_secret_access_key = wJalrXUt\n",
		);
		let source = ProfileSource::new().with_path(path).with_profile("forwarder");

		let fetched = source.fetch().await.unwrap();
		assert!(fetched.credentials().is_none());
	}

	#[tokio::test]
	async fn partial_profile_section_names_the_missing_key() {
		let (_dir, path) = shared_file("[forwarder]\naws_access_key_id = AKIATEST\n");
		let source = ProfileSource::new().with_path(path).with_profile("forwarder");

		let error = source.fetch().await.unwrap_err();
		assert_eq!(
			error.to_string(),
			"missing required value 'aws_secret_access_key'"
		);
	}

	#[tokio::test]
	async fn ignores_comments_and_unrelated_sections() {
		let (_dir, path) = shared_file(
			"# shared credentials\n; legacy comment\n[other]\naws_access_key_id = AKIAOTHER\n\n\
			 [forwarder]\naws_access_key_id = AKIATEST\naws_secret_access_key = wJalrXUt\n",
		);
		let source = ProfileSource::new().with_path(path).with_profile("forwarder");

		let fetched = source.fetch().await.unwrap();
		assert_eq!(fetched.credentials().unwrap().access_key_id(), "AKIATEST");
	}
}
