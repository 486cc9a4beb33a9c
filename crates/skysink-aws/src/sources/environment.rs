// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential source backed by process environment variables.

use async_trait::async_trait;
use tracing::debug;

use crate::credentials::AwsCredentials;
use crate::error::Result;
use crate::lazy::{FetchCredentials, Fetched};
use crate::sources::require;

const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
const AWS_ACCESS_KEY: &str = "AWS_ACCESS_KEY";
const AWS_SECRET_KEY: &str = "AWS_SECRET_KEY";
const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Reads credentials from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`
/// (with their legacy alternates) and `AWS_SESSION_TOKEN`.
///
/// A completely unset environment resolves to absent. Environment
/// variables do not appear mid-process, so an absent result stays cached
/// for the process lifetime once wrapped in the lazy provider.
#[derive(Debug, Default)]
pub struct EnvironmentSource;

impl EnvironmentSource {
	/// Create the source.
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl FetchCredentials for EnvironmentSource {
	async fn fetch(&self) -> Result<Fetched> {
		let access_key_id = first_env(&[AWS_ACCESS_KEY_ID, AWS_ACCESS_KEY]);
		let secret_access_key = first_env(&[AWS_SECRET_KEY, AWS_SECRET_ACCESS_KEY]);
		let session_token = std::env::var(AWS_SESSION_TOKEN).ok();

		if let Some(session_token) = session_token {
			return Ok(Fetched::permanent(AwsCredentials::with_session_token(
				require(AWS_ACCESS_KEY_ID, access_key_id)?,
				require(AWS_SECRET_ACCESS_KEY, secret_access_key)?,
				session_token,
			)));
		}

		if access_key_id.is_some() || secret_access_key.is_some() {
			return Ok(Fetched::permanent(AwsCredentials::new(
				require(AWS_ACCESS_KEY_ID, access_key_id)?,
				require(AWS_SECRET_ACCESS_KEY, secret_access_key)?,
			)));
		}

		debug!("no credential environment variables set, skipping");
		Ok(Fetched::absent())
	}
}

/// First set variable wins, in the order given.
fn first_env(names: &[&str]) -> Option<String> {
	names.iter().find_map(|name| std::env::var(name).ok())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::env;
	use std::sync::Mutex;

	static ENV_MUTEX: Mutex<()> = Mutex::new(());

	fn clear_credential_env() {
		env::remove_var(AWS_ACCESS_KEY_ID);
		env::remove_var(AWS_ACCESS_KEY);
		env::remove_var(AWS_SECRET_KEY);
		env::remove_var(AWS_SECRET_ACCESS_KEY);
		env::remove_var(AWS_SESSION_TOKEN);
	}

	#[tokio::test]
	async fn resolves_absent_when_nothing_is_set() {
		let _guard = ENV_MUTEX.lock().unwrap();
		clear_credential_env();

		let fetched = EnvironmentSource::new().fetch().await.unwrap();
		assert!(fetched.credentials().is_none());
	}

	#[tokio::test]
	async fn resolves_the_key_pair_without_a_token() {
		let _guard = ENV_MUTEX.lock().unwrap();
		clear_credential_env();
		env::set_var(AWS_ACCESS_KEY_ID, "AKIATEST");
		env::set_var(AWS_SECRET_ACCESS_KEY, "wJalrXUt");

		let fetched = EnvironmentSource::new().fetch().await.unwrap();
		let credentials = fetched.credentials().unwrap();
		assert_eq!(credentials.access_key_id(), "AKIATEST");
		assert_eq!(credentials.secret_access_key(), "wJalrXUt");
		assert!(credentials.session_token().is_none());
		clear_credential_env();
	}

	#[tokio::test]
	async fn resolves_the_session_token_when_present() {
		let _guard = ENV_MUTEX.lock().unwrap();
		clear_credential_env();
		env::set_var(AWS_ACCESS_KEY_ID, "AKIATEST");
		env::set_var(AWS_SECRET_ACCESS_KEY, "wJalrXUt");
		env::set_var(AWS_SESSION_TOKEN, "FwoGZXIv");

		let fetched = EnvironmentSource::new().fetch().await.unwrap();
		let credentials = fetched.credentials().unwrap();
		assert_eq!(credentials.session_token(), Some("FwoGZXIv"));
		clear_credential_env();
	}

	#[tokio::test]
	async fn honours_the_legacy_alternate_names() {
		let _guard = ENV_MUTEX.lock().unwrap();
		clear_credential_env();
		env::set_var(AWS_ACCESS_KEY, "AKIALEGACY");
		env::set_var(AWS_SECRET_KEY, "legacysecret");

		let fetched = EnvironmentSource::new().fetch().await.unwrap();
		let credentials = fetched.credentials().unwrap();
		assert_eq!(credentials.access_key_id(), "AKIALEGACY");
		assert_eq!(credentials.secret_access_key(), "legacysecret");
		clear_credential_env();
	}

	#[tokio::test]
	async fn partial_configuration_names_the_missing_variable() {
		let _guard = ENV_MUTEX.lock().unwrap();
		clear_credential_env();
		env::set_var(AWS_ACCESS_KEY_ID, "AKIATEST");

		let error = EnvironmentSource::new().fetch().await.unwrap_err();
		assert_eq!(
			error.to_string(),
			"missing required value 'AWS_SECRET_ACCESS_KEY'"
		);
		clear_credential_env();
	}

	#[tokio::test]
	async fn lone_session_token_is_a_misconfiguration() {
		let _guard = ENV_MUTEX.lock().unwrap();
		clear_credential_env();
		env::set_var(AWS_SESSION_TOKEN, "FwoGZXIv");

		let error = EnvironmentSource::new().fetch().await.unwrap_err();
		assert_eq!(error.to_string(), "missing required value 'AWS_ACCESS_KEY_ID'");
		clear_credential_env();
	}
}
