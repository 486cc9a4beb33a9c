// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential provider seam and the first-hit provider chain.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::credentials::AwsCredentials;
use crate::error::Result;

/// API for fetching AWS credentials from one kind of place.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
	/// Resolve credentials.
	///
	/// Returns `Ok(None)` when this source has nothing configured, which
	/// tells a chain to move on to the next provider. Hard failures are
	/// returned as errors and must never be swallowed.
	async fn credentials(&self) -> Result<Option<AwsCredentials>>;
}

#[async_trait]
impl<P: CredentialsProvider> CredentialsProvider for Arc<P> {
	async fn credentials(&self) -> Result<Option<AwsCredentials>> {
		(**self).credentials().await
	}
}

/// Ordered chain of credential providers.
///
/// Providers are tried in registration order; the first to yield a
/// credential wins. A hard error from any provider aborts the walk
/// immediately: it indicates a misconfigured source, and trying later
/// providers would mask it. Only `Ok(None)` advances the walk.
///
/// The chain itself is stateless between calls; underlying providers do
/// their own caching.
#[derive(Default)]
pub struct CredentialsProviderChain {
	providers: Vec<Box<dyn CredentialsProvider>>,
}

impl CredentialsProviderChain {
	/// Create an empty chain.
	pub fn new() -> Self {
		Self {
			providers: Vec::new(),
		}
	}

	/// Add a provider to the back of the chain.
	pub fn push(&mut self, provider: impl CredentialsProvider + 'static) {
		self.providers.push(Box::new(provider));
	}

	/// Builder-style [`push`](Self::push).
	pub fn with_provider(mut self, provider: impl CredentialsProvider + 'static) -> Self {
		self.push(provider);
		self
	}
}

#[async_trait]
impl CredentialsProvider for CredentialsProviderChain {
	async fn credentials(&self) -> Result<Option<AwsCredentials>> {
		for (index, provider) in self.providers.iter().enumerate() {
			if let Some(credentials) = provider.credentials().await? {
				debug!(index, "credential provider produced a value");
				return Ok(Some(credentials));
			}
			debug!(index, "credential provider had nothing configured, trying next");
		}

		Ok(None)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::AuthError;
	use std::sync::Mutex;

	enum Outcome {
		Absent,
		Found(AwsCredentials),
		Fails,
	}

	struct Recording {
		name: &'static str,
		log: Arc<Mutex<Vec<&'static str>>>,
		outcome: Outcome,
	}

	#[async_trait]
	impl CredentialsProvider for Recording {
		async fn credentials(&self) -> Result<Option<AwsCredentials>> {
			self.log.lock().unwrap().push(self.name);
			match &self.outcome {
				Outcome::Absent => Ok(None),
				Outcome::Found(credentials) => Ok(Some(credentials.clone())),
				Outcome::Fails => Err(AuthError::io(
					"reading credentials",
					std::io::Error::other("disk failure"),
				)),
			}
		}
	}

	fn recording(
		name: &'static str,
		log: &Arc<Mutex<Vec<&'static str>>>,
		outcome: Outcome,
	) -> Recording {
		Recording {
			name,
			log: Arc::clone(log),
			outcome,
		}
	}

	fn credentials() -> AwsCredentials {
		AwsCredentials::new("AKIATEST", "wJalrXUt")
	}

	#[tokio::test]
	async fn returns_first_hit_walking_in_order() {
		let log = Arc::new(Mutex::new(Vec::new()));
		let chain = CredentialsProviderChain::new()
			.with_provider(recording("a", &log, Outcome::Absent))
			.with_provider(recording("b", &log, Outcome::Absent))
			.with_provider(recording("c", &log, Outcome::Found(credentials())));

		let resolved = chain.credentials().await.unwrap().unwrap();
		assert_eq!(resolved.access_key_id(), "AKIATEST");
		assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
	}

	#[tokio::test]
	async fn stops_walking_at_the_first_hit() {
		let log = Arc::new(Mutex::new(Vec::new()));
		let chain = CredentialsProviderChain::new()
			.with_provider(recording("a", &log, Outcome::Found(credentials())))
			.with_provider(recording("b", &log, Outcome::Found(credentials())));

		chain.credentials().await.unwrap().unwrap();
		assert_eq!(*log.lock().unwrap(), vec!["a"]);
	}

	#[tokio::test]
	async fn hard_error_stops_the_walk() {
		let log = Arc::new(Mutex::new(Vec::new()));
		let chain = CredentialsProviderChain::new()
			.with_provider(recording("a", &log, Outcome::Absent))
			.with_provider(recording("b", &log, Outcome::Fails))
			.with_provider(recording("c", &log, Outcome::Found(credentials())));

		let error = chain.credentials().await.unwrap_err();
		assert!(matches!(error, AuthError::Io { .. }));
		assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
	}

	#[tokio::test]
	async fn resolves_absent_when_every_provider_is_absent() {
		let log = Arc::new(Mutex::new(Vec::new()));
		let chain = CredentialsProviderChain::new()
			.with_provider(recording("a", &log, Outcome::Absent))
			.with_provider(recording("b", &log, Outcome::Absent));

		assert!(chain.credentials().await.unwrap().is_none());
	}

	#[tokio::test]
	async fn empty_chain_resolves_absent() {
		let chain = CredentialsProviderChain::new();
		assert!(chain.credentials().await.unwrap().is_none());
	}

	#[tokio::test]
	async fn duplicate_provider_is_tried_twice() {
		let log = Arc::new(Mutex::new(Vec::new()));
		let shared = Arc::new(recording("a", &log, Outcome::Absent));
		let chain = CredentialsProviderChain::new()
			.with_provider(Arc::clone(&shared))
			.with_provider(shared);

		assert!(chain.credentials().await.unwrap().is_none());
		assert_eq!(*log.lock().unwrap(), vec!["a", "a"]);
	}
}
