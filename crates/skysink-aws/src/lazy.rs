// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lazily cached credential fetching with optional expiry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::credentials::AwsCredentials;
use crate::error::Result;
use crate::provider::CredentialsProvider;

/// Outcome of a single fetch from an underlying credential source.
#[derive(Debug, Clone)]
pub struct Fetched {
	credentials: Option<AwsCredentials>,
	valid_until: Option<DateTime<Utc>>,
}

impl Fetched {
	/// The source had nothing configured.
	pub fn absent() -> Self {
		Self {
			credentials: None,
			valid_until: None,
		}
	}

	/// Credentials that stay valid for the lifetime of the process.
	pub fn permanent(credentials: AwsCredentials) -> Self {
		Self {
			credentials: Some(credentials),
			valid_until: None,
		}
	}

	/// Credentials that must be fetched again once `valid_until` passes.
	///
	/// The deadline should already include whatever safety margin the
	/// source wants ahead of the real expiry.
	pub fn expiring(credentials: AwsCredentials, valid_until: DateTime<Utc>) -> Self {
		Self {
			credentials: Some(credentials),
			valid_until: Some(valid_until),
		}
	}

	/// The fetched credentials, if the source had any.
	pub fn credentials(&self) -> Option<&AwsCredentials> {
		self.credentials.as_ref()
	}

	/// The deadline after which the result must be fetched again.
	pub fn valid_until(&self) -> Option<DateTime<Utc>> {
		self.valid_until
	}
}

/// A single strategy that may locate credentials.
///
/// Implementations are wrapped in a [`LazyCredentialsProvider`] so the
/// fetch runs at most once per validity window.
#[async_trait]
pub trait FetchCredentials: Send + Sync {
	/// Fetch credentials from the underlying source.
	async fn fetch(&self) -> Result<Fetched>;

	/// Wrap this source in the caching provider.
	fn cached(self) -> LazyCredentialsProvider<Self>
	where
		Self: Sized,
	{
		LazyCredentialsProvider::new(self)
	}
}

#[derive(Debug, Default)]
struct CacheState {
	/// `None` until the first successful fetch. The inner option mirrors
	/// the fetched result, so an absent source is cached as `Some(None)`
	/// and not polled again.
	value: Option<Option<AwsCredentials>>,
	valid_until: Option<DateTime<Utc>>,
}

/// Caches the result of a [`FetchCredentials`] source.
///
/// The wrapped source runs at most once per validity window, even under
/// concurrent callers: the internal lock is held for the full duration of
/// a miss, so callers arriving mid-fetch wait for the in-flight result
/// instead of issuing duplicates. Absent results are cached exactly like
/// values. A failed fetch caches nothing, so the next caller retries.
pub struct LazyCredentialsProvider<S> {
	source: S,
	state: Mutex<CacheState>,
}

impl<S: FetchCredentials> LazyCredentialsProvider<S> {
	/// Wrap `source` with an empty cache.
	pub fn new(source: S) -> Self {
		Self {
			source,
			state: Mutex::new(CacheState::default()),
		}
	}
}

#[async_trait]
impl<S: FetchCredentials> CredentialsProvider for LazyCredentialsProvider<S> {
	async fn credentials(&self) -> Result<Option<AwsCredentials>> {
		// tokio's mutex is FIFO-fair, so early callers are not starved
		// while a miss is in flight.
		let mut state = self.state.lock().await;

		if let Some(valid_until) = state.valid_until {
			if Utc::now() >= valid_until {
				debug!(%valid_until, "cached credentials passed their deadline, fetching again");
				state.value = None;
				state.valid_until = None;
			}
		}

		if state.value.is_none() {
			let fetched = self.source.fetch().await?;
			state.value = Some(fetched.credentials);
			state.valid_until = fetched.valid_until;
		}

		Ok(state.value.clone().flatten())
	}
}
