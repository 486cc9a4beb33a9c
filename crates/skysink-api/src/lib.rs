// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provider-agnostic log forwarding API for skysink.
//!
//! A [`LogForwarder`] accepts timestamped log entries and ships them to a
//! cloud provider in the background. Concrete forwarders live in the
//! provider crates; this crate only defines the capability surface they
//! implement and the errors they raise.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Result type alias for forwarder operations.
pub type Result<T> = std::result::Result<T, ForwarderError>;

/// Errors raised by a log forwarder.
#[derive(Debug, Error)]
pub enum ForwarderError {
	/// The forwarder queue is full and the entry was rejected.
	#[error("forwarder queue overflowed ({capacity} entries)")]
	QueueOverflow { capacity: usize },

	/// The forwarder did not drain and stop within the given timeout.
	#[error("forwarder did not stop within {timeout:?}")]
	StopTimeout { timeout: Duration },
}

/// Base capability for a log forwarder.
///
/// Implementations queue entries internally and flush them to the cloud
/// provider from a background task, authenticating outbound calls with
/// whatever credentials their provider crate resolves.
#[async_trait]
pub trait LogForwarder: Send + Sync {
	/// Whether the forwarder is currently running.
	fn is_running(&self) -> bool;

	/// Start the forwarder if it is not already running.
	///
	/// Calling this on a running forwarder does nothing.
	async fn start(&self);

	/// Stop the forwarder, waiting up to `timeout` for queued entries to
	/// drain. `None` waits indefinitely.
	async fn stop(&self, timeout: Option<Duration>) -> Result<()>;

	/// Submit a log entry to be forwarded to the cloud provider.
	///
	/// `timestamp_millis` is the UNIX timestamp of the entry in
	/// milliseconds.
	async fn submit_log_entry(&self, timestamp_millis: i64, contents: Bytes) -> Result<()>;
}
