//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap the upstream call with the configured deadline, if any
//! - Cancel the call cleanly when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - No deadline configured means the call is awaited as-is
//! - A timed-out call is a transport failure like any other

use std::future::Future;
use std::time::Duration;

use tokio::time::error::Elapsed;

/// Await `fut`, giving up after `deadline` when one is set.
pub async fn with_deadline<F>(deadline: Option<Duration>, fut: F) -> Result<F::Output, Elapsed>
where
    F: Future,
{
    match deadline {
        Some(deadline) => tokio::time::timeout(deadline, fut).await,
        None => Ok(fut.await),
    }
}
