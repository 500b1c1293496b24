// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The boundary between the pipeline and wherever trends come from.
//!
//! The pipeline only ever asks two questions: which places have trends, and what is trending in
//! one of them. [`TrendsProvider`] is that pair of questions. [`TwitterProvider`] answers them
//! by calling the Twitter API, signing each call with the `Token` it was built with and bounding
//! each call by a timeout.
//!
//! [`TrendsProvider`]: trait.TrendsProvider.html
//! [`TwitterProvider`]: struct.TwitterProvider.html

use std::future::Future;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use tracing::debug;
use url::Url;

use crate::auth::Token;
use crate::common::Response;
use crate::error::{Error, Result};
use crate::trend::{self, Location, RawTrendLine};

/// A source of trend locations and per-location trend lines.
pub trait TrendsProvider: Send + Sync {
    /// Lists every location the provider has trend information for.
    fn list_locations(&self) -> BoxFuture<'_, Result<Vec<Location>>>;

    /// Fetches the trend lines for the location with the given WOEID.
    fn fetch_trends_for(&self, woeid: u32) -> BoxFuture<'_, Result<Vec<RawTrendLine>>>;
}

/// Runs `call`, giving up with `Error::TimedOut` once `timeout` has passed.
pub(crate) async fn with_timeout<T>(
    timeout: Duration,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| Error::TimedOut(timeout))?
}

/// A `TrendsProvider` backed by the Twitter trends API.
#[derive(Debug, Clone)]
pub struct TwitterProvider {
    base: Url,
    token: Token,
    timeout: Duration,
}

impl TwitterProvider {
    /// Creates a provider that calls the API under `base`, signs with `token`, and gives up on any
    /// single call after `timeout`.
    pub fn new(base: Url, token: Token, timeout: Duration) -> Self {
        TwitterProvider {
            base,
            token,
            timeout,
        }
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<Response<T>>>) -> Result<T> {
        let resp = with_timeout(self.timeout, call).await?;

        debug!(
            remaining = resp.rate_limit_status.remaining,
            reset = resp.rate_limit_status.reset,
            "rate limit status"
        );

        Ok(resp.into_inner())
    }
}

impl TrendsProvider for TwitterProvider {
    fn list_locations(&self) -> BoxFuture<'_, Result<Vec<Location>>> {
        async move {
            self.bounded(trend::available(&self.base, &self.token))
                .await
        }
        .boxed()
    }

    fn fetch_trends_for(&self, woeid: u32) -> BoxFuture<'_, Result<Vec<RawTrendLine>>> {
        async move {
            self.bounded(trend::place(&self.base, woeid, &self.token))
                .await
        }
        .boxed()
    }
}
