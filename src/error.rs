// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A composite error type for errors that can occur while collecting and storing trends.
//!
//! Two errors are special here. Any error for which [`Error::is_transport`] returns `true` came
//! out of a single call to Twitter; the collector logs those and moves on to the next location
//! instead of failing the whole batch. `MissingArtifact` comes out of the blob store when a
//! previously-persisted result isn't there, and is what tells the pipeline to go fetch a fresh
//! one.
//!
//! [`Error::is_transport`]: enum.Error.html#method.is_transport

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::Headers;

/// Convenient alias to a Result containing a local Error type
pub type Result<T> = std::result::Result<T, Error>;

///Represents a collection of errors returned from a Twitter API call.
///
///This is returned as part of [`Error::TwitterError`][] whenever Twitter has rejected a call.
///
///[`Error::TwitterError`]: enum.Error.html
#[derive(Debug, Deserialize, Serialize, thiserror::Error)]
pub struct TwitterErrors {
    ///A collection of errors returned by Twitter.
    pub errors: Vec<TwitterErrorCode>,
}

impl fmt::Display for TwitterErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if first {
                first = false;
            } else {
                writeln!(f, ",")?;
            }

            write!(f, "{}", e)?;
        }

        Ok(())
    }
}

///Represents a specific error returned from a Twitter API call.
#[derive(Debug, Deserialize, Serialize)]
pub struct TwitterErrorCode {
    ///The error message returned by Twitter.
    pub message: String,
    ///The numeric error code returned by Twitter. A list of possible error codes can be found in
    ///the [API documentation][error-codes].
    ///
    ///[error-codes]: https://developer.twitter.com/en/docs/basics/response-codes
    pub code: i32,
}

impl fmt::Display for TwitterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}: {}", self.code, self.message)
    }
}

/// Represents an error that can occur during a web call or while handling its results.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    ///A record returned by Twitter (or read back from a stored artifact) was missing a field the
    ///pipeline relies on. The enclosed value names what was missing.
    #[error("Malformed payload: {0}")]
    MalformedPayload(&'static str),
    ///The response from Twitter returned an error structure instead of the expected response. The
    ///enclosed value was the response from Twitter.
    #[error("Errors returned by Twitter: {1}")]
    TwitterError(Headers, TwitterErrors),
    ///The response returned from Twitter contained an error indicating that the rate limit for
    ///that method has been reached. The enclosed value is the Unix timestamp in UTC when the next
    ///rate-limit window will open.
    #[error("Rate limit reached, hold until {0}")]
    RateLimit(i32),
    ///The web request experienced an error. The enclosed error was returned from hyper.
    #[error("Network error: {0}")]
    NetError(#[from] hyper::Error),
    ///The call to Twitter did not complete within the configured timeout. The enclosed value is
    ///the timeout.
    #[error("Request timed out after {0:?}")]
    TimedOut(Duration),
    ///The response returned from Twitter was not a success status.
    #[error("Error status received: {0}")]
    BadStatus(hyper::StatusCode),
    ///An error occurred while loading the JSON response.
    #[error("JSON deserialize error: {0}")]
    DeserializeError(#[from] serde_json::Error),
    ///The blob store holds nothing under the enclosed key.
    #[error("No stored artifact named {0}")]
    MissingArtifact(String),
    ///An error occurred while reading or writing a stored artifact.
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    ///A configuration value was missing or could not be parsed. The enclosed value describes
    ///which one.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    ///A rate-limit header could not be converted into a string.
    #[error("Error converting headers: {0}")]
    HeaderConvertError(#[from] hyper::header::ToStrError),
    ///A rate-limit header could not be parsed into a number.
    #[error("Error parsing headers: {0}")]
    HeaderParseError(#[from] std::num::ParseIntError),
}

impl Error {
    /// Returns whether this error came out of the transport to Twitter: a failed connection, a
    /// timeout, a non-success status, or an error body. The collector skips a location on these
    /// instead of failing the batch.
    pub fn is_transport(&self) -> bool {
        match self {
            Error::NetError(_)
            | Error::TimedOut(_)
            | Error::BadStatus(_)
            | Error::RateLimit(_)
            | Error::TwitterError(..) => true,
            _ => false,
        }
    }

    /// Returns the HTTP status attached to this error, if it has one.
    pub fn status(&self) -> Option<hyper::StatusCode> {
        match self {
            Error::BadStatus(status) => Some(*status),
            Error::RateLimit(_) => Some(hyper::StatusCode::TOO_MANY_REQUESTS),
            _ => None,
        }
    }
}
