// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Infrastructure types related to packaging rate-limit information alongside responses from
//! Twitter.

use std::ops::Deref;

use hyper::client::ResponseFuture;
use hyper::{self, Body, Request};
#[cfg(all(feature = "hyper-rustls", not(feature = "native_tls")))]
use hyper_rustls::HttpsConnector;
#[cfg(feature = "native_tls")]
use hyper_tls::HttpsConnector;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, TwitterErrors};

use super::Headers;

const X_RATE_LIMIT_LIMIT: &str = "x-rate-limit-limit";
const X_RATE_LIMIT_REMAINING: &str = "x-rate-limit-remaining";
const X_RATE_LIMIT_RESET: &str = "x-rate-limit-reset";

fn rate_limit(headers: &Headers, header: &'static str) -> Result<Option<i32>> {
    let val = headers.get(header);

    if let Some(val) = val {
        let val = val.to_str()?.parse::<i32>()?;
        Ok(Some(val))
    } else {
        Ok(None)
    }
}

fn rate_limit_limit(headers: &Headers) -> Result<Option<i32>> {
    rate_limit(headers, X_RATE_LIMIT_LIMIT)
}

fn rate_limit_remaining(headers: &Headers) -> Result<Option<i32>> {
    rate_limit(headers, X_RATE_LIMIT_REMAINING)
}

fn rate_limit_reset(headers: &Headers) -> Result<Option<i32>> {
    rate_limit(headers, X_RATE_LIMIT_RESET)
}

/// Rate-limit information returned with a response. A value of `-1` means Twitter didn't send
/// that header.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RateLimit {
    ///The rate limit ceiling for the given request.
    pub limit: i32,
    ///The number of requests left for the 15-minute window.
    pub remaining: i32,
    ///The UTC Unix timestamp at which the rate window resets.
    pub reset: i32,
}

impl RateLimit {
    fn from_headers(headers: &Headers) -> Result<Self> {
        Ok(RateLimit {
            limit: rate_limit_limit(headers)?.unwrap_or(-1),
            remaining: rate_limit_remaining(headers)?.unwrap_or(-1),
            reset: rate_limit_reset(headers)?.unwrap_or(-1),
        })
    }
}

///A helper struct to wrap response data with accompanying rate limit information.
///
///This is returned by any function that calls a rate-limited method on Twitter, to allow for
///inline checking of the rate-limit information without an extra call to
///`application/rate_limit_status`.
///
///As this implements `Deref`, you can call methods on the response directly without having to
///access the `response` field.
#[derive(Debug, Clone)]
pub struct Response<T> {
    ///Latest rate limit status
    pub rate_limit_status: RateLimit,
    ///The decoded response from the request.
    pub response: T,
}

impl<T> Response<T> {
    ///Convert a `Response<T>` to a `Response<U>` by running its contained response through the
    ///given function. This preserves its rate-limit information.
    pub fn map<F, U>(src: Response<T>, fun: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            rate_limit_status: src.rate_limit_status,
            response: fun(src.response),
        }
    }

    ///Consumes this `Response`, returning only the decoded output.
    pub fn into_inner(self) -> T {
        self.response
    }
}

impl<T> Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.response
    }
}

// n.b. the connector is picked by the crate's TLS feature flags
/// Starts the given request, returning the `ResponseFuture` from hyper.
pub fn get_response(request: Request<Body>) -> ResponseFuture {
    #[cfg(feature = "native_tls")]
    let connector = HttpsConnector::new();
    #[cfg(all(feature = "rustls", not(feature = "native_tls")))]
    let connector = HttpsConnector::with_native_roots();
    #[cfg(all(
        feature = "rustls_webpki",
        not(any(feature = "rustls", feature = "native_tls"))
    ))]
    let connector = HttpsConnector::with_webpki_roots();

    let client = hyper::Client::builder().build(connector);
    client.request(request)
}

/// Loads the given request, checks it for Twitter errors and a success status, and returns the
/// response headers and body.
///
/// A body that parses as a Twitter error structure is always an error, even with a success
/// status. Error code 88 with a `X-Rate-Limit-Reset` header is reported as `RateLimit`.
pub async fn raw_request(request: Request<Body>) -> Result<(Headers, Vec<u8>)> {
    let resp = get_response(request).await?;
    let (parts, body) = resp.into_parts();
    let body = hyper::body::to_bytes(body).await?.to_vec();

    check_response(parts.status, parts.headers, body)
}

fn check_response(
    status: hyper::StatusCode,
    headers: Headers,
    body: Vec<u8>,
) -> Result<(Headers, Vec<u8>)> {
    if let Ok(errors) = serde_json::from_slice::<TwitterErrors>(&body) {
        if errors.errors.iter().any(|e| e.code == 88) {
            if let Some(reset) = rate_limit_reset(&headers)? {
                return Err(Error::RateLimit(reset));
            }
        }
        return Err(Error::TwitterError(headers, errors));
    }

    if !status.is_success() {
        return Err(Error::BadStatus(status));
    }

    Ok((headers, body))
}

/// Loads the given request and deserializes its body as JSON into the target type, alongside
/// the rate-limit information from the response headers.
pub async fn request_with_json_response<T: DeserializeOwned>(
    request: Request<Body>,
) -> Result<Response<T>> {
    let (headers, body) = raw_request(request).await?;
    let response = serde_json::from_slice(&body)?;
    let rate_limit_status = RateLimit::from_headers(&headers)?;
    Ok(Response {
        rate_limit_status,
        response,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;
    use hyper::StatusCode;

    fn headers(pairs: &[(&'static str, &'static str)]) -> Headers {
        let mut headers = Headers::new();
        for (k, v) in pairs {
            headers.insert(*k, HeaderValue::from_static(v));
        }
        headers
    }

    #[test]
    fn rate_limit_headers() {
        let hdrs = headers(&[
            (X_RATE_LIMIT_LIMIT, "75"),
            (X_RATE_LIMIT_REMAINING, "74"),
            (X_RATE_LIMIT_RESET, "1589115600"),
        ]);
        let limit = RateLimit::from_headers(&hdrs).unwrap();
        assert_eq!(limit.limit, 75);
        assert_eq!(limit.remaining, 74);
        assert_eq!(limit.reset, 1589115600);

        let limit = RateLimit::from_headers(&Headers::new()).unwrap();
        assert_eq!(limit.remaining, -1);
    }

    #[test]
    fn bad_rate_limit_header() {
        let hdrs = headers(&[(X_RATE_LIMIT_REMAINING, "lots")]);
        match RateLimit::from_headers(&hdrs) {
            Err(Error::HeaderParseError(_)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn error_status() {
        match check_response(StatusCode::SERVICE_UNAVAILABLE, Headers::new(), b"[]".to_vec()) {
            Err(Error::BadStatus(status)) => assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn error_body_with_ok_status() {
        let body = br#"{"errors":[{"code":34,"message":"Sorry, that page does not exist."}]}"#;
        match check_response(StatusCode::OK, Headers::new(), body.to_vec()) {
            Err(Error::TwitterError(_, errs)) => assert_eq!(errs.errors[0].code, 34),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rate_limited() {
        let body = br#"{"errors":[{"code":88,"message":"Rate limit exceeded"}]}"#;
        let hdrs = headers(&[(X_RATE_LIMIT_RESET, "1589115600")]);
        match check_response(StatusCode::TOO_MANY_REQUESTS, hdrs, body.to_vec()) {
            Err(Error::RateLimit(1589115600)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn success_passes_body_through() {
        let (_, body) = check_response(StatusCode::OK, Headers::new(), b"[]".to_vec()).unwrap();
        assert_eq!(body, b"[]");
    }
}
