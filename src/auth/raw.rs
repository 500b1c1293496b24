// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Internal mechanisms for the `auth` module.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac, NewMac};
use hyper::header::AUTHORIZATION;
use hyper::{Body, Method, Request};
use rand::{self, Rng};
use sha1::Sha1;

use crate::common::*;
use crate::error::{Error, Result};

use super::{KeyPair, Token};

pub struct RequestBuilder<'a> {
    base_uri: &'a str,
    method: Method,
    params: Option<ParamList>,
    query: Option<String>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(method: Method, base_uri: &'a str) -> Self {
        RequestBuilder {
            base_uri,
            method,
            params: None,
            query: None,
        }
    }

    pub fn with_query_params(self, params: &ParamList) -> Self {
        RequestBuilder {
            query: Some(params.to_urlencoded()),
            params: Some(params.clone()),
            ..self
        }
    }

    pub fn request_token(self, token: &Token) -> Result<Request<Body>> {
        let oauth = OAuthParams::from_keys(token.consumer.clone(), token.access.clone())
            .sign_request(self.method.clone(), self.base_uri, self.params.as_ref())?;
        self.request_authorization(oauth.to_string())
    }

    fn request_authorization(self, authorization: String) -> Result<Request<Body>> {
        let full_url = if let Some(query) = self.query {
            format!("{}?{}", self.base_uri, query)
        } else {
            self.base_uri.to_string()
        };

        Request::builder()
            .method(self.method)
            .uri(full_url.as_str())
            .header(AUTHORIZATION, authorization)
            .body(Body::empty())
            .map_err(|_| Error::InvalidConfig(format!("invalid request URL: {}", full_url)))
    }
}

/// OAuth header set used to create an OAuth signature.
#[derive(Clone, Debug)]
struct OAuthParams {
    /// The consumer key that represents the app making the API request.
    consumer_key: KeyPair,
    /// The token that represents the user authorizing the request.
    token: KeyPair,
    /// A random token representing the request itself. Used to de-duplicate requests on Twitter's
    /// end.
    nonce: String,
    /// A Unix timestamp for when the request was created.
    timestamp: u64,
}

impl OAuthParams {
    /// Creates a new `OAuthParams` header with the given keys, a fresh `timestamp` and a random
    /// `nonce`.
    fn from_keys(consumer_key: KeyPair, token: KeyPair) -> OAuthParams {
        let timestamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(dur) => dur,
            Err(err) => err.duration(),
        }
        .as_secs();
        let mut rng = rand::thread_rng();
        let nonce = ::std::iter::repeat(())
            .map(|()| char::from(rng.sample(rand::distributions::Alphanumeric)))
            .take(32)
            .collect::<String>();
        OAuthParams {
            consumer_key,
            token,
            nonce,
            timestamp,
        }
    }

    /// Uses the parameters in this `OAuthParams` instance to generate a signature for the given
    /// request, returning it as a `SignedHeader`.
    fn sign_request(
        self,
        method: Method,
        uri: &str,
        params: Option<&ParamList>,
    ) -> Result<SignedHeader> {
        let query_string = params
            .cloned()
            .unwrap_or_default()
            .add_param("oauth_consumer_key", self.consumer_key.key.clone())
            .add_param("oauth_nonce", self.nonce.clone())
            .add_param("oauth_signature_method", "HMAC-SHA1")
            .add_param("oauth_timestamp", self.timestamp.to_string())
            .add_param("oauth_version", "1.0")
            .add_param("oauth_token", self.token.key.clone())
            .to_urlencoded();

        let base_str = format!(
            "{}&{}&{}",
            percent_encode(method.as_str()),
            percent_encode(uri),
            percent_encode(&query_string)
        );
        let key = format!(
            "{}&{}",
            percent_encode(&self.consumer_key.secret),
            percent_encode(&self.token.secret)
        );

        let mut digest = Hmac::<Sha1>::new_from_slice(key.as_bytes())
            .map_err(|_| Error::InvalidConfig("unusable OAuth signing key".to_string()))?;
        digest.update(base_str.as_bytes());

        let mut params: BTreeMap<&'static str, Cow<'static, str>> = BTreeMap::new();
        params.insert("oauth_signature_method", "HMAC-SHA1".into());
        params.insert("oauth_version", "1.0".into());
        params.insert("oauth_consumer_key", self.consumer_key.key);
        params.insert("oauth_token", self.token.key);
        params.insert("oauth_nonce", self.nonce.into());
        params.insert("oauth_timestamp", self.timestamp.to_string().into());
        params.insert(
            "oauth_signature",
            base64::encode(&digest.finalize().into_bytes()).into(),
        );

        Ok(SignedHeader { params })
    }
}

/// A set of `OAuthParams` parameters combined with a request signature, ready to be attached to a
/// request.
struct SignedHeader {
    /// The OAuth parameters used to create the signature.
    params: BTreeMap<&'static str, Cow<'static, str>>,
}

/// The `Display` impl for `SignedHeader` formats it as an `Authorization` header for an HTTP
/// request.
impl fmt::Display for SignedHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // authorization scheme
        write!(f, "OAuth ")?;

        // authorization data

        let mut first = true;
        for (k, v) in &self.params {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }

            write!(f, "{}=\"{}\"", k, percent_encode(v))?;
        }

        Ok(())
    }
}

/// Assemble a signed GET request to the given URL with the given parameters.
///
/// The given parameters, if present, will be appended to the given `uri` as a percent-encoded
/// query string, and will also be used to create the OAuth signature.
pub fn get(uri: &str, token: &Token, params: Option<&ParamList>) -> Result<Request<Body>> {
    let mut request = RequestBuilder::new(Method::GET, uri);
    if let Some(params) = params {
        request = request.with_query_params(params);
    }
    request.request_token(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    // https://developer.twitter.com/en/docs/authentication/oauth-1-0a/creating-a-signature
    fn documented_params() -> OAuthParams {
        OAuthParams {
            consumer_key: KeyPair::new(
                "xvz1evFS4wEEPTGEFPHBog",
                "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            ),
            token: KeyPair::new(
                "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
                "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
            ),
            nonce: "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg".to_string(),
            timestamp: 1318622958,
        }
    }

    #[test]
    fn documented_signature() {
        let params = ParamList::new()
            .add_param("include_entities", "true")
            .add_param(
                "status",
                "Hello Ladies + Gentlemen, a signed OAuth request!",
            );
        let header = documented_params()
            .sign_request(
                Method::POST,
                "https://api.twitter.com/1.1/statuses/update.json",
                Some(&params),
            )
            .unwrap();

        assert_eq!(header.params["oauth_signature"], "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn header_format() {
        let header = documented_params()
            .sign_request(Method::GET, "https://api.twitter.com/1.1/trends/available.json", None)
            .unwrap()
            .to_string();

        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\", "));
        assert!(header.contains("oauth_timestamp=\"1318622958\""));
        assert!(header.contains("oauth_signature=\""));
    }

    #[test]
    fn get_builds_query() {
        let token = Token::new(KeyPair::new("ck", "cs"), KeyPair::new("ak", "as"));
        let params = ParamList::new().add_param("id", "455827");
        let req = get("https://api.twitter.com/1.1/trends/place.json", &token, Some(&params))
            .unwrap();

        assert_eq!(req.method(), &Method::GET);
        assert_eq!(
            req.uri().to_string(),
            "https://api.twitter.com/1.1/trends/place.json?id=455827"
        );
        assert!(req.headers()[AUTHORIZATION]
            .to_str()
            .unwrap()
            .starts_with("OAuth "));
    }
}
