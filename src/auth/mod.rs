// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Types and functions for signing calls to Twitter.
//!
//! Every call to the trends API is signed with OAuth 1.0a, using two pairs of keys: the
//! "consumer" key pair that identifies the app, and the "access" key pair that identifies the
//! user account the app is acting on behalf of. Both pairs are handed out on the Twitter
//! developer portal and are supplied from the command line.
//!
//! The pairs are bundled together in a [`Token`], which is passed explicitly to every call that
//! talks to Twitter. Nothing in this crate keeps credentials in global state.
//!
//! [`Token`]: struct.Token.html

use std::borrow::Cow;
use std::fmt;

pub(crate) mod raw;

/// A key/secret pair representing an OAuth token.
///
/// This struct is used as part of the signing process for calls to Twitter: it holds either the
/// app's consumer key and secret, or the user's access token and secret.
#[derive(Clone)]
pub struct KeyPair {
    ///A key used to identify an application or user.
    pub key: Cow<'static, str>,
    ///A private key used to sign messages from an application or user.
    pub secret: Cow<'static, str>,
}

impl KeyPair {
    ///Creates a KeyPair with the given key and secret.
    ///
    ///This can be called with either `&'static str` (a string literal) or `String` for either
    ///parameter.
    pub fn new<K, S>(key: K, secret: S) -> KeyPair
    where
        K: Into<Cow<'static, str>>,
        S: Into<Cow<'static, str>>,
    {
        KeyPair {
            key: key.into(),
            secret: secret.into(),
        }
    }

    ///Returns whether either half of this pair is empty.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() || self.secret.is_empty()
    }
}

// secrets stay out of logs
impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// The credentials used to sign every call to Twitter.
///
/// This is the four-string credential tuple: the app's consumer key/secret and the user's access
/// token/secret. It's only ever read while signing a request.
#[derive(Debug, Clone)]
pub struct Token {
    ///A `KeyPair` representing the application.
    pub consumer: KeyPair,
    ///A `KeyPair` representing the user's access token.
    pub access: KeyPair,
}

impl Token {
    ///Bundles the given consumer and access key pairs into a `Token`.
    pub fn new(consumer: KeyPair, access: KeyPair) -> Token {
        Token { consumer, access }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_secrets() {
        let token = Token::new(
            KeyPair::new("consumer-key", "consumer-secret"),
            KeyPair::new("access-key", "access-secret"),
        );
        let printed = format!("{:?}", token);
        assert!(printed.contains("consumer-key"));
        assert!(!printed.contains("consumer-secret"));
        assert!(!printed.contains("access-secret"));
    }

    #[test]
    fn empty_pairs() {
        assert!(KeyPair::new("", "secret").is_empty());
        assert!(!KeyPair::new(String::from("key"), "secret").is_empty());
    }
}
