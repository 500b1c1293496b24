// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Set of structs and methods that act as a sort of internal prelude.
//!
//! The elements available in this module and its children are fairly basic building blocks that
//! the other modules all glob-import to make available as a common language.
//!
//! # Module contents
//!
//! ## Type Aliases
//!
//! * `hyper::header::HeaderMap<hyper::header::HeaderValue>` (re-exported as the alias `Headers`)
//!
//! ## `ParamList`
//!
//! `ParamList` is a wrapper around a map of parameters to a given web call. It's consumed in the
//! auth module, where the parameters become both the query string and part of the OAuth
//! signature.
//!
//! ## Authentication functions
//!
//! The function `get` is re-exported here to keep people from having to qualify it from
//! `auth::raw`.
//!
//! ## `Response`
//!
//! In its own module, `Response` is a structure that carries rate-limit information from Twitter
//! alongside the decoded output. The module also contains the functions that all web calls go
//! through: `raw_request` loads the call and checks for errors, and `request_with_json_response`
//! deserializes the body on top of that.

use std::borrow::Cow;
use std::collections::HashMap;

use hyper::header::{HeaderMap, HeaderValue};
use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode};

mod response;

pub use crate::auth::raw::get;

pub use crate::common::response::*;

/// A set of headers returned with a response.
pub type Headers = HeaderMap<HeaderValue>;

/// Represents a list of parameters to a Twitter API call.
///
/// This type is a wrapper around a `HashMap<Cow<'static, str>, Cow<'static, str>>` to collect a
/// set of parameter key/value pairs. These are then used to assemble and sign a Twitter API
/// request. All the functions that add parameters accept `impl Into<Cow<'static, str>>`, so
/// either a string literal or an owned `String` may be used.
#[derive(Debug, Clone, Default, derive_more::Deref, derive_more::DerefMut)]
pub struct ParamList(HashMap<Cow<'static, str>, Cow<'static, str>>);

impl ParamList {
    /// Creates a new, empty `ParamList`.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Adds the given key/value parameter to this `ParamList`.
    pub fn add_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    /// Renders this `ParamList` as an `application/x-www-form-urlencoded` string.
    ///
    /// The key/value pairs are printed as `key1=value1&key2=value2`, sorted by key so that the
    /// same parameters always render the same way, with all keys and values percent-encoded
    /// according to Twitter's requirements.
    pub fn to_urlencoded(&self) -> String {
        let mut pairs = self
            .0
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>();
        pairs.sort();
        pairs.join("&")
    }
}

/// Percent-encodes the given string based on the Twitter API specification.
///
/// Twitter bases its encoding scheme on RFC 3986, Section 2.1: every *byte* that is not an ASCII
/// number or letter, or the ASCII characters `-`, `.`, `_`, or `~` must be replaced with a
/// percent sign (`%`) and the byte value in hexadecimal.
pub fn percent_encode(src: &str) -> PercentEncode {
    lazy_static::lazy_static! {
        static ref ENCODER: AsciiSet = percent_encoding::NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');
    }
    utf8_percent_encode(src, &*ENCODER)
}
