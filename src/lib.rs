// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A collector for one country's Twitter trending topics.
//!
//! This library asks Twitter which places have trend information, keeps the ones inside a single
//! country, fetches the trends for each of them, and boils the result down to one ranked list:
//! topics without a tweet volume are dropped, the rest are sorted by volume, and every sighting of
//! the same topic is merged into one record listing all the places it trended in.
//!
//! # Getting started
//!
//! Every call to Twitter is signed with a [`Token`], built from the app's consumer key pair and
//! the user's access key pair:
//!
//! ```rust
//! let token = trend_harvest::Token::new(
//!     trend_harvest::KeyPair::new("consumer key", "consumer secret"),
//!     trend_harvest::KeyPair::new("access token", "access token secret"),
//! );
//! ```
//!
//! The token goes into a [`TwitterProvider`], which together with a blob store and a [`Config`]
//! makes a [`Pipeline`]:
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> trend_harvest::error::Result<()> {
//! # let token: trend_harvest::Token = unimplemented!();
//! use trend_harvest::{Config, FileStore, Pipeline, TwitterProvider};
//!
//! let config = Config::default();
//! let provider = TwitterProvider::new(config.api_base.clone(), token, config.request_timeout());
//! let pipeline = Pipeline::new(provider, FileStore::new(&config.data_dir), &config);
//!
//! let trends = pipeline.load_or_refresh().await?;
//! for trend in &trends.trends {
//!     println!("{} ({} tweets)", trend.name, trend.tweet_volume);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`Token`]: auth/struct.Token.html
//! [`TwitterProvider`]: provider/struct.TwitterProvider.html
//! [`Config`]: config/struct.Config.html
//! [`Pipeline`]: pipeline/struct.Pipeline.html

#![warn(missing_docs)]
#![warn(unused_qualifications)]

mod common;
pub mod auth;
pub mod config;
pub mod display;
pub mod error;
mod links;
pub mod pipeline;
pub mod provider;
pub mod store;
pub mod trend;

pub use crate::auth::{KeyPair, Token};
pub use crate::common::{RateLimit, Response};
pub use crate::config::Config;
pub use crate::pipeline::Pipeline;
pub use crate::provider::{TrendsProvider, TwitterProvider};
pub use crate::store::{BlobStore, FileStore, MemoryStore};
