// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Wire shapes of the trends endpoints. Every field is optional here; the types in the parent
//! module decide what's required.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::PlaceType;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub name: Option<String>,
    pub parentid: Option<u32>,
    pub place_type: Option<PlaceType>,
    pub woeid: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicData {
    pub name: Option<String>,
    pub query: Option<String>,
    pub url: Option<String>,
    pub tweet_volume: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendLineData {
    pub created_at: Option<DateTime<Utc>>,
    pub as_of: Option<DateTime<Utc>>,
    pub locations: Option<Vec<LocationData>>,
    pub trends: Option<Vec<TopicData>>,
}
