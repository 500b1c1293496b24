// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and functions for working with trending topics in Twitter.
//!
//! Twitter groups its trending topics by place, where each place is named by a WOEID ("Where On
//! Earth ID"). The `available` call lists every place with trend information, and the `place`
//! call returns the trends for one of them.
//!
//! ## Types
//!
//! - `Location`: a place with trend information, as listed by `available`
//! - `PlaceType`: a member in `Location`, which includes the code and related name to specify
//!   the kind of place
//! - `RawTrendLine`: the trends for one place at one point in time, as returned by `place`
//! - `RawTopic`: one trending topic inside a `RawTrendLine`
//! - `CanonicalTrend`: a topic with a measured volume, flattened together with when and where it
//!   was seen
//! - `GroupedTrend`: every sighting of one topic merged into a single record
//! - `TrendSet`: the `{"trends": [...]}` wrapper that gets written to the blob store
//!
//! Twitter's responses are validated on the way in: a location without a name or WOEID, a trend
//! line without a timestamp or location, or a topic without a name or query never makes it into
//! these types.

use std::convert::TryFrom;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Error;

mod fun;
mod raw;

pub use self::fun::*;

///Represents a place that Twitter has trending topic information for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", try_from = "raw::LocationData")]
pub struct Location {
    ///The location with trending topic information.
    pub name: String,
    ///The country of the location. Empty when Twitter didn't say, which is the case for the
    ///locations embedded in a trend line.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    ///Short alphabetic or numeric geographical codes developed to represent countries and
    ///dependent areas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    ///The "where on earth identifier"
    pub woeid: u32,
    ///The woeid of the parent place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parentid: Option<u32>,
    ///The code and related name to specify the kind of location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_type: Option<PlaceType>,
}

impl Location {
    ///Creates a bare location with the given name and WOEID, like the ones Twitter embeds in a
    ///trend line.
    pub fn new(name: impl Into<String>, woeid: u32) -> Location {
        Location {
            name: name.into(),
            country: String::new(),
            country_code: None,
            woeid,
            parentid: None,
            place_type: None,
        }
    }

    ///Sets the country name and code of this location.
    pub fn in_country(self, country: impl Into<String>, country_code: impl Into<String>) -> Location {
        Location {
            country: country.into(),
            country_code: Some(country_code.into()),
            ..self
        }
    }
}

impl TryFrom<raw::LocationData> for Location {
    type Error = Error;

    fn try_from(raw: raw::LocationData) -> Result<Location, Error> {
        Ok(Location {
            name: raw.name.ok_or(Error::MalformedPayload("location name"))?,
            country: raw.country.unwrap_or_default(),
            country_code: raw.country_code.filter(|code| !code.is_empty()),
            woeid: raw.woeid.ok_or(Error::MalformedPayload("location woeid"))?,
            parentid: raw.parentid,
            place_type: raw.place_type,
        })
    }
}

///The code and related name to specify the kind of location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlaceType {
    ///The code of the location type
    pub code: u32,
    ///The name of the location type
    pub name: String,
}

///A single trending topic, as Twitter reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTopic {
    ///The display name of the topic, e.g. a hashtag.
    pub name: String,
    ///The search query for the topic, already percent-encoded by Twitter.
    pub query: String,
    ///The link to a search for this topic on twitter.com.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    ///The approximate number of tweets about this topic in the last 24 hours. `None` when Twitter
    ///has no measurable volume for it.
    pub tweet_volume: Option<u64>,
}

impl TryFrom<raw::TopicData> for RawTopic {
    type Error = Error;

    fn try_from(raw: raw::TopicData) -> Result<RawTopic, Error> {
        let tweet_volume = match raw.tweet_volume {
            Some(vol) if vol < 0 => return Err(Error::MalformedPayload("topic tweet_volume")),
            vol => vol.map(|vol| vol as u64),
        };

        Ok(RawTopic {
            name: raw.name.ok_or(Error::MalformedPayload("topic name"))?,
            query: raw.query.ok_or(Error::MalformedPayload("topic query"))?,
            url: raw.url,
            tweet_volume,
        })
    }
}

///The trending topics for one place at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "raw::TrendLineData")]
pub struct RawTrendLine {
    ///When Twitter computed this set of trends.
    pub created_at: DateTime<Utc>,
    ///The timestamp Twitter reports the trends are current as of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<DateTime<Utc>>,
    ///The place these trends were fetched for. Never empty.
    pub locations: Vec<Location>,
    ///The trending topics, in Twitter's order.
    pub trends: Vec<RawTopic>,
}

impl TryFrom<raw::TrendLineData> for RawTrendLine {
    type Error = Error;

    fn try_from(raw: raw::TrendLineData) -> Result<RawTrendLine, Error> {
        let created_at = raw.created_at.ok_or(Error::MalformedPayload("trend line created_at"))?;
        let locations = raw
            .locations
            .ok_or(Error::MalformedPayload("trend line locations"))?
            .into_iter()
            .map(Location::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        if locations.is_empty() {
            return Err(Error::MalformedPayload("trend line locations"));
        }

        let trends = raw
            .trends
            .ok_or(Error::MalformedPayload("trend line trends"))?
            .into_iter()
            .filter_map(|topic| match RawTopic::try_from(topic) {
                Ok(topic) => Some(topic),
                Err(e) => {
                    warn!(location = %locations[0].name, error = %e, "dropping malformed topic");
                    None
                }
            })
            .collect();

        Ok(RawTrendLine {
            created_at,
            as_of: raw.as_of,
            locations,
            trends,
        })
    }
}

///A trending topic with a measured volume, together with when and where it was seen.
///
///Topics without a volume never become a `CanonicalTrend`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CanonicalTrend {
    ///The display name of the topic.
    pub name: String,
    ///The search query for the topic.
    pub query: String,
    ///The approximate number of tweets about this topic.
    pub tweet_volume: u64,
    ///When the trend line this topic came from was computed.
    pub fetched_at: DateTime<Utc>,
    ///The locations of the trend line this topic came from. The first one is the place the line
    ///was fetched for.
    pub trend_locations: Vec<Location>,
}

///Every sighting of one topic, merged into a single record.
///
///The name, query, volume and timestamp are those of the first sighting in ranked order, which
///is the one with the highest volume. `trend_locations` lists each place the topic was seen in,
///once.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GroupedTrend {
    ///The display name of the topic.
    pub name: String,
    ///The search query for the topic.
    pub query: String,
    ///The approximate number of tweets about this topic at its highest-volume sighting.
    pub tweet_volume: u64,
    ///When the highest-volume sighting was computed.
    pub fetched_at: DateTime<Utc>,
    ///Each place this topic was trending in.
    pub trend_locations: Vec<Location>,
}

impl GroupedTrend {
    ///Creates a `GroupedTrend` with the scalar fields of the given trend and the given list of
    ///locations.
    pub fn from_representative(trend: CanonicalTrend, trend_locations: Vec<Location>) -> Self {
        GroupedTrend {
            name: trend.name,
            query: trend.query,
            tweet_volume: trend.tweet_volume,
            fetched_at: trend.fetched_at,
            trend_locations,
        }
    }
}

///The persisted shape of a list of trends: `{"trends": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrendSet<T> {
    ///The trends, in rank order.
    pub trends: Vec<T>,
}

impl<T> TrendSet<T> {
    ///Wraps the given list of trends.
    pub fn new(trends: Vec<T>) -> Self {
        TrendSet { trends }
    }

    ///Returns the number of trends in this set.
    pub fn len(&self) -> usize {
        self.trends.len()
    }

    ///Returns whether this set has no trends.
    pub fn is_empty(&self) -> bool {
        self.trends.is_empty()
    }
}

/// Validates each location of a `trends/available` response, dropping and logging the ones
/// that are missing a name or WOEID.
pub(crate) fn locations_from_json(values: Vec<serde_json::Value>) -> Vec<Location> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Location>(value) {
            Ok(loc) => Some(loc),
            Err(e) => {
                warn!(error = %e, "dropping malformed location");
                None
            }
        })
        .collect()
}

/// Validates each trend line of a `trends/place` response, dropping and logging the ones that
/// are malformed.
pub(crate) fn lines_from_json(woeid: u32, values: Vec<serde_json::Value>) -> Vec<RawTrendLine> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawTrendLine>(value) {
            Ok(line) => Some(line),
            Err(e) => {
                warn!(woeid, error = %e, "dropping malformed trend line");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tests::load_file;

    #[test]
    fn parse_available() {
        let content = load_file("sample_payloads/trends_available.json");
        let values: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
        let locations = locations_from_json(values);

        // one entry in the sample has no woeid
        assert_eq!(locations.len(), 6);

        let worldwide = &locations[0];
        assert_eq!(worldwide.name, "Worldwide");
        assert_eq!(worldwide.country, "");
        assert_eq!(worldwide.country_code, None);

        let sao_paulo = locations.iter().find(|l| l.woeid == 455827).unwrap();
        assert_eq!(sao_paulo.name, "São Paulo");
        assert_eq!(sao_paulo.country, "Brazil");
        assert_eq!(sao_paulo.country_code.as_deref(), Some("BR"));
        assert_eq!(sao_paulo.parentid, Some(23424768));
        assert_eq!(
            sao_paulo.place_type,
            Some(PlaceType {
                code: 7,
                name: "Town".to_string()
            })
        );
    }

    #[test]
    fn parse_place() {
        let content = load_file("sample_payloads/trends_place.json");
        let values: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
        let lines = lines_from_json(455827, values);

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.created_at.to_rfc3339(), "2020-05-10T13:21:45+00:00");
        assert_eq!(line.locations, vec![Location::new("São Paulo", 455827)]);

        // the topic without a query is dropped, the one without a volume is kept
        assert_eq!(line.trends.len(), 3);
        assert_eq!(line.trends[0].name, "#BBB20");
        assert_eq!(line.trends[0].tweet_volume, Some(254301));
        assert_eq!(line.trends[2].name, "Bolsonaro");
        assert_eq!(line.trends[2].tweet_volume, None);
    }

    #[test]
    fn line_without_location_is_malformed() {
        let value = serde_json::json!({
            "created_at": "2020-05-10T13:21:45Z",
            "locations": [],
            "trends": [],
        });
        assert!(serde_json::from_value::<RawTrendLine>(value.clone()).is_err());
        assert!(lines_from_json(1, vec![value]).is_empty());
    }

    #[test]
    fn negative_volume_is_malformed() {
        let topic = raw::TopicData {
            name: Some("x".into()),
            query: Some("x".into()),
            url: None,
            tweet_volume: Some(-3),
        };
        assert!(RawTopic::try_from(topic).is_err());
    }

    #[test]
    fn raw_line_round_trips_through_storage() {
        let line = RawTrendLine {
            created_at: "2020-05-10T13:21:45Z".parse().unwrap(),
            as_of: None,
            locations: vec![Location::new("Rio de Janeiro", 455825)],
            trends: vec![RawTopic {
                name: "Flamengo".into(),
                query: "Flamengo".into(),
                url: None,
                tweet_volume: None,
            }],
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["trends"][0]["tweet_volume"], serde_json::Value::Null);
        assert_eq!(json["created_at"], "2020-05-10T13:21:45Z");

        let back: RawTrendLine = serde_json::from_value(json).unwrap();
        assert_eq!(back, line);
    }

    #[test]
    fn location_serializes_like_twitter() {
        let loc = Location::new("Recife", 455824).in_country("Brazil", "BR");
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Recife",
                "country": "Brazil",
                "countryCode": "BR",
                "woeid": 455824,
            })
        );
    }
}
