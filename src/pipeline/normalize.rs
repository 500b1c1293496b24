// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::trend::{CanonicalTrend, RawTrendLine};

/// Flattens trend lines into one `CanonicalTrend` per topic that has a volume.
///
/// Topics come out in line order, then in topic order within each line. Each carries the
/// timestamp and locations of the line it came from. Topics without a volume are dropped.
pub fn normalize(lines: &[RawTrendLine]) -> Vec<CanonicalTrend> {
    lines
        .iter()
        .flat_map(|line| {
            line.trends.iter().filter_map(move |topic| {
                topic.tweet_volume.map(|tweet_volume| CanonicalTrend {
                    name: topic.name.clone(),
                    query: topic.query.clone(),
                    tweet_volume,
                    fetched_at: line.created_at,
                    trend_locations: line.locations.clone(),
                })
            })
        })
        .collect()
}
