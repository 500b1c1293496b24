// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::cmp::Reverse;

use crate::trend::CanonicalTrend;

/// Sorts trends by volume, highest first. The sort is stable: trends with equal volume keep their
/// relative order.
pub fn rank(mut trends: Vec<CanonicalTrend>) -> Vec<CanonicalTrend> {
    trends.sort_by_key(|trend| Reverse(trend.tweet_volume));
    trends
}
