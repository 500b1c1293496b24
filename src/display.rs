// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Text rendering of a grouped trend set.

use std::fmt;

use crate::trend::GroupedTrend;

/// Renders grouped trends as a numbered list, one entry per topic, each followed by a blank line.
///
/// ```
/// use trend_harvest::display::TrendReport;
///
/// assert_eq!(TrendReport(&[]).to_string(), "No trending topics found.\n");
/// ```
pub struct TrendReport<'a>(pub &'a [GroupedTrend]);

impl<'a> fmt::Display for TrendReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No trending topics found.");
        }

        for (idx, trend) in self.0.iter().enumerate() {
            let places = trend
                .trend_locations
                .iter()
                .map(|loc| loc.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                f,
                "{}* {} - {} tweets on {} in the following locations: {}",
                idx,
                trend.name,
                trend.tweet_volume,
                trend.fetched_at.to_rfc3339(),
                places
            )?;
            writeln!(f)?;
        }

        Ok(())
    }
}
