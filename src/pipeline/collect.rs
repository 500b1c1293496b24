// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::provider::TrendsProvider;
use crate::trend::{Location, RawTrendLine};

/// Fetches the trend lines of every given location and concatenates them, in location order.
///
/// A location whose fetch fails is logged and skipped; if every fetch fails the result is empty.
/// Up to `concurrency` fetches run at the same time, but results always come back in the order
/// of `locations`.
///
/// Twitter only reports the name and WOEID of the place inside a trend line, so any line location
/// with the WOEID that was asked for is replaced with the full requested `Location`.
pub async fn collect_trends(
    provider: &dyn TrendsProvider,
    locations: &[Location],
    concurrency: usize,
) -> Vec<RawTrendLine> {
    let fetches = locations.iter().map(|location| async move {
        let result = provider.fetch_trends_for(location.woeid).await;
        (location, result)
    });

    let results = stream::iter(fetches)
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    let mut lines = Vec::new();
    for (location, result) in results {
        match result {
            Ok(fetched) => {
                debug!(woeid = location.woeid, location = %location.name, lines = fetched.len(), "fetched trends");
                lines.extend(fetched.into_iter().map(|line| backfill(line, location)));
            }
            Err(e) => {
                warn!(
                    woeid = location.woeid,
                    location = %location.name,
                    status = ?e.status(),
                    transport = e.is_transport(),
                    error = %e,
                    "skipping location, could not fetch its trends"
                );
            }
        }
    }

    lines
}

fn backfill(mut line: RawTrendLine, requested: &Location) -> RawTrendLine {
    for loc in line.locations.iter_mut() {
        if loc.woeid == requested.woeid {
            *loc = requested.clone();
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{line, StubProvider};
    use crate::trend::Location;

    fn places() -> Vec<Location> {
        vec![
            Location::new("São Paulo", 455827).in_country("Brazil", "BR"),
            Location::new("Rio de Janeiro", 455825).in_country("Brazil", "BR"),
            Location::new("Recife", 455824).in_country("Brazil", "BR"),
        ]
    }

    fn provider() -> StubProvider {
        StubProvider::new(places())
            .with_line(line(455827, "São Paulo", &[("#BBB20", Some(300))]))
            .with_line(line(455825, "Rio de Janeiro", &[("Flamengo", Some(100))]))
            .with_line(line(455824, "Recife", &[("Sport", None)]))
    }

    #[tokio::test]
    async fn keeps_location_order() {
        let lines = collect_trends(&provider(), &places(), 1).await;
        let woeids: Vec<u32> = lines.iter().map(|l| l.locations[0].woeid).collect();
        assert_eq!(woeids, vec![455827, 455825, 455824]);
    }

    #[tokio::test]
    async fn concurrent_fetches_keep_location_order() {
        let provider = provider().with_delay(455827, 30);
        let lines = collect_trends(&provider, &places(), 3).await;
        let woeids: Vec<u32> = lines.iter().map(|l| l.locations[0].woeid).collect();
        assert_eq!(woeids, vec![455827, 455825, 455824]);
    }

    #[tokio::test]
    async fn failed_location_is_skipped() {
        let provider = provider().failing(455825);
        let lines = collect_trends(&provider, &places(), 1).await;
        let woeids: Vec<u32> = lines.iter().map(|l| l.locations[0].woeid).collect();
        assert_eq!(woeids, vec![455827, 455824]);
    }

    #[tokio::test]
    async fn timed_out_location_is_skipped() {
        let provider = provider().hanging(455827);
        let lines = collect_trends(&provider, &places(), 1).await;
        let woeids: Vec<u32> = lines.iter().map(|l| l.locations[0].woeid).collect();
        assert_eq!(woeids, vec![455825, 455824]);
    }

    #[tokio::test]
    async fn timed_out_location_is_skipped_when_concurrent() {
        let provider = provider().hanging(455825);
        let lines = collect_trends(&provider, &places(), 3).await;
        let woeids: Vec<u32> = lines.iter().map(|l| l.locations[0].woeid).collect();
        assert_eq!(woeids, vec![455827, 455824]);
    }

    #[tokio::test]
    async fn all_failed_is_empty() {
        let provider = StubProvider::new(places());
        assert!(collect_trends(&provider, &places(), 2).await.is_empty());
    }

    #[tokio::test]
    async fn line_locations_are_backfilled() {
        let lines = collect_trends(&provider(), &places(), 1).await;
        assert_eq!(lines[0].locations[0].country, "Brazil");
        assert_eq!(lines[0].locations[0].country_code.as_deref(), Some("BR"));
    }
}
