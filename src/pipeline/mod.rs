// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning a country's trend lines into one ranked list of topics.
//!
//! The stages run in this order:
//!
//! 1. [`CountryFilter`] picks the country's locations out of everything Twitter lists.
//! 2. [`collect_trends`] fetches the trend lines of each of those locations.
//! 3. [`normalize`] flattens the lines into one record per topic with a volume.
//! 4. [`rank`] sorts the records by volume.
//! 5. [`group`] merges the records of each topic, listing every place it trended in.
//!
//! [`process`] runs stages 3 to 5 on trend lines that were already collected.
//!
//! [`Pipeline`] strings the stages together with a [`TrendsProvider`] and a [`BlobStore`]. A
//! refresh persists the collected trend lines first and then processes what was persisted, so
//! the processed set can always be rebuilt from the raw one without calling Twitter again.
//!
//! [`CountryFilter`]: struct.CountryFilter.html
//! [`collect_trends`]: fn.collect_trends.html
//! [`normalize`]: fn.normalize.html
//! [`rank`]: fn.rank.html
//! [`group`]: fn.group.html
//! [`process`]: fn.process.html
//! [`Pipeline`]: struct.Pipeline.html
//! [`TrendsProvider`]: ../provider/trait.TrendsProvider.html
//! [`BlobStore`]: ../store/trait.BlobStore.html

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::provider::TrendsProvider;
use crate::store::{self, BlobStore};
use crate::trend::{GroupedTrend, RawTrendLine, TrendSet};

mod collect;
mod filter;
mod group;
mod normalize;
mod rank;

pub use self::collect::collect_trends;
pub use self::filter::CountryFilter;
pub use self::group::group;
pub use self::normalize::normalize;
pub use self::rank::rank;

/// Normalizes, ranks and groups the given trend lines.
pub fn process(lines: &[RawTrendLine]) -> Vec<GroupedTrend> {
    group(rank(normalize(lines)))
}

/// Runs the trend stages against a provider, persisting results in a blob store.
pub struct Pipeline<P, S> {
    provider: P,
    store: S,
    filter: CountryFilter,
    raw_artifact: String,
    clean_artifact: String,
    concurrency: usize,
}

impl<P: TrendsProvider, S: BlobStore> Pipeline<P, S> {
    /// Creates a pipeline with the country, artifact names and concurrency from `config`.
    pub fn new(provider: P, store: S, config: &Config) -> Self {
        Pipeline {
            provider,
            store,
            filter: CountryFilter::new(config.country_name.clone(), config.country_code.clone()),
            raw_artifact: config.raw_artifact.clone(),
            clean_artifact: config.clean_artifact.clone(),
            concurrency: config.max_concurrent_fetches,
        }
    }

    /// The store this pipeline persists to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists the provider's locations, keeps the country's, and fetches their trend lines.
    ///
    /// Failing to list locations fails the run. Failing to fetch one location only skips it.
    pub async fn collect(&self) -> Result<Vec<RawTrendLine>> {
        let all = self.provider.list_locations().await?;
        let locations = self.filter.filter(&all);
        info!(
            available = all.len(),
            selected = locations.len(),
            "selected trend locations"
        );

        let lines = collect_trends(&self.provider, &locations, self.concurrency).await;
        info!(lines = lines.len(), "collected trend lines");
        Ok(lines)
    }

    /// Collects fresh trend lines, persists them, then rebuilds and persists the grouped set.
    pub async fn refresh(&self) -> Result<TrendSet<GroupedTrend>> {
        let lines = self.collect().await?;
        store::write_as(&self.store, &self.raw_artifact, &lines)?;
        self.rebuild_from_raw()
    }

    /// Rebuilds and persists the grouped set from the persisted trend lines, without calling the
    /// provider.
    pub fn rebuild_from_raw(&self) -> Result<TrendSet<GroupedTrend>> {
        let lines: Vec<RawTrendLine> = store::read_as(&self.store, &self.raw_artifact)?;
        let trends = TrendSet::new(process(&lines));
        store::write_as(&self.store, &self.clean_artifact, &trends)?;
        info!(trends = trends.len(), artifact = %self.clean_artifact, "stored grouped trends");
        Ok(trends)
    }

    /// Loads the persisted grouped set, refreshing it if there is none.
    ///
    /// A persisted set that can't be parsed is logged and treated as missing.
    pub async fn load_or_refresh(&self) -> Result<TrendSet<GroupedTrend>> {
        match store::read_as(&self.store, &self.clean_artifact) {
            Ok(trends) => Ok(trends),
            Err(Error::MissingArtifact(_)) => {
                info!(artifact = %self.clean_artifact, "no stored trends, fetching");
                self.refresh().await
            }
            Err(Error::DeserializeError(e)) => {
                warn!(artifact = %self.clean_artifact, error = %e, "stored trends are unreadable, fetching");
                self.refresh().await
            }
            Err(e) => Err(e),
        }
    }
}
