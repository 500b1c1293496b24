// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::trend::Location;

/// Selects the locations that belong to one country.
///
/// A location belongs to the country if its `country` equals the country name, or its
/// `countryCode` equals the country code. Either match is enough. An empty name or code never
/// matches anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryFilter {
    name: String,
    code: String,
}

impl CountryFilter {
    /// Creates a filter for the country with the given name and code, e.g. `"Brazil"` and `"BR"`.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        CountryFilter {
            name: name.into(),
            code: code.into(),
        }
    }

    /// Returns whether the given location belongs to this country.
    pub fn matches(&self, location: &Location) -> bool {
        let by_name = !self.name.is_empty() && location.country == self.name;
        let by_code = !self.code.is_empty() && location.country_code.as_deref() == Some(&*self.code);
        by_name || by_code
    }

    /// Returns the locations that belong to this country, in their original order.
    pub fn filter(&self, locations: &[Location]) -> Vec<Location> {
        locations
            .iter()
            .filter(|loc| self.matches(loc))
            .cloned()
            .collect()
    }
}
