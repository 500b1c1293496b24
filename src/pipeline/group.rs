// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use crate::trend::{CanonicalTrend, GroupedTrend, Location};

/// Merges trends that share a name into one `GroupedTrend` each.
///
/// Groups come out in the order their names are first seen, and are not re-ranked. Each group
/// keeps the name, query, volume and timestamp of its first member; when the input is ranked,
/// that's the member with the highest volume.
///
/// The group's locations are the first location of each member, skipping any location that is
/// already listed. A location counts as already listed if a listed location has the same name
/// *or* the same WOEID, so two distinct places that share a display name are merged.
pub fn group(trends: Vec<CanonicalTrend>) -> Vec<GroupedTrend> {
    let mut groups: Vec<Vec<CanonicalTrend>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for trend in trends {
        match index.get(&trend.name) {
            Some(&idx) => groups[idx].push(trend),
            None => {
                index.insert(trend.name.clone(), groups.len());
                groups.push(vec![trend]);
            }
        }
    }

    groups.into_iter().filter_map(merge).collect()
}

fn merge(members: Vec<CanonicalTrend>) -> Option<GroupedTrend> {
    let mut locations: Vec<Location> = Vec::new();
    for member in &members {
        if let Some(candidate) = member.trend_locations.first() {
            if !already_listed(candidate, &locations) {
                locations.push(candidate.clone());
            }
        }
    }

    let representative = members.into_iter().next()?;
    Some(GroupedTrend::from_representative(representative, locations))
}

fn already_listed(candidate: &Location, listed: &[Location]) -> bool {
    listed
        .iter()
        .any(|loc| loc.name == candidate.name || loc.woeid == candidate.woeid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::canonical;
    use std::collections::HashSet;

    #[test]
    fn one_record_per_name_in_first_seen_order() {
        let grouped = group(vec![
            canonical("Foo", 100, 1),
            canonical("Bar", 90, 1),
            canonical("Foo", 50, 2),
            canonical("Baz", 10, 3),
            canonical("Bar", 5, 3),
        ]);

        let names: Vec<&str> = grouped.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Foo", "Bar", "Baz"]);
    }

    #[test]
    fn first_member_is_representative() {
        let mut later = canonical("Foo", 50, 2);
        later.query = "other".into();
        later.fetched_at = "2020-05-11T00:00:00Z".parse().unwrap();

        let first = canonical("Foo", 100, 1);
        let grouped = group(vec![first.clone(), later]);

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].tweet_volume, 100);
        assert_eq!(grouped[0].query, first.query);
        assert_eq!(grouped[0].fetched_at, first.fetched_at);
        let woeids: Vec<u32> = grouped[0].trend_locations.iter().map(|l| l.woeid).collect();
        assert_eq!(woeids, vec![1, 2]);
    }

    #[test]
    fn names_are_case_sensitive() {
        let grouped = group(vec![canonical("foo", 2, 1), canonical("Foo", 1, 2)]);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn duplicate_location_listed_once() {
        let grouped = group(vec![
            canonical("Foo", 30, 1),
            canonical("Foo", 20, 1),
            canonical("Foo", 10, 2),
        ]);
        let woeids: Vec<u32> = grouped[0].trend_locations.iter().map(|l| l.woeid).collect();
        assert_eq!(woeids, vec![1, 2]);
    }

    #[test]
    fn same_name_different_woeid_is_merged() {
        let mut a = canonical("Foo", 30, 1);
        a.trend_locations = vec![Location::new("Santa Maria", 100)];
        let mut b = canonical("Foo", 20, 2);
        b.trend_locations = vec![Location::new("Santa Maria", 200)];

        let grouped = group(vec![a, b]);
        assert_eq!(grouped[0].trend_locations, vec![Location::new("Santa Maria", 100)]);
    }

    #[test]
    fn same_woeid_different_name_is_merged() {
        let mut a = canonical("Foo", 30, 1);
        a.trend_locations = vec![Location::new("Sao Paulo", 455827)];
        let mut b = canonical("Foo", 20, 2);
        b.trend_locations = vec![Location::new("São Paulo", 455827)];

        let grouped = group(vec![a, b]);
        assert_eq!(grouped[0].trend_locations.len(), 1);
        assert_eq!(grouped[0].trend_locations[0].name, "Sao Paulo");
    }

    #[test]
    fn only_first_location_of_each_member_counts() {
        let mut a = canonical("Foo", 30, 1);
        a.trend_locations.push(Location::new("Elsewhere", 99));

        let grouped = group(vec![a]);
        assert_eq!(grouped[0].trend_locations.len(), 1);
        assert_eq!(grouped[0].trend_locations[0].woeid, 1);
    }

    #[test]
    fn location_counts_are_bounded_by_members() {
        let input = vec![
            canonical("A", 9, 1),
            canonical("B", 8, 1),
            canonical("A", 7, 2),
            canonical("A", 6, 2),
            canonical("C", 5, 3),
            canonical("B", 4, 4),
        ];
        let distinct: HashSet<&str> = input.iter().map(|t| t.name.as_str()).collect();
        let grouped = group(input.clone());

        assert_eq!(grouped.len(), distinct.len());
        for g in &grouped {
            let members = input.iter().filter(|t| t.name == g.name).count();
            assert!(!g.trend_locations.is_empty());
            assert!(g.trend_locations.len() <= members);
        }
    }

    #[test]
    fn empty() {
        assert!(group(Vec::new()).is_empty());
    }
}
