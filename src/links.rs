// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Endpoint paths, relative to the configured API base URL.

pub mod trend {
    pub const AVAILABLE: &str = "trends/available.json";
    pub const PLACE: &str = "trends/place.json";
}
