// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use url::Url;

use crate::common::*;
use crate::error::{Error, Result};
use crate::trend::{Location, RawTrendLine};
use crate::{auth, links};

fn endpoint(base: &Url, path: &'static str) -> Result<String> {
    base.join(path)
        .map(String::from)
        .map_err(|e| Error::InvalidConfig(format!("cannot join {} onto {}: {}", path, base, e)))
}

///Returns the locations that Twitter has trending topic information for.
///
///Locations missing a name or WOEID are dropped and logged.
pub async fn available(base: &Url, token: &auth::Token) -> Result<Response<Vec<Location>>> {
    let req = get(&endpoint(base, links::trend::AVAILABLE)?, token, None)?;
    let resp = request_with_json_response::<Vec<serde_json::Value>>(req).await?;
    Ok(Response::map(resp, super::locations_from_json))
}

///Returns the trending topics for the location with the given WOEID.
///
///Twitter answers with a list of trend lines, usually exactly one. Malformed lines are dropped
///and logged.
pub async fn place(
    base: &Url,
    woeid: u32,
    token: &auth::Token,
) -> Result<Response<Vec<RawTrendLine>>> {
    let params = ParamList::new().add_param("id", woeid.to_string());
    let req = get(&endpoint(base, links::trend::PLACE)?, token, Some(&params))?;
    let resp = request_with_json_response::<Vec<serde_json::Value>>(req).await?;
    Ok(Response::map(resp, |values| super::lines_from_json(woeid, values)))
}
