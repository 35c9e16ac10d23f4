use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, PickFirst};

use crate::{
    common::{Amount, Client},
    prices::{LookupError, PriceLookup},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupFilter<'a> {
    market_item_id: &'a str,
    region: &'a str,
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    filter: LookupFilter<'a>,
}

#[serde_as]
#[derive(Deserialize)]
struct Listing {
    #[serde_as(as = "PickFirst<(_, Amount)>")]
    price: f64,
}

/// Marketplace listings served by the price-lookup endpoint, one storefront region at a time.
pub struct AmazonLookup {
    client: Client,
    url: String,
}

impl AmazonLookup {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

/// The first listing's price, if the body holds any listing at all.
///
/// `null`, `[]` and `{}`-style bodies all mean "no quote"; anything else that
/// isn't a list of priced listings is malformed.
pub(crate) fn first_listing_price(body: &[u8]) -> Result<f64, LookupError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    let listings = match value {
        serde_json::Value::Null => return Err(LookupError::Empty),
        serde_json::Value::Object(ref map) if map.is_empty() => return Err(LookupError::Empty),
        other => serde_json::from_value::<Vec<serde_json::Value>>(other)?,
    };
    let first = listings.into_iter().next().ok_or(LookupError::Empty)?;
    Ok(serde_json::from_value::<Listing>(first)?.price)
}

#[async_trait]
impl PriceLookup for AmazonLookup {
    async fn lookup(&self, market_item_id: &str, region: &str) -> Result<f64, LookupError> {
        let res = self
            .client
            .0
            .post(&self.url)
            .json(&LookupRequest {
                filter: LookupFilter {
                    market_item_id,
                    region,
                },
            })
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(LookupError::Status(res.status().as_u16()));
        }
        let body = res.bytes().await?;
        first_listing_price(&body)
    }
}
