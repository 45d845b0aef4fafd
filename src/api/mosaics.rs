//! Mosaic metadata endpoints.

use log::debug;
use serde_json::Value;

use super::types::MosaicCollection;
use super::{collection_page, page_query};
use crate::client::Atlas;
use crate::errors::Error;
use crate::http::RequestInput;
use crate::page::Page;
use crate::urls;

/// Gets metadata for a single mosaic.
#[tracing::instrument(skip(atlas))]
pub async fn get(atlas: &Atlas, mosaic_id: &str) -> Result<Value, Error> {
    let url = urls::join(atlas.api_url(), &["mosaics", mosaic_id]);
    debug!("Fetching mosaic metadata from {}...", url);

    let response = atlas.request(RequestInput::new(url)).await?;
    response.json()
}

/// Searches mosaics, returning the first page.
#[tracing::instrument(skip(atlas, query))]
pub async fn search(atlas: &Atlas, query: &[(&str, &str)]) -> Result<Page<Value>, Error> {
    let url = urls::join(atlas.api_url(), &["mosaics", ""]);
    debug!("Searching mosaics at {}...", url);

    let mut input = RequestInput::new(url);
    input.query = query
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    let response = atlas.request(input).await?;
    collection_page::<MosaicCollection>(&response, page_query::<MosaicCollection>(atlas.clone()))
}
