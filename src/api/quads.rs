//! Mosaic quad metadata endpoints.

use log::debug;
use serde_json::Value;

use super::types::FeatureCollection;
use super::{collection_page, page_query};
use crate::client::Atlas;
use crate::errors::Error;
use crate::http::RequestInput;
use crate::page::Page;
use crate::urls;

/// Gets metadata for a single mosaic quad.
#[tracing::instrument(skip(atlas))]
pub async fn get(atlas: &Atlas, mosaic_id: &str, quad_id: &str) -> Result<Value, Error> {
    let url = urls::join(atlas.api_url(), &["mosaics", mosaic_id, "quads", quad_id]);
    debug!("Fetching quad metadata from {}...", url);

    let response = atlas.request(RequestInput::new(url)).await?;
    response.json()
}

/// Searches quad metadata within a mosaic, returning the first page.
#[tracing::instrument(skip(atlas, query))]
pub async fn search(
    atlas: &Atlas,
    mosaic_id: &str,
    query: &[(&str, &str)],
) -> Result<Page<Value>, Error> {
    let url = urls::join(atlas.api_url(), &["mosaics", mosaic_id, "quads", ""]);
    debug!("Searching quads at {}...", url);

    let mut input = RequestInput::new(url);
    input.query = query
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    let response = atlas.request(input).await?;
    collection_page::<FeatureCollection>(&response, page_query::<FeatureCollection>(atlas.clone()))
}
