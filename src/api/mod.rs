//! Resource modules: endpoint path construction and paged results.

pub mod mosaics;
pub mod quads;
pub mod scenes;
pub mod types;

use std::sync::Arc;

use serde_json::Value;

use crate::client::Atlas;
use crate::errors::Error;
use crate::http::{ApiResponse, RequestInput};
use crate::page::{Page, QueryFn};
use self::types::PagedCollection;

/// Wraps a search response in a page bound to a query function.
pub(crate) fn collection_page<C: PagedCollection>(
    response: &ApiResponse,
    query: QueryFn<Value>,
) -> Result<Page<Value>, Error> {
    let collection: C = response.json()?;
    let (items, next_link) = collection.into_parts();
    Ok(Page::new(items, next_link, query))
}

/// Query function that fetches a collection page by URL through the given
/// client, so each page can keep advancing with the same function.
pub(crate) fn page_query<C: PagedCollection + 'static>(atlas: Atlas) -> QueryFn<Value> {
    Arc::new(move |url: String| {
        let atlas = atlas.clone();
        Box::pin(async move {
            let response = atlas.request(RequestInput::new(url)).await?;
            collection_page::<C>(&response, page_query::<C>(atlas.clone()))
        })
    })
}
