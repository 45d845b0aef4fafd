//! Scene metadata endpoints.

use log::debug;
use serde_json::Value;

use super::types::FeatureCollection;
use super::{collection_page, page_query};
use crate::client::Atlas;
use crate::errors::Error;
use crate::http::{RequestInput, Terminator};
use crate::page::Page;
use crate::urls;

/// Scene type used when a reference does not name one.
pub const DEFAULT_TYPE: &str = "ortho";

/// Identifies a scene by type and id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneRef {
    pub kind: String,
    pub id: String,
}

impl SceneRef {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        SceneRef {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

impl From<&str> for SceneRef {
    fn from(id: &str) -> Self {
        SceneRef::new(DEFAULT_TYPE, id)
    }
}

/// Gets metadata for a single scene.
#[tracing::instrument(skip(atlas, scene, terminator))]
pub async fn get(
    atlas: &Atlas,
    scene: impl Into<SceneRef>,
    terminator: Option<Terminator>,
) -> Result<Value, Error> {
    let scene = scene.into();
    let url = urls::join(atlas.api_url(), &["scenes", &scene.kind, &scene.id]);
    debug!("Fetching scene metadata from {}...", url);

    let mut input = RequestInput::new(url);
    input.terminator = terminator;
    let response = atlas.request(input).await?;
    response.json()
}

/// Searches scene metadata, returning the first page of results.
///
/// A `type` entry in the query selects the scene type and is lifted into
/// the endpoint path instead of the query string.
#[tracing::instrument(skip(atlas, query, terminator))]
pub async fn search(
    atlas: &Atlas,
    query: &[(&str, &str)],
    terminator: Option<Terminator>,
) -> Result<Page<Value>, Error> {
    let mut kind = DEFAULT_TYPE;
    let mut params = Vec::new();
    for (key, value) in query {
        if *key == "type" {
            kind = value;
        } else {
            params.push((key.to_string(), value.to_string()));
        }
    }

    let url = urls::join(atlas.api_url(), &["scenes", kind, ""]);
    debug!("Searching scenes at {}...", url);

    let mut input = RequestInput::new(url);
    input.query = params;
    input.terminator = terminator;
    let response = atlas.request(input).await?;
    collection_page::<FeatureCollection>(&response, page_query::<FeatureCollection>(atlas.clone()))
}
