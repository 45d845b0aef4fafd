use serde::Deserialize;
use serde_json::Value;

/// Navigation links carried by a paged collection body.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CollectionLinks {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// A paged response body: an item list plus navigation links.
pub trait PagedCollection: serde::de::DeserializeOwned + Send {
    fn into_parts(self) -> (Vec<Value>, Option<String>);
}

/// A GeoJSON feature collection, as returned by scene and quad searches.
#[derive(Deserialize, Debug, Clone)]
pub struct FeatureCollection {
    #[serde(default)]
    pub links: CollectionLinks,
    #[serde(default)]
    pub features: Vec<Value>,
}

impl PagedCollection for FeatureCollection {
    fn into_parts(self) -> (Vec<Value>, Option<String>) {
        (self.features, self.links.next)
    }
}

/// A mosaic listing, as returned by the mosaics endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct MosaicCollection {
    #[serde(default)]
    pub links: CollectionLinks,
    #[serde(default)]
    pub mosaics: Vec<Value>,
}

impl PagedCollection for MosaicCollection {
    fn into_parts(self) -> (Vec<Value>, Option<String>) {
        (self.mosaics, self.links.next)
    }
}
