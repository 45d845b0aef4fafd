//! Paged collection results.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::errors::Error;

/// The query function bound to a page: fetches the page at the given URL
/// and wraps it, so the result can keep advancing with the same function.
pub type QueryFn<T> =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<Page<T>, Error>> + Send + Sync>;

/// One fetched slice of a paged collection.
///
/// A page is an immutable snapshot: it owns its items and the link to the
/// next slice, and holds the query function that produced it. It does not
/// cache prior pages and shares no cursor with other pages.
pub struct Page<T> {
    pub items: Vec<T>,
    next_link: Option<String>,
    query: QueryFn<T>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_link: Option<String>, query: QueryFn<T>) -> Self {
        Page {
            items,
            next_link,
            query,
        }
    }

    /// Whether the collection continues past this page.
    pub fn has_next(&self) -> bool {
        self.next_link.is_some()
    }

    pub fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }

    /// Fetches the next page by re-invoking the query function with this
    /// page's next link. Returns `Ok(None)` when the collection is
    /// exhausted; the query function is never invoked without a target.
    pub async fn next(&self) -> Result<Option<Page<T>>, Error> {
        match &self.next_link {
            Some(link) => Ok(Some((self.query)(link.clone()).await?)),
            None => Ok(None),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Page<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("items", &self.items)
            .field("next_link", &self.next_link)
            .finish()
    }
}
