//! The page envelope returned by list endpoints.

use serde::{Deserialize, Serialize};

/// One server-side page of a list endpoint.
///
/// The backend paginates with `?page=N` and reports whether another page
/// exists through the `next` link; the client never follows the link
/// itself, it only checks for its presence and asks for `N + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page, in server order.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// URL of the following page, or `null` on the last page.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the preceding page.
    #[serde(default)]
    pub previous: Option<String>,
    /// Total number of items across all pages, when reported.
    #[serde(default)]
    pub count: Option<u64>,
}

impl<T> Page<T> {
    /// Whether the server reported a further page.
    pub fn has_next(&self) -> bool {
        self.next.as_deref().is_some_and(|n| !n.is_empty())
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            next: None,
            previous: None,
            count: None,
        }
    }
}
