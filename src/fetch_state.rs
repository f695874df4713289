//! Fetch lifecycle for one page-level view.
//!
//! ```text
//!            begin()               complete(Some)
//!   Idle ───────────▶ Loading ──────────────────▶ Loaded(T)
//!                       │  ▲
//!        complete(None) │  │ begin() / retry()
//!                       ▼  │
//!                      Failed
//! ```
//!
//! `Loading` is re-entered on every parameter change (`begin`). `Failed`
//! stays put until a new `begin` or an explicit `retry`.
//!
//! Requests are not cancelled when parameters change mid-flight. Instead each
//! `begin` hands out a [`RequestTicket`], and [`PageView::complete`] only
//! applies an outcome whose ticket is still the latest one. A slow response
//! for page 2 arriving after page 3 was requested is dropped.
//!
//! What the user sees is limited to [`StatusMessage`]: a loading indicator,
//! a generic failure with a retry affordance, or an empty-state notice.
//! Failure causes stay in the logs.

use crate::types::{Album, Collection, Paginated};
use std::fmt;
use std::future::Future;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed,
}

/// Generation number of one fetch started by [`PageView::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Anything a view can show, which may turn out to have nothing in it.
pub trait Contents {
    fn is_empty(&self) -> bool;
}

impl<T> Contents for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<T> Contents for Paginated<T> {
    fn is_empty(&self) -> bool {
        Paginated::is_empty(self)
    }
}

impl Contents for Collection {
    fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }
}

impl Contents for Album {
    fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// The user-facing line for the current state, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    Loading,
    Failed,
    Empty,
}

impl StatusMessage {
    /// Whether the view should offer a "try again" action.
    pub fn offers_retry(self) -> bool {
        matches!(self, StatusMessage::Failed)
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatusMessage::Loading => "Loading…",
            StatusMessage::Failed => "Something went wrong. Please try again.",
            StatusMessage::Empty => "Nothing to show here yet.",
        })
    }
}

#[derive(Debug, Clone)]
pub struct PageView<T> {
    state: FetchState<T>,
    generation: u64,
}

impl<T> Default for PageView<T> {
    fn default() -> Self {
        Self {
            state: FetchState::Idle,
            generation: 0,
        }
    }
}

impl<T> PageView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            FetchState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Take the loaded data, if any.
    pub fn into_data(self) -> Option<T> {
        match self.state {
            FetchState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading)
    }

    /// Enter `Loading` for a new fetch. Earlier tickets become stale.
    pub fn begin(&mut self) -> RequestTicket {
        self.generation += 1;
        self.state = FetchState::Loading;
        RequestTicket(self.generation)
    }

    /// Re-enter `Loading` after a failure. Does nothing in any other state.
    pub fn retry(&mut self) -> Option<RequestTicket> {
        matches!(self.state, FetchState::Failed).then(|| self.begin())
    }

    /// Apply a fetch outcome; `None` means the fetch failed.
    ///
    /// Returns `false` and leaves the view untouched when `ticket` has been
    /// superseded by a later `begin`.
    pub fn complete(&mut self, ticket: RequestTicket, outcome: Option<T>) -> bool {
        if ticket.0 != self.generation {
            debug!(
                "discarding stale response (generation {} superseded by {})",
                ticket.0, self.generation
            );
            return false;
        }
        self.state = match outcome {
            Some(data) => FetchState::Loaded(data),
            None => FetchState::Failed,
        };
        true
    }

    /// Run `request` as a fresh fetch and apply its outcome.
    pub async fn load<F>(&mut self, request: F) -> bool
    where
        F: Future<Output = Option<T>>,
    {
        let ticket = self.begin();
        let outcome = request.await;
        self.complete(ticket, outcome)
    }
}

impl<T: Contents> PageView<T> {
    pub fn status(&self) -> Option<StatusMessage> {
        match &self.state {
            FetchState::Idle => None,
            FetchState::Loading => Some(StatusMessage::Loading),
            FetchState::Failed => Some(StatusMessage::Failed),
            FetchState::Loaded(data) if data.is_empty() => Some(StatusMessage::Empty),
            FetchState::Loaded(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::transport::tests::MockTransport;
    use crate::types::PaginationMeta;

    fn page_of(items: Vec<u32>) -> Paginated<u32> {
        let total = items.len() as u64;
        Paginated {
            data: items,
            meta: PaginationMeta::from_counts(1, 15, total),
        }
    }

    #[test]
    fn starts_idle_without_status() {
        let view: PageView<Vec<u32>> = PageView::new();
        assert_eq!(view.state(), &FetchState::Idle);
        assert_eq!(view.status(), None);
    }

    #[test]
    fn begin_then_success_loads() {
        let mut view = PageView::new();
        let ticket = view.begin();
        assert!(view.is_loading());
        assert_eq!(view.status(), Some(StatusMessage::Loading));

        assert!(view.complete(ticket, Some(page_of(vec![1, 2]))));
        assert_eq!(view.data().map(|p| p.data.len()), Some(2));
        assert_eq!(view.status(), None);
    }

    #[test]
    fn failure_shows_generic_retry_message() {
        let mut view: PageView<Vec<u32>> = PageView::new();
        let ticket = view.begin();
        view.complete(ticket, None);

        let status = view.status().unwrap();
        assert_eq!(status, StatusMessage::Failed);
        assert!(status.offers_retry());
        assert_eq!(status.to_string(), "Something went wrong. Please try again.");
    }

    #[test]
    fn empty_success_shows_empty_state() {
        let mut view = PageView::new();
        let ticket = view.begin();
        view.complete(ticket, Some(Vec::<u32>::new()));
        assert_eq!(view.status(), Some(StatusMessage::Empty));
        assert!(!StatusMessage::Empty.offers_retry());
    }

    #[test]
    fn retry_only_from_failed() {
        let mut view: PageView<Vec<u32>> = PageView::new();
        assert_eq!(view.retry(), None);

        let ticket = view.begin();
        assert_eq!(view.retry(), None);
        view.complete(ticket, None);

        let retry = view.retry().unwrap();
        assert!(view.is_loading());
        assert!(view.complete(retry, Some(vec![7])));
        assert_eq!(view.data(), Some(&vec![7]));
        assert_eq!(view.retry(), None);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut view = PageView::new();
        let page_two = view.begin();
        let page_three = view.begin();

        assert!(view.complete(page_three, Some(vec![3])));
        assert!(!view.complete(page_two, Some(vec![2])));
        assert_eq!(view.data(), Some(&vec![3]));
    }

    #[test]
    fn stale_failure_does_not_clobber_loading() {
        let mut view: PageView<Vec<u32>> = PageView::new();
        let old = view.begin();
        let _new = view.begin();
        assert!(!view.complete(old, None));
        assert!(view.is_loading());
    }

    #[test]
    fn tickets_increase() {
        let mut view: PageView<Vec<u32>> = PageView::new();
        let a = view.begin();
        let b = view.begin();
        assert!(b > a);
    }

    #[test]
    fn album_without_images_is_empty() {
        let album = transformer().album(
            serde_json::from_value(serde_json::json!({"id": 1, "title": "Bare"})).unwrap(),
        );
        let mut view = PageView::new();
        let ticket = view.begin();
        view.complete(ticket, Some(album));
        assert_eq!(view.status(), Some(StatusMessage::Empty));
    }

    #[tokio::test]
    async fn load_drives_client_fetch() {
        let (client, _) = mock_client(
            MockTransport::new().ok(
                "/api/collections?page=2&per_page=15",
                fixture(COLLECTIONS_PAGE_2),
            ),
        );
        let mut view = PageView::new();

        assert!(view.load(client.list_collections(2, 15)).await);
        assert_eq!(view.data().map(|p| p.meta.last_page), Some(3));

        assert!(view.load(client.list_collections(3, 15)).await);
        assert_eq!(view.status(), Some(StatusMessage::Failed));
    }
}
