use super::PageLoader;
use ferrous_watchlist_domain::{DomainError, Page};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    Loading,
    Exhausted,
    Failed,
}

/// What a load request amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    /// The page was applied to the accumulated items.
    Loaded(Page<T>),
    /// A refresh or jump replaced this request before it completed; its
    /// result was discarded.
    Superseded,
    /// A page is already loading. Nothing was requested.
    AlreadyLoading,
    /// The collection is fully loaded. Nothing was requested.
    Exhausted,
}

struct Inner<T> {
    state: PageState,
    token: u64,
    offset: usize,
    items: Vec<T>,
    last_error: Option<DomainError>,
}

/// Drives page-by-page loading of one collection.
///
/// Every request captures a fresh token. A result is applied only if its
/// token is still current when it arrives, so pages land in request order
/// and a refresh discards anything that was in flight. The offset only
/// advances once a page has been applied.
///
/// The state lock is never held across the loader call.
pub struct PaginationController<L: PageLoader> {
    loader: L,
    page_size: usize,
    inner: Mutex<Inner<L::Item>>,
}

impl<L: PageLoader> PaginationController<L> {
    pub fn new(loader: L, page_size: usize) -> Self {
        Self {
            loader,
            page_size: page_size.max(1),
            inner: Mutex::new(Inner {
                state: PageState::Idle,
                token: 0,
                offset: 0,
                items: Vec::new(),
                last_error: None,
            }),
        }
    }

    /// Loads the page after the last applied one. Also the retry path out
    /// of `Failed`.
    pub async fn load_next(&self) -> Result<LoadOutcome<L::Item>, DomainError> {
        let (token, offset) = {
            let mut inner = self.lock();
            match inner.state {
                PageState::Loading => return Ok(LoadOutcome::AlreadyLoading),
                PageState::Exhausted => return Ok(LoadOutcome::Exhausted),
                PageState::Idle | PageState::Failed => {}
            }
            let offset = inner.offset;
            (Self::begin(&mut inner), offset)
        };

        self.run(token, offset).await
    }

    /// Restart from the beginning. Allowed in any state; a page in flight is
    /// superseded.
    pub async fn refresh(&self) -> Result<LoadOutcome<L::Item>, DomainError> {
        self.restart_at(0).await
    }

    /// Restart from `offset`, dropping everything loaded so far.
    pub async fn jump_to(&self, offset: usize) -> Result<LoadOutcome<L::Item>, DomainError> {
        self.restart_at(offset).await
    }

    async fn restart_at(&self, offset: usize) -> Result<LoadOutcome<L::Item>, DomainError> {
        self.loader.reset();

        let token = {
            let mut inner = self.lock();
            inner.items.clear();
            inner.offset = offset;
            Self::begin(&mut inner)
        };

        debug!(token = token, offset = offset, "Pagination restarted");
        self.run(token, offset).await
    }

    async fn run(&self, token: u64, offset: usize) -> Result<LoadOutcome<L::Item>, DomainError> {
        let result = self.loader.load_page(offset, self.page_size).await;

        let mut inner = self.lock();
        if inner.token != token {
            debug!(
                token = token,
                current = inner.token,
                offset = offset,
                "Discarding superseded page"
            );
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(items) => {
                let page = Page::new(items, offset, self.page_size);
                inner.items.extend(page.items.iter().cloned());
                inner.offset = page.next_offset();
                inner.state = if page.has_more {
                    PageState::Idle
                } else {
                    PageState::Exhausted
                };

                debug!(
                    offset = offset,
                    received = page.len(),
                    total = inner.items.len(),
                    has_more = page.has_more,
                    "Page applied"
                );
                Ok(LoadOutcome::Loaded(page))
            }
            Err(DomainError::Cancelled) => {
                // Nothing was applied; the page can be requested again.
                debug!(offset = offset, "Page load cancelled");
                inner.state = PageState::Idle;
                Ok(LoadOutcome::Superseded)
            }
            Err(e) => {
                warn!(offset = offset, error = %e, "Page load failed");
                inner.state = PageState::Failed;
                inner.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn begin(inner: &mut Inner<L::Item>) -> u64 {
        inner.token += 1;
        inner.state = PageState::Loading;
        inner.last_error = None;
        inner.token
    }

    fn lock(&self) -> MutexGuard<'_, Inner<L::Item>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> PageState {
        self.lock().state
    }

    /// Everything applied so far, in collection order.
    pub fn items(&self) -> Vec<L::Item> {
        self.lock().items.clone()
    }

    pub fn item_count(&self) -> usize {
        self.lock().items.len()
    }

    /// Offset the next `load_next` will request.
    pub fn offset(&self) -> usize {
        self.lock().offset
    }

    pub fn token(&self) -> u64 {
        self.lock().token
    }

    pub fn last_error(&self) -> Option<DomainError> {
        self.lock().last_error.clone()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}
