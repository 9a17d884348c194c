use crate::catalog::{CatalogStore, Product, SortOrder};
use crate::error::Error;
use crate::filter::ProductFilter;
use tracing::debug;

/// Extension point invoked with every freshly fetched page
pub trait PageObserver {
    fn after_page_fetch(&self, pipeline: &str, page: &mut Vec<Product>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PageObserver for NoopObserver {
    fn after_page_fetch(&self, _pipeline: &str, _page: &mut Vec<Product>) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub items: Vec<Product>,
    pub has_more: bool,
}

/// Position of a paged walk over a filtered product collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    filter: ProductFilter,
    sort: SortOrder,
    page_size: usize,
    last_page: usize,
    next_page: usize,
}

impl PageCursor {
    pub fn has_more(&self) -> bool {
        self.next_page <= self.last_page
    }

    pub fn next_page(&self) -> usize {
        self.next_page
    }

    pub fn last_page(&self) -> usize {
        self.last_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

pub struct CollectionPager<'a, S, O> {
    store: &'a S,
    observer: O,
    pipeline: &'static str,
}

impl<'a, S, O> CollectionPager<'a, S, O>
where
    S: CatalogStore,
    O: PageObserver,
{
    pub fn new(store: &'a S, observer: O, pipeline: &'static str) -> Self {
        Self {
            store,
            observer,
            pipeline,
        }
    }

    pub async fn open(
        &self,
        filter: ProductFilter,
        page_size: usize,
        sort: SortOrder,
    ) -> Result<PageCursor, Error> {
        if !self.store.supports_sort_field(sort.field()) {
            return Err(Error::UnsupportedSortField(sort.field().to_owned()));
        }

        let page_size = page_size.max(1);
        let total = self.store.count(&filter).await?;

        debug!(total, page_size, "Opened product collection");

        Ok(PageCursor {
            filter,
            sort,
            page_size,
            last_page: total.div_ceil(page_size),
            next_page: 1,
        })
    }

    /// Fetches the page under cursor and moves cursor to the following one
    pub async fn next(&self, cursor: &mut PageCursor) -> Result<Page, Error> {
        let number = cursor.next_page;
        let mut items = if cursor.has_more() {
            self.store
                .fetch_page(&cursor.filter, &cursor.sort, number, cursor.page_size)
                .await?
        } else {
            Vec::new()
        };

        self.observer.after_page_fetch(self.pipeline, &mut items);
        cursor.next_page += 1;

        debug!(page = number, items = items.len(), "Fetched product page");

        Ok(Page {
            number,
            items,
            has_more: cursor.has_more(),
        })
    }
}
