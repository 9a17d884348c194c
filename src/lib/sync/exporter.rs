use crate::catalog::{CatalogStore, Product};
use crate::error::{Error, FieldError};
use crate::field::{FieldContext, FieldResolver};
use crate::filter::FilterBuilder;
use crate::sync::{
    Batch, BatchSender, CollectionPager, ItemErrorPolicy, Page, PageCursor, PageObserver, Record,
    SyncConfig,
};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const PRODUCT_PIPELINE: &str = "product";

const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportStats {
    pub batches: usize,
    pub records: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

/// Pulls product pages one by one and converts them into record batches.
///
/// Each batch matches one collection page. The sequence ends after the last
/// page and cannot be restarted, open a new exporter for another run.
pub struct BatchExporter<'a, S, O> {
    pager: CollectionPager<'a, S, O>,
    cursor: PageCursor,
    resolver: &'a FieldResolver,
    context: FieldContext,
    config: SyncConfig,
    fields: Vec<String>,
    seen: HashSet<usize>,
    stats: ExportStats,
}

impl<'a, S, O> BatchExporter<'a, S, O>
where
    S: CatalogStore,
    O: PageObserver,
{
    pub async fn open(
        store: &'a S,
        config: SyncConfig,
        resolver: &'a FieldResolver,
        context: FieldContext,
        observer: O,
    ) -> Result<BatchExporter<'a, S, O>, Error> {
        let context = context.with_attributes(store.attributes().await?);
        let pager = CollectionPager::new(store, observer, PRODUCT_PIPELINE);
        let cursor = pager
            .open(
                FilterBuilder::build(&config),
                config.page_size(),
                config.sort_order(),
            )
            .await?;
        let fields = config.fields();

        info!(
            pages = cursor.last_page(),
            page_size = cursor.page_size(),
            fields = fields.len(),
            "Started product export"
        );

        Ok(Self {
            pager,
            cursor,
            resolver,
            context,
            config,
            fields,
            seen: HashSet::new(),
            stats: ExportStats::default(),
        })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn stats(&self) -> ExportStats {
        self.stats
    }

    /// Next batch of records or `None` when all pages are exported
    pub async fn next_batch(&mut self) -> Result<Option<Batch>, Error> {
        if !self.cursor.has_more() {
            return Ok(None);
        }

        let page = self.fetch_page().await?;
        let mut records = Vec::with_capacity(page.items.len());

        for product in &page.items {
            if !self.seen.insert(product.entity_id()) {
                debug!(
                    entity_id = product.entity_id(),
                    "Product is already exported in this run"
                );
                self.stats.duplicates += 1;
                continue;
            }

            match self.build_record(product) {
                Ok(record) => records.push(record),
                Err(source) => match self.config.item_error_policy() {
                    ItemErrorPolicy::Skip => {
                        warn!(entity_id = product.entity_id(), error = %source, "Skipped product");
                        self.stats.skipped += 1;
                    }
                    ItemErrorPolicy::Abort => {
                        return Err(Error::ItemFailed {
                            entity_id: product.entity_id(),
                            source,
                        })
                    }
                },
            }
        }

        self.stats.batches += 1;
        self.stats.records += records.len();

        Ok(Some(Batch::new(page.number, records)))
    }

    /// Exports every remaining batch into `sender`
    pub async fn run(mut self, sender: &impl BatchSender) -> Result<ExportStats, Error> {
        while let Some(batch) = self.next_batch().await? {
            sender.send(batch).await?;
        }

        info!(
            batches = self.stats.batches,
            records = self.stats.records,
            skipped = self.stats.skipped,
            "Finished product export"
        );

        Ok(self.stats)
    }

    async fn fetch_page(&mut self) -> Result<Page, Error> {
        let mut attempt = 0;

        loop {
            match self.pager.next(&mut self.cursor).await {
                Err(error) if error.is_store_unavailable() && attempt < self.config.fetch_retries() => {
                    attempt += 1;
                    warn!(
                        page = self.cursor.next_page(),
                        attempt,
                        error = %error,
                        "Retrying product page fetch"
                    );
                    tokio::time::sleep(RETRY_DELAY * attempt).await;
                }
                result => return result,
            }
        }
    }

    fn build_record(&self, product: &Product) -> Result<Record, FieldError> {
        let mut record = Record::new(product.entity_id());

        for field in &self.fields {
            match self.resolver.resolve(product, field, &self.context) {
                Ok(value) => record.push(self.config.output_name(field), value),
                Err(FieldError::UnknownField(_)) => {
                    debug!(field = field.as_str(), "Omitted unknown product field")
                }
                Err(error) => return Err(error),
            }
        }

        Ok(record)
    }
}
