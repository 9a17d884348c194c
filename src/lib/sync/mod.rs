mod config;
mod exporter;
mod pager;
mod record;
mod sender;

pub use config::{parse_additional_fields, ItemErrorPolicy, SyncConfig, VisibilityMode, DEFAULT_FIELDS};
pub use exporter::{BatchExporter, ExportStats, PRODUCT_PIPELINE};
pub use pager::{CollectionPager, NoopObserver, Page, PageCursor, PageObserver};
pub use record::{Batch, Record};
pub use sender::BatchSender;
