mod attribute;
mod date;
mod mysql;
mod product;
mod query;
mod table_name;
mod value;
mod visibility;

use crate::error::Error;
use crate::filter::ProductFilter;
pub use attribute::{AttributeMetadata, AttributeRepository, OptionSource};
pub use date::Timestamp;
pub use mysql::{MySqlCatalogStore, StoreScope, SORTABLE_COLUMNS};
pub use product::{PriceInfo, Product, CONFIGURABLE_TYPE};
pub use query::{SortDirection, SortOrder};
pub use value::FieldValue;
pub use visibility::Visibility;

/// Read-only paged access to the product catalog
pub trait CatalogStore {
    async fn attributes(&self) -> Result<AttributeRepository, Error>;

    async fn count(&self, filter: &ProductFilter) -> Result<usize, Error>;

    /// Loads 1-indexed `page` of products matching `filter` in `sort` order
    async fn fetch_page(
        &self,
        filter: &ProductFilter,
        sort: &SortOrder,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Product>, Error>;

    fn supports_sort_field(&self, _field: &str) -> bool {
        true
    }
}
