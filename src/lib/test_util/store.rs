use crate::catalog::{
    AttributeMetadata, AttributeRepository, CatalogStore, FieldValue, OptionSource, Product,
    SortDirection, SortOrder,
};
use crate::error::Error;
use crate::filter::ProductFilter;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Catalog store backed by a list of products
#[derive(Default, Clone)]
pub struct InMemoryCatalogStore {
    products: Vec<Product>,
    attributes: AttributeRepository,
    sort_fields: Option<Vec<String>>,
    unavailable: bool,
    failing_fetches: Arc<AtomicUsize>,
    fetched_pages: Arc<AtomicUsize>,
}

/// Attribute set close to a default Magento installation
pub fn standard_attributes() -> AttributeRepository {
    let options = |values: &[(&str, &str)]| {
        values
            .iter()
            .map(|(code, label)| (code.to_string(), label.to_string()))
            .collect::<HashMap<_, _>>()
    };

    [
        "entity_id",
        "type_id",
        "created_at",
        "sku",
        "name",
        "description",
        "weight",
        "image",
        "small_image",
        "thumbnail",
    ]
    .into_iter()
    .fold(AttributeRepository::default(), |repository, code| {
        repository.with_attribute(code, AttributeMetadata::plain())
    })
    .with_attribute(
        "brand",
        AttributeMetadata::with_options(OptionSource::Select(options(&[
            ("1", "Acme"),
            ("2", "Globex"),
        ]))),
    )
    .with_attribute(
        "color",
        AttributeMetadata::with_options(OptionSource::Select(options(&[
            ("10", "Red"),
            ("11", "Blue"),
        ]))),
    )
    .with_attribute(
        "material",
        AttributeMetadata::with_options(OptionSource::Multiselect(options(&[
            ("20", "Cotton"),
            ("21", "Wool"),
        ]))),
    )
    .with_attribute(
        "is_featured",
        AttributeMetadata::with_options(OptionSource::Boolean),
    )
}

impl InMemoryCatalogStore {
    /// Adds products with their static entity columns exposed as attributes
    pub fn with_products(mut self, products: impl IntoIterator<Item = Product>) -> Self {
        for mut product in products {
            product.set_attribute("entity_id", product.entity_id() as i64);
            product.set_attribute("type_id", product.type_id().to_owned());
            if let Some(created_at) = product.created_at().map(str::to_owned) {
                product.set_attribute("created_at", created_at);
            }
            self.products.push(product);
        }
        self
    }

    pub fn with_attributes(self, attributes: AttributeRepository) -> Self {
        Self { attributes, ..self }
    }

    pub fn with_sort_fields<const N: usize>(self, fields: [&str; N]) -> Self {
        Self {
            sort_fields: Some(fields.iter().map(|field| field.to_string()).collect()),
            ..self
        }
    }

    pub fn unavailable(self) -> Self {
        Self {
            unavailable: true,
            ..self
        }
    }

    /// Makes the next `count` page fetches fail as if store went offline
    pub fn failing_fetches(self, count: usize) -> Self {
        self.failing_fetches.store(count, Ordering::SeqCst);
        self
    }

    pub fn fetched_pages(&self) -> usize {
        self.fetched_pages.load(Ordering::SeqCst)
    }

    fn check_availability(&self) -> Result<(), Error> {
        if self.unavailable {
            return Err(Error::StoreUnavailable("catalog store is offline".into()));
        }
        Ok(())
    }

    fn sort_value(product: &Product, field: &str) -> FieldValue {
        product.attribute(field).cloned().unwrap_or(FieldValue::Null)
    }
}

impl CatalogStore for InMemoryCatalogStore {
    async fn attributes(&self) -> Result<AttributeRepository, Error> {
        self.check_availability()?;
        Ok(self.attributes.clone())
    }

    async fn count(&self, filter: &ProductFilter) -> Result<usize, Error> {
        self.check_availability()?;
        Ok(self
            .products
            .iter()
            .filter(|product| filter.matches(product))
            .count())
    }

    async fn fetch_page(
        &self,
        filter: &ProductFilter,
        sort: &SortOrder,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Product>, Error> {
        self.check_availability()?;

        let should_fail = self
            .failing_fetches
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                count.checked_sub(1)
            })
            .is_ok();

        if should_fail {
            return Err(Error::StoreUnavailable("connection reset".into()));
        }

        self.fetched_pages.fetch_add(1, Ordering::SeqCst);

        let mut products: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| filter.matches(product))
            .collect();

        products.sort_by(|left, right| {
            let order = Self::sort_value(left, sort.field())
                .sort_cmp(&Self::sort_value(right, sort.field()));

            match sort.direction() {
                SortDirection::Asc => order,
                SortDirection::Desc => order.reverse(),
            }
            .then_with(|| left.entity_id().cmp(&right.entity_id()))
        });

        Ok(products
            .into_iter()
            .skip(page.saturating_sub(1) * page_size)
            .take(page_size)
            .cloned()
            .collect())
    }

    fn supports_sort_field(&self, field: &str) -> bool {
        match &self.sort_fields {
            Some(fields) => fields.iter().any(|supported| supported == field),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Visibility;
    use crate::filter::FilterBuilder;
    use crate::sync::{SyncConfig, VisibilityMode};

    #[tokio::test]
    async fn counts_only_matching_products() -> Result<(), Error> {
        let store = InMemoryCatalogStore::default().with_products([
            Product::new(1, "simple").with_visibility(Visibility::InCatalog),
            Product::new(2, "simple").with_visibility(Visibility::InSearch),
            Product::new(3, "simple").with_visibility(Visibility::InCatalog),
        ]);

        let filter = FilterBuilder::build(
            &SyncConfig::default().with_visibility(VisibilityMode::InCatalog),
        );

        assert_eq!(store.count(&filter).await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn sorts_by_attribute_with_entity_id_as_tie_breaker() -> Result<(), Error> {
        let store = InMemoryCatalogStore::default().with_products([
            Product::new(1, "simple").with_attribute("name", "B"),
            Product::new(2, "simple").with_attribute("name", "A"),
            Product::new(3, "simple").with_attribute("name", "B"),
            Product::new(4, "simple"),
        ]);

        let products = store
            .fetch_page(
                &ProductFilter::default(),
                &SortOrder::new("name", SortDirection::Desc),
                1,
                10,
            )
            .await?;

        assert_eq!(
            products.iter().map(Product::entity_id).collect::<Vec<_>>(),
            vec![1, 3, 2, 4]
        );

        Ok(())
    }

    #[tokio::test]
    async fn fails_configured_number_of_fetches() {
        let store = InMemoryCatalogStore::default()
            .with_products([Product::new(1, "simple")])
            .failing_fetches(1);
        let (filter, sort) = (ProductFilter::default(), SortOrder::default());
        let fetch = || store.fetch_page(&filter, &sort, 1, 10);

        assert!(fetch().await.is_err());
        assert!(fetch().await.is_ok());
        assert_eq!(store.fetched_pages(), 1);
    }
}
