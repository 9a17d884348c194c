use crate::catalog::table_name::{placeholders, table_name_with_prefix};
use crate::catalog::{
    AttributeMetadata, AttributeRepository, CatalogStore, FieldValue, OptionSource, PriceInfo,
    Product, SortOrder, Visibility,
};
use crate::error::Error;
use crate::filter::ProductFilter;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts, Pool, Value};
use mysql_common::params::Params;
use std::collections::HashMap;
use tokio::sync::OnceCell;
use tracing::debug;

const PRODUCT_ENTITY_TYPE: &str = "catalog_product";
const STATUS_ATTRIBUTE: &str = "status";
const VISIBILITY_ATTRIBUTE: &str = "visibility";
const PRICE_ATTRIBUTE: &str = "price";
const STATUS_ENABLED: u8 = 1;
const STOCK_IN_STOCK: u8 = 1;
const DEFAULT_STOCK_WEBSITE: u32 = 0;
const DEFAULT_STOCK_ID: u32 = 1;
const TABLE_SOURCE_MODEL: &str = "Magento\\Eav\\Model\\Entity\\Attribute\\Source\\Table";

const VISIBILITY_LABELS: [(&str, &str); 4] = [
    ("1", "Not Visible Individually"),
    ("2", "Catalog"),
    ("3", "Search"),
    ("4", "Catalog, Search"),
];

const STATUS_LABELS: [(&str, &str); 2] = [("1", "Enabled"), ("2", "Disabled")];

/// Entity columns which can be used for sorting without extra joins
pub const SORTABLE_COLUMNS: [&str; 5] =
    ["entity_id", "sku", "type_id", "created_at", "updated_at"];

const STATIC_ATTRIBUTES: [&str; 2] = ["entity_id", "type_id"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum BackendType {
    Static,
    Varchar,
    Int,
    Decimal,
    Text,
    Datetime,
}

impl BackendType {
    const VALUE_TABLES: [BackendType; 5] = [
        Self::Varchar,
        Self::Int,
        Self::Decimal,
        Self::Text,
        Self::Datetime,
    ];

    fn from_name(name: &str) -> Self {
        match name {
            "varchar" => Self::Varchar,
            "int" => Self::Int,
            "decimal" => Self::Decimal,
            "text" => Self::Text,
            "datetime" => Self::Datetime,
            _ => Self::Static,
        }
    }

    fn table(&self) -> &'static str {
        match self {
            Self::Static => "catalog_product_entity",
            Self::Varchar => "catalog_product_entity_varchar",
            Self::Int => "catalog_product_entity_int",
            Self::Decimal => "catalog_product_entity_decimal",
            Self::Text => "catalog_product_entity_text",
            Self::Datetime => "catalog_product_entity_datetime",
        }
    }

    fn value_column(&self) -> &'static str {
        match self {
            Self::Datetime => "CAST(value AS CHAR)",
            Self::Decimal => "CAST(value AS CHAR)",
            _ => "value",
        }
    }
}

/// Scope for store level values, price index and URL rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreScope {
    store_id: u32,
    website_id: u32,
    customer_group_id: u32,
}

impl Default for StoreScope {
    fn default() -> Self {
        Self {
            store_id: 1,
            website_id: 1,
            customer_group_id: 0,
        }
    }
}

impl StoreScope {
    pub fn new(store_id: u32, website_id: u32, customer_group_id: u32) -> Self {
        Self {
            store_id,
            website_id,
            customer_group_id,
        }
    }

    pub fn store_id(&self) -> u32 {
        self.store_id
    }

    pub fn website_id(&self) -> u32 {
        self.website_id
    }

    pub fn customer_group_id(&self) -> u32 {
        self.customer_group_id
    }
}

/// attribute_id, attribute_code, backend_type, frontend_input, source_model
type AttributeRow = (u64, String, String, Option<String>, Option<String>);

#[derive(Debug, Clone)]
struct EavAttribute {
    id: u64,
    code: String,
    backend: BackendType,
}

#[derive(Debug, Default)]
struct EavSchema {
    attributes: Vec<EavAttribute>,
    repository: AttributeRepository,
}

impl EavSchema {
    fn attribute_id(&self, code: &str) -> Option<u64> {
        self.attributes
            .iter()
            .find(|attribute| attribute.code == code)
            .map(|attribute| attribute.id)
    }

    fn by_id(&self, id: u64) -> Option<&EavAttribute> {
        self.attributes.iter().find(|attribute| attribute.id == id)
    }

    fn ids_for(&self, backend: BackendType) -> Vec<u64> {
        self.attributes
            .iter()
            .filter(|attribute| attribute.backend == backend)
            .map(|attribute| attribute.id)
            .collect()
    }
}

/// Join and condition part of a product collection query
#[derive(Debug, Default, PartialEq)]
struct FilterSql {
    joins: String,
    params: Vec<Value>,
}

/// Catalog store reading Magento 2 product tables
pub struct MySqlCatalogStore {
    pool: Pool,
    table_prefix: String,
    scope: StoreScope,
    schema: OnceCell<EavSchema>,
}

impl MySqlCatalogStore {
    pub fn new<O>(opts: O) -> Self
    where
        Opts: From<O>,
    {
        Self::from_pool(Pool::new(opts))
    }

    pub fn from_pool(pool: Pool) -> Self {
        Self {
            pool,
            table_prefix: String::new(),
            scope: StoreScope::default(),
            schema: OnceCell::new(),
        }
    }

    pub fn with_table_prefix(self, table_prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: table_prefix.into(),
            ..self
        }
    }

    pub fn with_scope(self, scope: StoreScope) -> Self {
        Self { scope, ..self }
    }

    pub fn scope(&self) -> &StoreScope {
        &self.scope
    }

    async fn acquire_connection(&self) -> Result<Conn, Error> {
        Ok(self.pool.get_conn().await?)
    }

    fn table(&self, name: &'static str) -> String {
        table_name_with_prefix(name, &self.table_prefix).into_owned()
    }

    async fn schema(&self) -> Result<&EavSchema, Error> {
        self.schema.get_or_try_init(|| self.load_schema()).await
    }

    async fn load_schema(&self) -> Result<EavSchema, Error> {
        let mut connection = self.acquire_connection().await?;

        let rows: Vec<AttributeRow> = connection
            .exec(
                format!(
                    "SELECT a.attribute_id, a.attribute_code, a.backend_type, a.frontend_input, \
                     a.source_model FROM {} a INNER JOIN {} t ON t.entity_type_id = a.entity_type_id \
                     WHERE t.entity_type_code = ?",
                    self.table("eav_attribute"),
                    self.table("eav_entity_type")
                ),
                Params::Positional(vec![PRODUCT_ENTITY_TYPE.into()]),
            )
            .await?;

        let options: Vec<(u64, u64, Option<String>)> = connection
            .exec(
                format!(
                    "SELECT o.attribute_id, o.option_id, v.value \
                     FROM {} o INNER JOIN {} v ON v.option_id = o.option_id AND v.store_id = 0 \
                     INNER JOIN {} a ON a.attribute_id = o.attribute_id \
                     INNER JOIN {} t ON t.entity_type_id = a.entity_type_id \
                     WHERE t.entity_type_code = ?",
                    self.table("eav_attribute_option"),
                    self.table("eav_attribute_option_value"),
                    self.table("eav_attribute"),
                    self.table("eav_entity_type")
                ),
                Params::Positional(vec![PRODUCT_ENTITY_TYPE.into()]),
            )
            .await?;

        let schema = build_schema(rows, options);

        debug!(
            attributes = schema.repository.len(),
            "Loaded product attribute metadata"
        );

        Ok(schema)
    }

    fn filter_sql(&self, filter: &ProductFilter, schema: &EavSchema) -> Result<FilterSql, Error> {
        let mut sql = FilterSql::default();

        if filter.saleable_only() {
            let status_id = schema
                .attribute_id(STATUS_ATTRIBUTE)
                .ok_or(Error::InvalidConfiguration("status attribute is missing".into()))?;

            sql.joins.push_str(&format!(
                " INNER JOIN {} stock ON stock.product_id = e.entity_id \
                 AND stock.website_id = ? AND stock.stock_id = ? AND stock.stock_status = ? \
                 INNER JOIN {} status ON status.entity_id = e.entity_id \
                 AND status.attribute_id = ? AND status.store_id = 0 AND status.value = ?",
                self.table("cataloginventory_stock_status"),
                self.table(BackendType::Int.table()),
            ));
            sql.params.extend([
                Value::from(DEFAULT_STOCK_WEBSITE),
                Value::from(DEFAULT_STOCK_ID),
                Value::from(STOCK_IN_STOCK),
                Value::from(status_id),
                Value::from(STATUS_ENABLED),
            ]);
        }

        if let Some(code) = filter.visibility_code() {
            let visibility_id = schema
                .attribute_id(VISIBILITY_ATTRIBUTE)
                .ok_or(Error::InvalidConfiguration("visibility attribute is missing".into()))?;

            sql.joins.push_str(&format!(
                " INNER JOIN {} visibility ON visibility.entity_id = e.entity_id \
                 AND visibility.attribute_id = ? AND visibility.store_id = 0 \
                 AND visibility.value = ?",
                self.table(BackendType::Int.table()),
            ));
            sql.params
                .extend([Value::from(visibility_id), Value::from(code)]);
        }

        Ok(sql)
    }

    async fn load_values(
        &self,
        connection: &mut Conn,
        schema: &EavSchema,
        products: &mut [Product],
        positions: &HashMap<u64, usize>,
    ) -> Result<(), Error> {
        let entity_ids: Vec<Value> = positions.keys().map(|id| Value::from(*id)).collect();

        for backend in BackendType::VALUE_TABLES {
            let attribute_ids = schema.ids_for(backend);
            if attribute_ids.is_empty() {
                continue;
            }

            let mut params: Vec<Value> = vec![self.scope.store_id.into()];
            params.extend(attribute_ids.iter().map(|id| Value::from(*id)));
            params.extend(entity_ids.iter().cloned());

            let query = format!(
                "SELECT entity_id, attribute_id, {} FROM {} \
                 WHERE store_id IN (0, ?) AND attribute_id IN ({}) AND entity_id IN ({}) \
                 ORDER BY store_id",
                backend.value_column(),
                self.table(backend.table()),
                placeholders(attribute_ids.len()),
                placeholders(entity_ids.len())
            );

            let rows: Vec<(u64, u64, Value)> =
                connection.exec(query, Params::Positional(params)).await?;

            for (entity_id, attribute_id, value) in rows {
                let (Some(position), Some(attribute)) =
                    (positions.get(&entity_id), schema.by_id(attribute_id))
                else {
                    continue;
                };

                let value = field_value(backend, value);
                let product = &mut products[*position];

                if attribute.code == VISIBILITY_ATTRIBUTE {
                    if let Some(visibility) = value
                        .as_f64()
                        .and_then(|code| Visibility::from_code(code as i64))
                    {
                        product.set_visibility(visibility);
                    }
                }

                product.set_attribute(attribute.code.as_str(), value);
            }
        }

        Ok(())
    }

    async fn load_stock(
        &self,
        connection: &mut Conn,
        products: &mut [Product],
        positions: &HashMap<u64, usize>,
    ) -> Result<(), Error> {
        let mut params: Vec<Value> = vec![DEFAULT_STOCK_WEBSITE.into(), DEFAULT_STOCK_ID.into()];
        params.extend(positions.keys().map(|id| Value::from(*id)));

        let rows: Vec<(u64, u8)> = connection
            .exec(
                format!(
                    "SELECT product_id, stock_status FROM {} \
                     WHERE website_id = ? AND stock_id = ? AND product_id IN ({})",
                    self.table("cataloginventory_stock_status"),
                    placeholders(positions.len())
                ),
                Params::Positional(params),
            )
            .await?;

        let in_stock: HashMap<u64, bool> = rows
            .into_iter()
            .map(|(id, status)| (id, status == STOCK_IN_STOCK))
            .collect();

        for (entity_id, position) in positions {
            let product = &mut products[*position];
            let enabled = product
                .attribute(STATUS_ATTRIBUTE)
                .and_then(FieldValue::as_f64)
                .map_or(false, |status| status as u8 == STATUS_ENABLED);

            product.set_saleable(enabled && in_stock.get(entity_id).copied().unwrap_or(false));
        }

        Ok(())
    }

    async fn load_categories(
        &self,
        connection: &mut Conn,
        products: &mut [Product],
        positions: &HashMap<u64, usize>,
    ) -> Result<(), Error> {
        let rows: Vec<(u64, u64)> = connection
            .exec(
                format!(
                    "SELECT product_id, category_id FROM {} WHERE product_id IN ({}) \
                     ORDER BY product_id, position, category_id",
                    self.table("catalog_category_product"),
                    placeholders(positions.len())
                ),
                Params::Positional(positions.keys().map(|id| Value::from(*id)).collect()),
            )
            .await?;

        for (entity_id, category_id) in rows {
            if let Some(position) = positions.get(&entity_id) {
                products[*position].add_category_id(category_id as usize);
            }
        }

        Ok(())
    }

    async fn load_prices(
        &self,
        connection: &mut Conn,
        products: &mut [Product],
        positions: &HashMap<u64, usize>,
    ) -> Result<(), Error> {
        let mut params: Vec<Value> = vec![
            self.scope.website_id.into(),
            self.scope.customer_group_id.into(),
        ];
        params.extend(positions.keys().map(|id| Value::from(*id)));

        let rows: Vec<(u64, Option<String>, Option<String>)> = connection
            .exec(
                format!(
                    "SELECT entity_id, CAST(price AS CHAR), CAST(final_price AS CHAR) FROM {} \
                     WHERE website_id = ? AND customer_group_id = ? AND entity_id IN ({})",
                    self.table("catalog_product_index_price"),
                    placeholders(positions.len())
                ),
                Params::Positional(params),
            )
            .await?;

        let index: HashMap<u64, (Option<f64>, Option<f64>)> = rows
            .into_iter()
            .map(|(id, price, final_price)| {
                (id, (parse_decimal(price), parse_decimal(final_price)))
            })
            .collect();

        for (entity_id, position) in positions {
            let product = &mut products[*position];
            let price = product.attribute(PRICE_ATTRIBUTE).and_then(FieldValue::as_f64);
            let (regular_price, final_price) = index.get(entity_id).copied().unwrap_or_default();

            product.set_price_info(PriceInfo::new(price, final_price, regular_price));
        }

        Ok(())
    }

    async fn load_request_paths(
        &self,
        connection: &mut Conn,
        products: &mut [Product],
        positions: &HashMap<u64, usize>,
    ) -> Result<(), Error> {
        let mut params: Vec<Value> = vec![self.scope.store_id.into()];
        params.extend(positions.keys().map(|id| Value::from(*id)));

        let rows: Vec<(u64, String)> = connection
            .exec(
                format!(
                    "SELECT entity_id, request_path FROM {} \
                     WHERE entity_type = 'product' AND redirect_type = 0 AND metadata IS NULL \
                     AND store_id = ? AND entity_id IN ({}) ORDER BY url_rewrite_id",
                    self.table("url_rewrite"),
                    placeholders(positions.len())
                ),
                Params::Positional(params),
            )
            .await?;

        for (entity_id, request_path) in rows {
            if let Some(position) = positions.get(&entity_id) {
                let product = &mut products[*position];
                if product.request_path().is_none() {
                    product.set_request_path(request_path);
                }
            }
        }

        Ok(())
    }
}

impl CatalogStore for MySqlCatalogStore {
    async fn attributes(&self) -> Result<AttributeRepository, Error> {
        Ok(self.schema().await?.repository.clone())
    }

    async fn count(&self, filter: &ProductFilter) -> Result<usize, Error> {
        let schema = self.schema().await?;
        let filter = self.filter_sql(filter, schema)?;
        let mut connection = self.acquire_connection().await?;

        let count: Option<u64> = connection
            .exec_first(
                format!(
                    "SELECT COUNT(*) FROM {} e{}",
                    self.table(BackendType::Static.table()),
                    filter.joins
                ),
                Params::Positional(filter.params),
            )
            .await?;

        Ok(count.unwrap_or(0) as usize)
    }

    async fn fetch_page(
        &self,
        filter: &ProductFilter,
        sort: &SortOrder,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Product>, Error> {
        if !self.supports_sort_field(sort.field()) {
            return Err(Error::UnsupportedSortField(sort.field().to_owned()));
        }

        let schema = self.schema().await?;
        let FilterSql { joins, mut params } = self.filter_sql(filter, schema)?;
        let mut connection = self.acquire_connection().await?;

        params.extend([
            Value::from(page_size as u64),
            Value::from(page.saturating_sub(1) as u64 * page_size as u64),
        ]);

        let rows: Vec<(u64, String, Option<String>, Option<String>, Option<String>)> = connection
            .exec(
                format!(
                    "SELECT e.entity_id, e.type_id, e.sku, CAST(e.created_at AS CHAR), \
                     CAST(e.updated_at AS CHAR) FROM {} e{joins} \
                     ORDER BY e.{} {}, e.entity_id ASC LIMIT ? OFFSET ?",
                    self.table(BackendType::Static.table()),
                    sort.field(),
                    sort.direction().as_sql()
                ),
                Params::Positional(params),
            )
            .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut positions = HashMap::with_capacity(rows.len());
        let mut products = Vec::with_capacity(rows.len());

        for (entity_id, type_id, sku, created_at, updated_at) in rows {
            let mut product = Product::new(entity_id as usize, type_id.as_str())
                .with_attribute("entity_id", entity_id as i64)
                .with_attribute("type_id", type_id)
                .with_attribute("sku", sku)
                .with_attribute("updated_at", updated_at);

            if let Some(created_at) = created_at {
                product = product
                    .with_attribute("created_at", created_at.as_str())
                    .with_created_at(created_at);
            }

            positions.insert(entity_id, products.len());
            products.push(product);
        }

        self.load_values(&mut connection, schema, &mut products, &positions)
            .await?;
        self.load_stock(&mut connection, &mut products, &positions)
            .await?;
        self.load_categories(&mut connection, &mut products, &positions)
            .await?;
        self.load_prices(&mut connection, &mut products, &positions)
            .await?;
        self.load_request_paths(&mut connection, &mut products, &positions)
            .await?;

        Ok(products)
    }

    fn supports_sort_field(&self, field: &str) -> bool {
        SORTABLE_COLUMNS.contains(&field)
    }
}

fn build_schema(rows: Vec<AttributeRow>, options: Vec<(u64, u64, Option<String>)>) -> EavSchema {
    let mut labels: HashMap<u64, HashMap<String, String>> = HashMap::new();

    for (attribute_id, option_id, label) in options {
        if let Some(label) = label {
            labels
                .entry(attribute_id)
                .or_default()
                .insert(option_id.to_string(), label);
        }
    }

    let mut schema = EavSchema::default();

    for code in STATIC_ATTRIBUTES {
        schema
            .repository
            .add_attribute(code, AttributeMetadata::plain());
    }

    for (id, code, backend, frontend_input, source_model) in rows {
        let table_options = uses_option_table(source_model.as_deref());

        let metadata = match (code.as_str(), frontend_input.as_deref()) {
            (VISIBILITY_ATTRIBUTE, _) => {
                AttributeMetadata::with_options(OptionSource::Select(fixed_labels(&VISIBILITY_LABELS)))
            }
            (STATUS_ATTRIBUTE, _) => {
                AttributeMetadata::with_options(OptionSource::Select(fixed_labels(&STATUS_LABELS)))
            }
            (_, Some("boolean")) => AttributeMetadata::with_options(OptionSource::Boolean),
            (_, Some("select")) if table_options => AttributeMetadata::with_options(
                OptionSource::Select(labels.remove(&id).unwrap_or_default()),
            ),
            (_, Some("multiselect")) if table_options => AttributeMetadata::with_options(
                OptionSource::Multiselect(labels.remove(&id).unwrap_or_default()),
            ),
            // Labels of other source models live in application code, raw values are exported
            _ => AttributeMetadata::plain(),
        };

        schema.attributes.push(EavAttribute {
            id,
            code: code.clone(),
            backend: BackendType::from_name(&backend),
        });
        schema.repository.add_attribute(code, metadata);
    }

    schema
}

fn uses_option_table(source_model: Option<&str>) -> bool {
    match source_model {
        None | Some("") => true,
        Some(model) => model.trim_start_matches('\\') == TABLE_SOURCE_MODEL,
    }
}

fn fixed_labels(labels: &[(&str, &str)]) -> HashMap<String, String> {
    labels
        .iter()
        .map(|(code, label)| (code.to_string(), label.to_string()))
        .collect()
}

fn field_value(backend: BackendType, value: Value) -> FieldValue {
    match (backend, value) {
        (_, Value::NULL) => FieldValue::Null,
        (BackendType::Int, Value::Int(value)) => FieldValue::Int(value),
        (BackendType::Int, Value::UInt(value)) => FieldValue::Int(value as i64),
        (BackendType::Decimal, Value::Bytes(value)) => {
            FieldValue::from(parse_decimal(String::from_utf8(value).ok()))
        }
        (_, Value::Bytes(value)) => String::from_utf8_lossy(&value).into_owned().into(),
        (_, Value::Float(value)) => FieldValue::Float(value as f64),
        (_, Value::Double(value)) => FieldValue::Float(value),
        (_, Value::Int(value)) => FieldValue::Int(value),
        (_, Value::UInt(value)) => FieldValue::Int(value as i64),
        (_, other) => other.as_sql(true).trim_matches('\'').to_owned().into(),
    }
}

fn parse_decimal(value: Option<String>) -> Option<f64> {
    value.and_then(|value| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldContext, FieldResolver};
    use smallvec::smallvec;

    fn store(prefix: &str) -> MySqlCatalogStore {
        MySqlCatalogStore::new(
            mysql_async::OptsBuilder::default().ip_or_hostname("localhost"),
        )
        .with_table_prefix(prefix)
    }

    fn schema() -> EavSchema {
        build_schema(
            vec![
                attribute(73, "name", "varchar", "text", None),
                attribute(97, "status", "int", "select", Some(STATUS_SOURCE_MODEL)),
                attribute(99, "visibility", "int", "select", Some(VISIBILITY_SOURCE_MODEL)),
                attribute(83, "color", "int", "select", None),
                attribute(140, "material", "varchar", "multiselect", Some(TABLE_SOURCE_MODEL)),
                attribute(141, "is_new", "int", "boolean", None),
                attribute(74, "sku", "static", "text", None),
                attribute(
                    105,
                    "country_of_manufacture",
                    "varchar",
                    "select",
                    Some("Magento\\Catalog\\Model\\Product\\Attribute\\Source\\Countryofmanufacture"),
                ),
            ],
            vec![(83, 10, Some("Red".into())), (140, 20, Some("Cotton".into()))],
        )
    }

    const STATUS_SOURCE_MODEL: &str =
        "Magento\\Catalog\\Model\\Product\\Attribute\\Source\\Status";
    const VISIBILITY_SOURCE_MODEL: &str = "Magento\\Catalog\\Model\\Product\\Visibility";

    fn attribute(
        id: u64,
        code: &str,
        backend: &str,
        input: &str,
        source_model: Option<&str>,
    ) -> AttributeRow {
        (
            id,
            code.into(),
            backend.into(),
            Some(input.into()),
            source_model.map(str::to_owned),
        )
    }

    #[tokio::test]
    async fn builds_attribute_repository_with_option_sources() {
        let schema = schema();
        let repository = &schema.repository;

        assert_eq!(
            (
                repository.get("color").and_then(AttributeMetadata::options),
                repository.get("is_new").and_then(AttributeMetadata::options),
                repository.get("name").map(AttributeMetadata::uses_source),
                repository.get("entity_id").is_some(),
            ),
            (
                Some(&OptionSource::Select(HashMap::from([(
                    "10".to_owned(),
                    "Red".to_owned()
                )]))),
                Some(&OptionSource::Boolean),
                Some(false),
                true
            )
        );
    }

    #[test]
    fn resolves_labels_of_source_model_attributes() {
        let context = FieldContext::default().with_attributes(schema().repository);
        let product = Product::new(1, "simple")
            .with_attribute("visibility", 4i64)
            .with_attribute("status", 1i64)
            .with_attribute("color", 10i64)
            .with_attribute("country_of_manufacture", "DE");
        let resolver = FieldResolver::new();

        assert_eq!(
            ["visibility", "status", "color", "country_of_manufacture"]
                .into_iter()
                .map(|field| resolver.resolve(&product, field, &context))
                .collect::<Vec<_>>(),
            vec![
                Ok(FieldValue::from("Catalog, Search")),
                Ok(FieldValue::from("Enabled")),
                Ok(FieldValue::from("Red")),
                Ok(FieldValue::from("DE")),
            ]
        );
    }

    #[test]
    fn treats_only_option_table_as_stored_labels() {
        assert_eq!(
            vec![
                uses_option_table(None),
                uses_option_table(Some(TABLE_SOURCE_MODEL)),
                uses_option_table(Some(STATUS_SOURCE_MODEL)),
            ],
            vec![true, true, false]
        );
    }

    #[tokio::test]
    async fn groups_attributes_by_value_table() {
        let schema = schema();

        assert_eq!(
            (
                schema.ids_for(BackendType::Int),
                schema.ids_for(BackendType::Varchar),
                schema.ids_for(BackendType::Static)
            ),
            (vec![97, 99, 83, 141], vec![73, 140, 105], vec![74])
        );
    }

    #[tokio::test]
    async fn builds_no_joins_for_empty_filter() -> Result<(), Error> {
        assert_eq!(
            store("").filter_sql(&ProductFilter::default(), &schema())?,
            FilterSql::default()
        );

        Ok(())
    }

    #[tokio::test]
    async fn joins_stock_and_status_for_saleable_filter() -> Result<(), Error> {
        let filter = ProductFilter::new(true, None);
        let sql = store("mg_").filter_sql(&filter, &schema())?;

        assert!(sql.joins.contains("INNER JOIN mg_cataloginventory_stock_status stock"));
        assert!(sql.joins.contains("stock.stock_id = ?"));
        assert!(sql.joins.contains("INNER JOIN mg_catalog_product_entity_int status"));
        assert_eq!(
            sql.params,
            vec![
                Value::from(0u32),
                Value::from(1u32),
                Value::from(1u8),
                Value::from(97u64),
                Value::from(1u8)
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn joins_visibility_with_single_code() -> Result<(), Error> {
        let filter = ProductFilter::new(
            false,
            Some(smallvec![Visibility::InCatalog, Visibility::InSearch]),
        );
        let sql = store("").filter_sql(&filter, &schema())?;

        assert!(sql.joins.contains("INNER JOIN catalog_product_entity_int visibility"));
        assert_eq!(sql.params, vec![Value::from(99u64), Value::from(4u8)]);

        Ok(())
    }

    #[tokio::test]
    async fn accepts_only_entity_columns_for_sorting() {
        let store = store("");

        assert!(store.supports_sort_field("sku"));
        assert!(store.supports_sort_field("created_at"));
        assert!(!store.supports_sort_field("name"));
        assert!(!store.supports_sort_field("entity_id; DROP TABLE"));
    }

    #[test]
    fn converts_stored_values_by_backend_type() {
        assert_eq!(
            vec![
                field_value(BackendType::Int, Value::Int(10)),
                field_value(BackendType::Varchar, Value::Bytes(b"Shirt".to_vec())),
                field_value(BackendType::Decimal, Value::Bytes(b"12.5000".to_vec())),
                field_value(BackendType::Text, Value::NULL),
            ],
            vec![
                FieldValue::Int(10),
                FieldValue::from("Shirt"),
                FieldValue::Float(12.5),
                FieldValue::Null
            ]
        );
    }
}
