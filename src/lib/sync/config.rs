use crate::catalog::{SortDirection, SortOrder};
use serde::de::{Error, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt::Formatter;

pub const DEFAULT_FIELDS: [&str; 11] = [
    "name",
    "description",
    "price",
    "list_price",
    "image",
    "url",
    "categories",
    "brand",
    "sku",
    "age",
    "on_sale",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityMode {
    InCatalog,
    InSearch,
    Both,
    #[default]
    Unset,
}

/// What happens to a product when one of its fields without fallback fails
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemErrorPolicy {
    #[default]
    Skip,
    Abort,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    saleable_only: bool,
    visibility: VisibilityMode,
    #[serde(deserialize_with = "deserialize_additional_fields")]
    additional_fields: Vec<String>,
    #[serde(deserialize_with = "deserialize_page_size")]
    page_size: usize,
    sort_field: String,
    sort_direction: SortDirection,
    on_item_error: ItemErrorPolicy,
    fetch_retries: u32,
    field_map: BTreeMap<String, String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            saleable_only: false,
            visibility: VisibilityMode::Unset,
            additional_fields: Vec::new(),
            page_size: Self::default_page_size(),
            sort_field: "entity_id".into(),
            sort_direction: SortDirection::Asc,
            on_item_error: ItemErrorPolicy::Skip,
            fetch_retries: 0,
            field_map: BTreeMap::from([("entity_id".to_owned(), "id".to_owned())]),
        }
    }
}

impl SyncConfig {
    fn default_page_size() -> usize {
        100
    }

    pub fn with_saleable_only(self, saleable_only: bool) -> Self {
        Self {
            saleable_only,
            ..self
        }
    }

    pub fn with_visibility(self, visibility: VisibilityMode) -> Self {
        Self { visibility, ..self }
    }

    /// Comma separated list of fields exported after the default ones
    pub fn with_additional_fields(self, fields: &str) -> Self {
        Self {
            additional_fields: parse_additional_fields(fields),
            ..self
        }
    }

    /// Zero page size is replaced with the default one
    pub fn with_page_size(self, page_size: usize) -> Self {
        Self {
            page_size: if page_size == 0 {
                Self::default_page_size()
            } else {
                page_size
            },
            ..self
        }
    }

    pub fn with_sort(self, field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            sort_field: field.into(),
            sort_direction: direction,
            ..self
        }
    }

    pub fn with_item_error_policy(self, on_item_error: ItemErrorPolicy) -> Self {
        Self {
            on_item_error,
            ..self
        }
    }

    pub fn with_fetch_retries(self, fetch_retries: u32) -> Self {
        Self {
            fetch_retries,
            ..self
        }
    }

    pub fn with_field_alias(mut self, field: impl Into<String>, alias: impl Into<String>) -> Self {
        self.field_map.insert(field.into(), alias.into());
        self
    }

    pub fn saleable_only(&self) -> bool {
        self.saleable_only
    }

    pub fn visibility(&self) -> VisibilityMode {
        self.visibility
    }

    pub fn additional_fields(&self) -> &[String] {
        &self.additional_fields
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn sort_order(&self) -> SortOrder {
        SortOrder::new(self.sort_field.as_str(), self.sort_direction)
    }

    pub fn item_error_policy(&self) -> ItemErrorPolicy {
        self.on_item_error
    }

    pub fn fetch_retries(&self) -> u32 {
        self.fetch_retries
    }

    /// Name under which a field appears in exported records
    pub fn output_name<'a>(&'a self, field: &'a str) -> &'a str {
        self.field_map
            .get(field)
            .map(String::as_str)
            .unwrap_or(field)
    }

    /// Default fields followed by additional ones, duplicates are kept
    pub fn fields(&self) -> Vec<String> {
        DEFAULT_FIELDS
            .iter()
            .map(|field| field.to_string())
            .chain(self.additional_fields.iter().cloned())
            .collect()
    }
}

pub fn parse_additional_fields(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_owned)
        .collect()
}

fn deserialize_page_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    match usize::deserialize(deserializer)? {
        0 => Err(D::Error::custom("page_size must be a positive number")),
        value => Ok(value),
    }
}

fn deserialize_additional_fields<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FieldsVisitor;

    impl<'de> Visitor<'de> for FieldsVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
            formatter.write_str("comma separated string or list of field names")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(parse_additional_fields(value))
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut fields = Vec::new();

            while let Some(field) = seq.next_element::<String>()? {
                fields.extend(parse_additional_fields(&field));
            }

            Ok(fields)
        }
    }

    deserializer.deserialize_any(FieldsVisitor)
}

impl<'de> Deserialize<'de> for VisibilityMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VisibilityModeVisitor;

        impl<'de> Visitor<'de> for VisibilityModeVisitor {
            type Value = VisibilityMode;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("visibility mode name or Magento visibility code")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                Ok(match value {
                    "in_catalog" | "catalog" | "2" => VisibilityMode::InCatalog,
                    "in_search" | "search" | "3" => VisibilityMode::InSearch,
                    "both" | "4" => VisibilityMode::Both,
                    "unset" | "" => VisibilityMode::Unset,
                    other => {
                        return Err(E::custom(format!("unknown visibility mode \"{other}\"")))
                    }
                })
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: Error,
            {
                Ok(match value {
                    2 => VisibilityMode::InCatalog,
                    3 => VisibilityMode::InSearch,
                    4 => VisibilityMode::Both,
                    other => {
                        return Err(E::custom(format!("unknown visibility mode \"{other}\"")))
                    }
                })
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: Error,
            {
                match u64::try_from(value) {
                    Ok(value) => self.visit_u64(value),
                    Err(_) => Err(E::custom(format!("unknown visibility mode \"{value}\""))),
                }
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: Error,
            {
                Ok(VisibilityMode::Unset)
            }
        }

        deserializer.deserialize_any(VisibilityModeVisitor)
    }
}
