use crate::catalog::{FieldValue, Visibility};
use crate::error::FieldError;
use std::collections::HashMap;

pub const CONFIGURABLE_TYPE: &str = "configurable";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceInfo {
    price: Option<f64>,
    final_price: Option<f64>,
    regular_price: Option<f64>,
}

impl PriceInfo {
    pub fn new(price: Option<f64>, final_price: Option<f64>, regular_price: Option<f64>) -> Self {
        Self {
            price,
            final_price,
            regular_price,
        }
    }
}

/// Single catalog product as loaded by a catalog store
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    entity_id: usize,
    type_id: String,
    created_at: Option<String>,
    visibility: Visibility,
    saleable: bool,
    attributes: HashMap<String, FieldValue>,
    category_ids: Vec<usize>,
    price_info: PriceInfo,
    request_path: Option<String>,
}

impl Product {
    pub fn new(entity_id: usize, type_id: impl Into<String>) -> Self {
        Self {
            entity_id,
            type_id: type_id.into(),
            created_at: None,
            visibility: Visibility::default(),
            saleable: true,
            attributes: HashMap::new(),
            category_ids: Vec::new(),
            price_info: PriceInfo::default(),
            request_path: None,
        }
    }

    pub fn with_attribute(mut self, code: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set_attribute(code, value);
        self
    }

    pub fn with_created_at(self, created_at: impl Into<String>) -> Self {
        Self {
            created_at: Some(created_at.into()),
            ..self
        }
    }

    pub fn with_visibility(self, visibility: Visibility) -> Self {
        Self { visibility, ..self }
    }

    pub fn with_saleable(self, saleable: bool) -> Self {
        Self { saleable, ..self }
    }

    pub fn with_category_ids(self, category_ids: impl IntoIterator<Item = usize>) -> Self {
        Self {
            category_ids: category_ids.into_iter().collect(),
            ..self
        }
    }

    pub fn with_price_info(self, price_info: PriceInfo) -> Self {
        Self { price_info, ..self }
    }

    pub fn with_request_path(self, request_path: impl Into<String>) -> Self {
        Self {
            request_path: Some(request_path.into()),
            ..self
        }
    }

    pub fn set_attribute(&mut self, code: impl Into<String>, value: impl Into<FieldValue>) {
        self.attributes.insert(code.into(), value.into());
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn set_saleable(&mut self, saleable: bool) {
        self.saleable = saleable;
    }

    pub fn add_category_id(&mut self, category_id: usize) {
        self.category_ids.push(category_id);
    }

    pub fn set_price_info(&mut self, price_info: PriceInfo) {
        self.price_info = price_info;
    }

    pub fn set_request_path(&mut self, request_path: impl Into<String>) {
        self.request_path = Some(request_path.into());
    }

    pub fn entity_id(&self) -> usize {
        self.entity_id
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn is_configurable(&self) -> bool {
        self.type_id == CONFIGURABLE_TYPE
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_saleable(&self) -> bool {
        self.saleable
    }

    pub fn attribute(&self, code: impl AsRef<str>) -> Option<&FieldValue> {
        self.attributes.get(code.as_ref())
    }

    /// Non-empty string value of an attribute
    pub fn attribute_str(&self, code: impl AsRef<str>) -> Option<&str> {
        self.attribute(code)
            .and_then(FieldValue::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn category_ids(&self) -> &[usize] {
        &self.category_ids
    }

    pub fn request_path(&self) -> Option<&str> {
        self.request_path.as_deref()
    }

    pub fn price(&self) -> Result<f64, FieldError> {
        self.price_info
            .price
            .ok_or(FieldError::PriceUnavailable("price"))
    }

    pub fn final_price(&self) -> Result<f64, FieldError> {
        self.price_info
            .final_price
            .ok_or(FieldError::PriceUnavailable("final_price"))
    }

    /// Regular price component of the computed price breakdown
    pub fn regular_price(&self) -> Result<f64, FieldError> {
        self.price_info
            .regular_price
            .ok_or(FieldError::PriceUnavailable("regular_price"))
    }
}
