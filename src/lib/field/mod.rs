mod computed;

use crate::catalog::{AttributeRepository, FieldValue, Product, Timestamp};
use crate::error::FieldError;
use std::collections::HashMap;
use std::sync::Arc;

pub use computed::ComputedFieldLibrary;

/// Computes a field value for a product instead of a plain attribute lookup
pub type FieldHandler = fn(&Product, &FieldContext) -> Result<FieldValue, FieldError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(Timestamp),
}

impl Clock {
    pub fn now(&self) -> Timestamp {
        match self {
            Self::System => Timestamp::now(),
            Self::Fixed(timestamp) => *timestamp,
        }
    }
}

/// Store level data available to every field handler
#[derive(Debug, Clone, Default)]
pub struct FieldContext {
    base_url: String,
    media_url: String,
    clock: Clock,
    attributes: Arc<AttributeRepository>,
}

impl FieldContext {
    pub fn new(base_url: impl Into<String>, media_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            media_url: media_url.into(),
            ..Self::default()
        }
    }

    pub fn with_clock(self, clock: Clock) -> Self {
        Self { clock, ..self }
    }

    pub fn with_attributes(self, attributes: impl Into<Arc<AttributeRepository>>) -> Self {
        Self {
            attributes: attributes.into(),
            ..self
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn attributes(&self) -> &AttributeRepository {
        &self.attributes
    }
}

/// Resolves field values with registered handlers taking precedence
/// over generic attribute lookup
#[derive(Clone, Default)]
pub struct FieldResolver {
    handlers: HashMap<String, FieldHandler>,
}

impl FieldResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, field: impl Into<String>, handler: FieldHandler) -> Self {
        self.handlers.insert(field.into(), handler);
        self
    }

    pub fn has_handler(&self, field: impl AsRef<str>) -> bool {
        self.handlers.contains_key(field.as_ref())
    }

    pub fn resolve(
        &self,
        product: &Product,
        field: &str,
        context: &FieldContext,
    ) -> Result<FieldValue, FieldError> {
        if let Some(handler) = self.handlers.get(field) {
            return handler(product, context);
        }

        let metadata = context
            .attributes()
            .get(field)
            .ok_or_else(|| FieldError::UnknownField(field.to_owned()))?;

        let value = match product.attribute(field) {
            Some(value) => value,
            None => return Ok(FieldValue::Null),
        };

        Ok(match metadata.options() {
            Some(options) => options.option_label(value),
            None => value.clone(),
        })
    }
}

impl std::fmt::Debug for FieldResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields: Vec<_> = self.handlers.keys().collect();
        fields.sort();
        f.debug_struct("FieldResolver")
            .field("handlers", &fields)
            .finish()
    }
}
