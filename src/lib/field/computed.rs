use crate::catalog::{FieldValue, Product, Timestamp};
use crate::error::FieldError;
use crate::field::{FieldContext, FieldHandler, FieldResolver};

const IMAGE_PATH: &str = "catalog/product";
const IMAGE_ATTRIBUTES: [&str; 3] = ["image", "small_image", "thumbnail"];

/// Built-in fields derived from product data instead of a single attribute.
///
/// Price related fields never fail: any error while reading prices is
/// reported as `0` for `price` and `list_price` and as `false` for `on_sale`.
/// Other fields report errors to the caller.
pub struct ComputedFieldLibrary;

impl ComputedFieldLibrary {
    pub const HANDLERS: [(&'static str, FieldHandler); 7] = [
        ("price", price),
        ("list_price", list_price),
        ("image", image),
        ("url", url),
        ("categories", categories),
        ("age", age),
        ("on_sale", on_sale),
    ];

    pub fn register(resolver: FieldResolver) -> FieldResolver {
        Self::HANDLERS
            .into_iter()
            .fold(resolver, |resolver, (field, handler)| {
                resolver.with_handler(field, handler)
            })
    }

    pub fn resolver() -> FieldResolver {
        Self::register(FieldResolver::new())
    }
}

fn price(product: &Product, _context: &FieldContext) -> Result<FieldValue, FieldError> {
    Ok(FieldValue::Float(product.final_price().unwrap_or(0.0)))
}

fn list_price(product: &Product, _context: &FieldContext) -> Result<FieldValue, FieldError> {
    let price = if product.is_configurable() {
        product.regular_price()
    } else {
        product.price()
    };

    Ok(FieldValue::Float(price.unwrap_or(0.0)))
}

fn image(product: &Product, context: &FieldContext) -> Result<FieldValue, FieldError> {
    let path = IMAGE_ATTRIBUTES
        .iter()
        .find_map(|attribute| product.attribute_str(attribute))
        .unwrap_or_default();

    Ok(FieldValue::String(format!(
        "{}{IMAGE_PATH}{path}",
        context.media_url()
    )))
}

fn url(product: &Product, context: &FieldContext) -> Result<FieldValue, FieldError> {
    Ok(FieldValue::String(match product.request_path() {
        Some(path) => format!("{}{}", context.base_url(), path),
        None => format!(
            "{}catalog/product/view/id/{}",
            context.base_url(),
            product.entity_id()
        ),
    }))
}

fn categories(product: &Product, _context: &FieldContext) -> Result<FieldValue, FieldError> {
    Ok(FieldValue::Ids(product.category_ids().to_vec()))
}

fn age(product: &Product, context: &FieldContext) -> Result<FieldValue, FieldError> {
    let created_at = Timestamp::parse(product.created_at().unwrap_or_default())?;

    Ok(FieldValue::Int(created_at.days_until(context.now())))
}

fn on_sale(product: &Product, _context: &FieldContext) -> Result<FieldValue, FieldError> {
    Ok(FieldValue::Bool(
        match (product.final_price(), product.price()) {
            (Ok(final_price), Ok(price)) => final_price < price,
            _ => false,
        },
    ))
}
