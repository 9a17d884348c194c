use mysql_async::Error as MySQLError;
use std::borrow::Cow;
use thiserror::Error;

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog store is unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Sort by {0} is not supported by catalog store")]
    UnsupportedSortField(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(Cow<'static, str>),
    #[error("Product {entity_id} cannot be exported")]
    ItemFailed {
        entity_id: usize,
        #[source]
        source: FieldError,
    },
    #[error("Failed to write batch output")]
    OutputError,
    #[error("Batch writer stopped unexpectedly")]
    Synchronization,
}

impl From<MySQLError> for Error {
    fn from(value: MySQLError) -> Self {
        Error::StoreUnavailable(Box::new(value))
    }
}

impl Error {
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum FieldError {
    #[error("Field {0} is not an attribute or computed field")]
    UnknownField(String),
    #[error("Price component {0} is not available")]
    PriceUnavailable(&'static str),
    #[error("Cannot parse {0:?} as product creation date")]
    InvalidCreatedAt(String),
    #[error("Attribute {0} has no value")]
    MissingAttribute(&'static str),
}
