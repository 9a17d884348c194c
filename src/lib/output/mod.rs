mod json;
mod msgpack;

use crate::error::Error;
use crate::sync::Batch;
pub use json::*;
pub use msgpack::*;

use tokio::io::AsyncWrite;

/// Entity name written into every batch header
pub const PRODUCT_ENTITY: &str = "product";

pub trait Output {
    async fn write<T: AsyncWrite + Unpin>(&self, writer: &mut T, batch: Batch)
        -> Result<(), Error>;
}
