use crate::error::Error;
use crate::output::{Output, PRODUCT_ENTITY};
use crate::sync::{Batch, Record};

use serde::Serialize;
use serde_json::to_vec;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// JSON lines output for exported batches
pub struct JsonOutput;

#[derive(Serialize)]
struct BatchLine<'a> {
    entity: &'static str,
    page: usize,
    records: &'a [Record],
}

impl Output for JsonOutput {
    async fn write<T: AsyncWrite + Unpin>(
        &self,
        writer: &mut T,
        batch: Batch,
    ) -> Result<(), Error> {
        let line = BatchLine {
            entity: PRODUCT_ENTITY,
            page: batch.page(),
            records: batch.records(),
        };

        writer
            .write_all(&to_vec(&line).map_err(Error::Json)?)
            .await
            .map_err(Error::Io)?;

        writer.write_all(b"\n").await.map_err(Error::Io)?;

        Ok(())
    }
}
