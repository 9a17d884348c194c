use crate::catalog::FieldValue;
use crate::error::Error;
use crate::output::Output;
use crate::sync::{Batch, Record};
use rmp::encode::buffer::ByteBuf;
use rmp::encode::{
    write_array_len, write_bool, write_f64, write_map_len, write_nil, write_sint, write_str,
    write_uint, ValueWriteError,
};
use std::convert::Infallible;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// MessagePack output for exported batches
pub struct MessagePack;

const PRODUCT_ENTITY_BYTE: u64 = 1;

impl Output for MessagePack {
    async fn write<T: AsyncWrite + Unpin>(
        &self,
        writer: &mut T,
        batch: Batch,
    ) -> Result<(), Error> {
        let mut buffer = ByteBuf::with_capacity(4096);
        write_header(&batch, &mut buffer)?;

        for record in batch.records() {
            write_record(&mut buffer, record)?;
        }

        writer.write_all(buffer.as_slice()).await?;
        Ok(())
    }
}

impl From<ValueWriteError<Infallible>> for Error {
    fn from(_value: ValueWriteError<Infallible>) -> Self {
        Error::OutputError
    }
}

impl From<Infallible> for Error {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

fn write_header(batch: &Batch, buffer: &mut ByteBuf) -> Result<(), Error> {
    write_uint(buffer, PRODUCT_ENTITY_BYTE)?;
    write_uint(buffer, batch.page() as u64)?;
    write_uint(buffer, batch.len() as u64)?;
    Ok(())
}

fn write_record(buffer: &mut ByteBuf, record: &Record) -> Result<(), Error> {
    write_map_len(buffer, record.len() as u32)?;

    for (name, value) in record.iter() {
        write_str(buffer, name)?;
        write_value(buffer, value)?;
    }
    Ok(())
}

fn write_value(buffer: &mut ByteBuf, value: &FieldValue) -> Result<(), Error> {
    match value {
        FieldValue::Null => write_nil(buffer)?,
        FieldValue::String(value) => write_str(buffer, value)?,
        FieldValue::Float(value) => write_f64(buffer, *value)?,
        FieldValue::Int(value) => {
            write_sint(buffer, *value)?;
        }
        FieldValue::Bool(value) => write_bool(buffer, *value)?,
        FieldValue::Ids(ids) => {
            write_array_len(buffer, ids.len() as u32)?;
            for id in ids {
                write_uint(buffer, *id as u64)?;
            }
        }
        FieldValue::Labels(labels) => {
            write_array_len(buffer, labels.len() as u32)?;
            for label in labels {
                write_str(buffer, label)?;
            }
        }
    }
    Ok(())
}
