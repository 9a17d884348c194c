use crate::error::Error;
use crate::output::{JsonOutput, MessagePack, Output};
use crate::sync::Batch;
use tokio::io::AsyncWrite;

#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub enum ApplicationOutput {
    #[default]
    Json,
    Binary,
}

impl Output for ApplicationOutput {
    async fn write<T: AsyncWrite + Unpin>(
        &self,
        writer: &mut T,
        batch: Batch,
    ) -> Result<(), Error> {
        match self {
            Self::Json => JsonOutput.write(writer, batch).await,
            Self::Binary => MessagePack.write(writer, batch).await,
        }
    }
}
