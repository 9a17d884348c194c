use crate::error::Error;
use crate::sync::Batch;
use tokio::sync::mpsc::Sender;

/// Hands over exported batches to transport
pub trait BatchSender {
    async fn send(&self, batch: Batch) -> Result<(), Error>;
}

impl BatchSender for Sender<Batch> {
    async fn send(&self, batch: Batch) -> Result<(), Error> {
        Sender::send(self, batch)
            .await
            .map_err(|_| Error::Synchronization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::channel;

    #[tokio::test]
    async fn forwards_batches_into_channel() -> Result<(), Error> {
        let (sender, mut receiver) = channel(2);

        BatchSender::send(&sender, Batch::new(1, vec![])).await?;

        assert_eq!(receiver.recv().await, Some(Batch::new(1, vec![])));

        Ok(())
    }

    #[tokio::test]
    async fn reports_synchronization_error_when_receiver_is_gone() {
        let (sender, receiver) = channel(2);
        drop(receiver);

        assert!(matches!(
            BatchSender::send(&sender, Batch::new(1, vec![])).await,
            Err(Error::Synchronization)
        ));
    }
}
