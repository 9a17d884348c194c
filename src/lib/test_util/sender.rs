use crate::error::Error;
use crate::sync::{Batch, BatchSender};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Batch sender that keeps every received batch in memory
#[derive(Default, Clone)]
pub struct TestBatchSender {
    batches: Arc<Mutex<Vec<Batch>>>,
}

impl TestBatchSender {
    pub async fn batches(&self) -> MutexGuard<'_, Vec<Batch>> {
        self.batches.lock().await
    }
}

impl BatchSender for TestBatchSender {
    async fn send(&self, batch: Batch) -> Result<(), Error> {
        let mut batches = self.batches.lock().await;
        batches.push(batch);

        Ok(())
    }
}
