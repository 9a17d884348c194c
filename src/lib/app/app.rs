use crate::app::{ApplicationConfig, ApplicationOutput};
use crate::catalog::CatalogStore;
use crate::error::Error;
use crate::field::{ComputedFieldLibrary, FieldContext, FieldHandler, FieldResolver};
use crate::filter::FilterBuilder;
use crate::output::Output;
use crate::sync::{
    Batch, BatchExporter, BatchSender, ExportStats, NoopObserver, PageObserver, SyncConfig,
};

use serde_json::json;
use tokio::io::{stdout, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{channel, Sender};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::info;

const BATCH_CHANNEL_CAPACITY: usize = 16;

pub enum ApplicationCommand {
    Export(ApplicationConfig, ApplicationOutput),
    Count(ApplicationConfig),
}

pub struct Application<O = NoopObserver>
where
    O: PageObserver,
{
    resolver: FieldResolver,
    observer: O,
}

fn create_writer<W>(
    output: ApplicationOutput,
    mut writer: W,
) -> (Sender<Batch>, JoinHandle<Result<(), Error>>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (sender, receiver) = channel(BATCH_CHANNEL_CAPACITY);

    let handle = tokio::spawn(async move {
        let mut batches = ReceiverStream::new(receiver);

        while let Some(batch) = batches.next().await {
            output.write(&mut writer, batch).await?;
        }

        writer.flush().await?;
        Ok(())
    });

    (sender, handle)
}

impl Application {
    pub fn new() -> Self {
        Self {
            resolver: ComputedFieldLibrary::resolver(),
            observer: NoopObserver,
        }
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> Application<O>
where
    O: PageObserver,
{
    /// Overrides how a single field is resolved for every exported product
    pub fn with_field_handler(self, field: impl Into<String>, handler: FieldHandler) -> Self {
        Self {
            resolver: self.resolver.with_handler(field, handler),
            ..self
        }
    }

    pub fn with_observer<N: PageObserver>(self, observer: N) -> Application<N> {
        Application {
            resolver: self.resolver,
            observer,
        }
    }

    /// Exports every matching product of `store` into `sender`
    pub async fn export(
        self,
        store: &impl CatalogStore,
        config: SyncConfig,
        context: FieldContext,
        sender: &impl BatchSender,
    ) -> Result<ExportStats, Error> {
        BatchExporter::open(store, config, &self.resolver, context, self.observer)
            .await?
            .run(sender)
            .await
    }

    /// Exports into `writer` formatted by `output` from a separate task
    pub async fn export_to_writer<W>(
        self,
        store: &impl CatalogStore,
        config: SyncConfig,
        context: FieldContext,
        output: ApplicationOutput,
        writer: W,
    ) -> Result<ExportStats, Error>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (sender, handle) = create_writer(output, writer);
        let result = self.export(store, config, context, &sender).await;

        drop(sender);
        // A failed writer closes the channel, its error is the cause of a failed send
        handle.await.map_err(|_| Error::Synchronization)??;

        result
    }

    pub async fn run(self, command: ApplicationCommand) -> Result<(), Error> {
        match command {
            ApplicationCommand::Export(config, output) => {
                let store = config.create_store();
                let stats = self
                    .export_to_writer(
                        &store,
                        config.sync().clone(),
                        config.field_context(),
                        output,
                        stdout(),
                    )
                    .await?;

                info!(
                    records = stats.records,
                    duplicates = stats.duplicates,
                    "Catalog feed is written"
                );
            }
            ApplicationCommand::Count(config) => {
                let store = config.create_store();
                let count = store.count(&FilterBuilder::build(config.sync())).await?;

                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({ "count": count }))
                        .map_err(|_| Error::OutputError)?
                );
            }
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldValue, Product, Timestamp};
    use crate::error::FieldError;
    use crate::field::Clock;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use crate::test_util::{
        standard_attributes, InMemoryCatalogStore, PageObserverSpy, TestBatchSender,
    };

    fn context() -> FieldContext {
        FieldContext::new("https://shop.test/", "https://shop.test/media/")
            .with_clock(Clock::Fixed(Timestamp::new(1672617600)))
    }

    fn store() -> InMemoryCatalogStore {
        InMemoryCatalogStore::default()
            .with_attributes(standard_attributes())
            .with_products((1..=3).map(|id| {
                Product::new(id, "simple").with_created_at("2023-01-01 00:00:00")
            }))
    }

    fn shouting_name(
        product: &Product,
        _context: &FieldContext,
    ) -> Result<FieldValue, FieldError> {
        Ok(product
            .attribute_str("name")
            .unwrap_or("unnamed")
            .to_uppercase()
            .into())
    }

    #[tokio::test]
    async fn exports_with_custom_field_handler() -> Result<(), Error> {
        let sender = TestBatchSender::default();

        Application::new()
            .with_field_handler("name", shouting_name)
            .export(&store(), SyncConfig::default(), context(), &sender)
            .await?;

        assert_eq!(
            sender.batches().await[0].records()[0].get("name"),
            Some(&FieldValue::from("UNNAMED"))
        );

        Ok(())
    }

    #[tokio::test]
    async fn notifies_configured_observer() -> Result<(), Error> {
        let observer = PageObserverSpy::default();

        let stats = Application::new()
            .with_observer(observer.clone())
            .export(
                &store(),
                SyncConfig::default().with_page_size(2),
                context(),
                &TestBatchSender::default(),
            )
            .await?;

        assert_eq!(stats.batches, 2);
        assert_eq!(
            observer.pages(),
            vec![
                ("product".to_owned(), vec![1, 2]),
                ("product".to_owned(), vec![3])
            ]
        );

        Ok(())
    }

    struct BrokenPipe;

    impl AsyncWrite for BrokenPipe {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::ErrorKind::BrokenPipe.into()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn writes_json_lines_into_writer() -> Result<(), Error> {
        let stats = Application::new()
            .export_to_writer(
                &store(),
                SyncConfig::default().with_page_size(2),
                context(),
                ApplicationOutput::Json,
                Vec::new(),
            )
            .await?;

        assert_eq!((stats.batches, stats.records), (2, 3));

        Ok(())
    }

    #[tokio::test]
    async fn reports_writer_failure_instead_of_closed_channel() {
        let result = Application::new()
            .export_to_writer(
                &store(),
                SyncConfig::default().with_page_size(1),
                context(),
                ApplicationOutput::Json,
                BrokenPipe,
            )
            .await;

        assert!(
            matches!(&result, Err(Error::Io(error)) if error.kind() == std::io::ErrorKind::BrokenPipe),
            "unexpected result {result:?}"
        );
    }

    #[tokio::test]
    async fn delivers_batches_through_channel() -> Result<(), Error> {
        let (sender, mut receiver) = channel::<Batch>(BATCH_CHANNEL_CAPACITY);

        Application::new()
            .export(&store(), SyncConfig::default(), context(), &sender)
            .await?;
        drop(sender);

        let batch = receiver.recv().await.ok_or(Error::Synchronization)?;

        assert_eq!((batch.page(), batch.len()), (1, 3));
        assert!(receiver.recv().await.is_none());

        Ok(())
    }
}
