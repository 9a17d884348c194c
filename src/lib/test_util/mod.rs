#[macro_use]
mod macros;
mod observer;
mod sender;
mod store;

pub use observer::PageObserverSpy;
pub use sender::TestBatchSender;
pub use store::{standard_attributes, InMemoryCatalogStore};
