#[cfg(any(feature = "test_util", test))]
#[macro_use]
pub mod test_util;

pub mod app;
pub mod catalog;
pub mod error;
pub mod field;
pub mod filter;
pub mod output;
pub mod sync;

pub const RECORD_FIELDS_BUFFER_SIZE: usize = 16;
