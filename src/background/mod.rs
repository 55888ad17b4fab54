pub mod boundary;

#[cfg(feature = "tokio-runtime")]
pub use boundary::FileFetcher;
pub use boundary::{BoundaryFetcher, BoundaryLoader, BoundaryState, HttpFetcher};
