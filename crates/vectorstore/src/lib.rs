pub mod client;
pub mod collection;
pub mod retry;

pub use client::VectorStoreClient;
pub use collection::collection_name;
