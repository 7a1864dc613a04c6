pub mod capture;
pub mod chunk;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod hash;
pub mod point;
pub mod state;

pub use capture::DefinitionCapture;
pub use chunk::{CodeChunk, DEFAULT_MAX_CHUNK_BYTES, DEFAULT_MIN_COMPONENT_LINES};
pub use config::{ConfigSnapshot, EmbedderProvider};
pub use descriptor::FileDescriptor;
pub use error::{Error, Result};
pub use point::{Payload, ScoredPoint, VectorPoint};
pub use state::{IndexerState, Progress};
