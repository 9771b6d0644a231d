mod block_processor;
mod genesis;
mod pipeline;

pub use block_processor::{BlockProcessor, BlockSummary};
pub use genesis::genesis_document;
pub use pipeline::IngestionPipeline;
