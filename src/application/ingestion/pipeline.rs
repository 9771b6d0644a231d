use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;

use super::block_processor::{BlockProcessor, BlockSummary};
use super::genesis;
use crate::domain::errors::IngestError;
use crate::domain::models::ExecutedBlock;
use crate::domain::services::{ActionClassifier, BlockDecoder, DecoderFactory};
use crate::infrastructure::persistence::DbPool;
use crate::utils::logging;

#[derive(Default)]
struct Session {
    decoder: Option<Arc<dyn BlockDecoder>>,
}

/// Ingestion session: owns the decoder and serializes all block writes.
///
/// Every entry point takes the session lock, so at most one genesis reset
/// or block is in flight at any time.
pub struct IngestionPipeline {
    session: Mutex<Session>,
    factory: Arc<dyn DecoderFactory>,
    conn: DatabaseConnection,
    processor: BlockProcessor,
    timeout: Duration,
}

impl IngestionPipeline {
    pub fn new(
        conn: DatabaseConnection,
        factory: Arc<dyn DecoderFactory>,
        classifier: ActionClassifier,
        timeout: Duration,
    ) -> Self {
        Self {
            session: Mutex::new(Session::default()),
            factory,
            conn,
            processor: BlockProcessor::new(classifier, timeout),
            timeout,
        }
    }

    /// Pipeline with the default action handlers
    pub fn from_pool(pool: &DbPool, factory: Arc<dyn DecoderFactory>) -> Self {
        Self::new(
            pool.get_connection().clone(),
            factory,
            ActionClassifier::with_default_handlers(),
            pool.store_timeout(),
        )
    }

    /// Build a decoder for `genesis` and persist the genesis document.
    ///
    /// Calling this again replaces both the decoder and the stored document.
    /// On failure the previous decoder stays in place.
    pub async fn initialize(&self, genesis: &[u8]) -> Result<(), IngestError> {
        let mut session = self.session.lock().await;

        let decoder = self.factory.initialize(genesis).map_err(|e| {
            logging::log_error(&format!("Rejected genesis data: {}", e));
            e
        })?;
        genesis::store_genesis(&self.conn, genesis, self.timeout).await?;

        let replaced = session.decoder.replace(decoder).is_some();
        logging::log_info(if replaced {
            "Decoder re-initialized from new genesis data"
        } else {
            "Decoder initialized from genesis data"
        });
        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        self.session.lock().await.decoder.is_some()
    }

    /// Ingest an already decoded block
    pub async fn ingest(&self, block: &ExecutedBlock) -> Result<BlockSummary, IngestError> {
        let session = self.session.lock().await;
        let decoder = session.decoder.clone().ok_or(IngestError::NotInitialized)?;
        self.ingest_locked(decoder.as_ref(), block).await
    }

    /// Decode raw block bytes with the current decoder, then ingest them
    pub async fn ingest_raw(&self, raw: &[u8]) -> Result<BlockSummary, IngestError> {
        let session = self.session.lock().await;
        let decoder = session.decoder.clone().ok_or(IngestError::NotInitialized)?;

        let block = decoder.decode_block(raw).map_err(|e| {
            logging::log_error(&format!("Failed to decode block: {}", e));
            e
        })?;
        self.ingest_locked(decoder.as_ref(), &block).await
    }

    async fn ingest_locked(
        &self,
        decoder: &dyn BlockDecoder,
        block: &ExecutedBlock,
    ) -> Result<BlockSummary, IngestError> {
        logging::log_debug(&format!(
            "Ingesting block {} ({} txs)",
            block.height,
            block.transactions.len()
        ));
        if block.is_genesis() {
            genesis::reset_for_genesis(&self.conn, self.timeout).await?;
        }

        self.processor
            .process(&self.conn, decoder, block)
            .await
            .map_err(|e| {
                logging::log_error(&format!("Block {} failed: {}", block.height, e));
                e
            })
    }
}
