//! Writes one executed block and everything derived from it

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::errors::{HandlerError, IngestError};
use crate::domain::models::{ExecutedBlock, ExecutionResult, Transaction};
use crate::domain::services::{
    ActionClassifier, ActionContext, BlockDecoder, DecodedOutput, ParticipantSet, TxParticipants,
};
use crate::infrastructure::persistence::entities::{actions, blocks, transactions};
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::repositories::{
    action_repository, action_volume_repository, block_repository, transaction_repository,
};
use crate::infrastructure::persistence::timeout::bounded;
use crate::utils::logging;

/// Counters reported after a block has been committed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockSummary {
    pub height: u64,
    pub tx_count: usize,
    pub total_fee: u64,
    pub unique_participants: usize,
    pub actions_written: usize,
    pub actions_failed: usize,
    pub undecodable_outputs: usize,
}

/// Handles processing of individual blocks
#[derive(Debug, Clone)]
pub struct BlockProcessor {
    classifier: ActionClassifier,
    timeout: Duration,
}

impl BlockProcessor {
    pub fn new(classifier: ActionClassifier, timeout: Duration) -> Self {
        Self {
            classifier,
            timeout,
        }
    }

    pub fn classifier(&self) -> &ActionClassifier {
        &self.classifier
    }

    /// Write a block inside one storage transaction.
    ///
    /// Action rows are written under their own savepoint and a failure
    /// there only loses that row. Handlers only see outputs that decoded;
    /// an action without one keeps its row but gets no side-table write.
    /// Handler failures and transaction or block row failures roll back
    /// the whole block.
    pub async fn process(
        &self,
        conn: &DatabaseConnection,
        decoder: &dyn BlockDecoder,
        block: &ExecutedBlock,
    ) -> Result<BlockSummary, IngestError> {
        let txn = bounded("begin_block", self.timeout, conn.begin()).await?;
        let timestamp = block.timestamp();

        let mut summary = BlockSummary {
            height: block.height,
            tx_count: block.transactions.len(),
            ..Default::default()
        };
        let mut participants = ParticipantSet::new();
        let mut touched_types = BTreeSet::new();

        for (tx_index, tx) in block.transactions.iter().enumerate() {
            let result = block.result_for(tx_index);
            if result.is_none() {
                logging::log_warning(&format!(
                    "Block {}: no execution result for tx {}, recording as failed",
                    block.height, tx.tx_hash
                ));
            }
            let success = result.map(|r| r.success).unwrap_or(false);
            let fee = result.map(|r| r.fee).unwrap_or(0);
            summary.total_fee = summary.total_fee.saturating_add(fee);

            let outputs = match result {
                Some(result) if success => self.decode_outputs(decoder, tx, result, &mut summary),
                _ => Vec::new(),
            };

            let mut tx_participants = TxParticipants::default();
            for output in outputs.iter().flatten() {
                tx_participants.record_output(output);
            }
            participants.add_sponsor(&tx.sponsor);
            participants.absorb(&tx_participants);

            let mut action_docs = Vec::with_capacity(tx.actions.len());
            for (action_index, action) in tx.actions.iter().enumerate() {
                let decoded = outputs.get(action_index).and_then(Option::as_ref);
                let output = decoded.cloned().unwrap_or_default();
                let action_name = self.classifier.name_of(action.type_id);

                let row = actions::Model {
                    tx_hash: tx.tx_hash.clone(),
                    action_type: action.type_id as i16,
                    action_index: action_index as i32,
                    action_name: action_name.to_string(),
                    input: action.input.clone(),
                    output: Value::Object(output.clone()),
                    timestamp,
                };
                if self.write_action(&txn, &row).await {
                    summary.actions_written += 1;
                } else {
                    summary.actions_failed += 1;
                }
                touched_types.insert(action.type_id);

                match (success, decoded) {
                    (false, _) => {}
                    (true, None) => {
                        if self.classifier.has_handler(action.type_id) {
                            logging::log_warning(&format!(
                                "Block {}: skipping {} handler for tx {} action {}, output not decoded",
                                block.height, action_name, tx.tx_hash, action_index
                            ));
                        }
                    }
                    (true, Some(decoded)) => {
                        let ctx = ActionContext {
                            action_type: action.type_id,
                            input: &action.input,
                            output: decoded,
                            sponsor: &tx.sponsor,
                            tx_hash: &tx.tx_hash,
                            timestamp,
                        };
                        self.run_handler(&txn, &ctx).await.map_err(|source| {
                            logging::log_error(&format!(
                                "Block {}: {} handler failed for tx {} action {}: {}",
                                block.height, action_name, tx.tx_hash, action_index, source
                            ));
                            IngestError::HandlerError {
                                tx_hash: tx.tx_hash.clone(),
                                action_index,
                                source,
                            }
                        })?;
                    }
                }

                action_docs.push(json!({
                    "action_type": action.type_id,
                    "action_name": action_name,
                    "input": action.input,
                    "output": Value::Object(output),
                }));
            }

            let tx_row = transactions::Model {
                tx_hash: tx.tx_hash.clone(),
                block_hash: block.block_hash.clone(),
                sponsor: tx.sponsor.clone(),
                actors: json!(tx_participants.actors()),
                receivers: json!(tx_participants.receivers()),
                max_fee: saturating_i64(tx.max_fee),
                success,
                fee: saturating_i64(fee),
                actions: Value::Array(action_docs),
                timestamp,
            };
            bounded(
                "upsert_transaction",
                self.timeout,
                transaction_repository::upsert_transaction(&txn, &tx_row),
            )
            .await?;
        }

        for action_type in touched_types {
            bounded(
                "refresh_action_volume",
                self.timeout,
                action_volume_repository::refresh_volume(
                    &txn,
                    action_type,
                    self.classifier.name_of(action_type),
                ),
            )
            .await?;
        }

        summary.unique_participants = participants.len();
        let block_row = block_row(block, &summary, timestamp);
        bounded(
            "upsert_block",
            self.timeout,
            block_repository::upsert_block(&txn, &block_row),
        )
        .await?;

        bounded("commit_block", self.timeout, txn.commit()).await?;

        logging::log_info(&format!(
            "Block {}: Tx {} | Actions {} | Fee {} | Participants {}",
            block.height,
            summary.tx_count,
            summary.actions_written,
            summary.total_fee,
            summary.unique_participants
        ));
        if summary.actions_failed > 0 || summary.undecodable_outputs > 0 {
            logging::log_warning(&format!(
                "Block {}: {} action rows dropped, {} outputs undecodable",
                block.height, summary.actions_failed, summary.undecodable_outputs
            ));
        }

        Ok(summary)
    }

    /// Decode every output blob, keeping positions aligned with the actions
    fn decode_outputs(
        &self,
        decoder: &dyn BlockDecoder,
        tx: &Transaction,
        result: &ExecutionResult,
        summary: &mut BlockSummary,
    ) -> Vec<Option<DecodedOutput>> {
        result
            .outputs
            .iter()
            .enumerate()
            .map(|(index, raw)| match decoder.decode_output(raw) {
                Ok(output) => Some(output),
                Err(e) => {
                    summary.undecodable_outputs += 1;
                    logging::log_warning(&format!(
                        "Skipping output {} of tx {}: {}",
                        index, tx.tx_hash, e
                    ));
                    None
                }
            })
            .collect()
    }

    /// Upsert one action row under a savepoint; returns whether it was kept
    async fn write_action(&self, txn: &DatabaseTransaction, row: &actions::Model) -> bool {
        let attempt = async {
            let savepoint = txn.begin().await?;
            action_repository::upsert_action(&savepoint, row).await?;
            savepoint.commit().await?;
            Ok::<_, DbError>(())
        };

        match bounded("upsert_action", self.timeout, attempt).await {
            Ok(()) => true,
            Err(e) => {
                logging::log_error(&format!(
                    "Failed to store action {} of tx {}: {}",
                    row.action_index, row.tx_hash, e
                ));
                false
            }
        }
    }

    async fn run_handler(
        &self,
        txn: &DatabaseTransaction,
        ctx: &ActionContext<'_>,
    ) -> Result<(), HandlerError> {
        match tokio::time::timeout(self.timeout, self.classifier.classify_and_handle(txn, ctx)).await
        {
            Ok(result) => result,
            Err(_) => Err(HandlerError::DbError(DbError::Timeout {
                operation: "action_handler",
                timeout: self.timeout,
            })),
        }
    }
}

fn block_row(block: &ExecutedBlock, summary: &BlockSummary, timestamp: DateTime<Utc>) -> blocks::Model {
    blocks::Model {
        block_height: saturating_i64(block.height),
        block_hash: block.block_hash.clone(),
        parent_block_hash: block.parent_hash.clone(),
        state_root: block.state_root.clone(),
        block_size: saturating_i64(block.size),
        tx_count: i32::try_from(summary.tx_count).unwrap_or(i32::MAX),
        total_fee: saturating_i64(summary.total_fee),
        avg_tx_size: block.avg_tx_size(),
        unique_participants: i32::try_from(summary.unique_participants).unwrap_or(i32::MAX),
        timestamp,
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
