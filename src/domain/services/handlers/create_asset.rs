use async_trait::async_trait;
use sea_orm::DatabaseTransaction;

use super::fields::Fields;
use super::{ActionContext, ActionHandler};
use crate::domain::errors::HandlerError;
use crate::infrastructure::persistence::entities::assets;
use crate::infrastructure::persistence::repositories::asset_repository;

const ACTION: &str = "CreateAsset";

/// Human-readable name for the numeric asset type
pub fn asset_type_name(asset_type_id: u64) -> Option<&'static str> {
    match asset_type_id {
        0 => Some("fungible"),
        1 => Some("non-fungible"),
        2 => Some("fractional"),
        _ => None,
    }
}

/// Materializes an asset row from a CreateAsset action
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateAssetHandler;

impl CreateAssetHandler {
    /// Build the asset row without touching the store
    pub fn build_asset(ctx: &ActionContext<'_>) -> Result<assets::Model, HandlerError> {
        let input = Fields::of_value(ACTION, ctx.input);
        let output = Fields::of_map(ACTION, ctx.output);

        let asset_address = output.require_str("asset_address")?;
        let asset_type_id = input.require_u64("asset_type")?;
        let asset_type = asset_type_name(asset_type_id).ok_or_else(|| HandlerError::InvalidField {
            action: ACTION,
            field: "asset_type",
            reason: format!("unknown asset type {}", asset_type_id),
        })?;

        let decimals = input
            .optional_i64("decimals")?
            .map(|d| {
                i32::try_from(d).map_err(|_| HandlerError::InvalidField {
                    action: ACTION,
                    field: "decimals",
                    reason: "out of range".to_string(),
                })
            })
            .transpose()?;

        Ok(assets::Model {
            asset_address: asset_address.to_string(),
            asset_type_id: asset_type_id as i16,
            asset_type: asset_type.to_string(),
            asset_creator: ctx.sponsor.to_string(),
            tx_hash: ctx.tx_hash.to_string(),
            name: input.optional_str("name")?,
            symbol: input.optional_str("symbol")?,
            decimals,
            metadata: input.optional_str("metadata")?,
            max_supply: input.optional_i64("max_supply")?,
            mint_admin: input.optional_str("mint_admin")?,
            pause_unpause_admin: input.optional_str("pause_unpause_admin")?,
            freeze_unfreeze_admin: input.optional_str("freeze_unfreeze_admin")?,
            enable_disable_kyc_account_admin: input
                .optional_str("enable_disable_kyc_account_admin")?,
            timestamp: ctx.timestamp,
        })
    }
}

#[async_trait]
impl ActionHandler for CreateAssetHandler {
    fn name(&self) -> &'static str {
        ACTION
    }

    async fn handle(
        &self,
        db: &DatabaseTransaction,
        ctx: &ActionContext<'_>,
    ) -> Result<(), HandlerError> {
        let asset = Self::build_asset(ctx)?;
        asset_repository::upsert_asset(db, &asset).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::{json, Map, Value};

    fn output(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_build_fungible_asset() {
        let input = json!({
            "asset_type": 0,
            "name": "Nuklai",
            "symbol": "NAI",
            "decimals": 9,
            "metadata": "native",
            "max_supply": 1000000,
            "mint_admin": "0xadmin"
        });
        let out = output(json!({"asset_address": "0xasset"}));
        let ctx = ActionContext {
            action_type: 4,
            input: &input,
            output: &out,
            sponsor: "0xA",
            tx_hash: "tx1",
            timestamp: Utc::now(),
        };

        let asset = CreateAssetHandler::build_asset(&ctx).unwrap();
        assert_eq!(asset.asset_address, "0xasset");
        assert_eq!(asset.asset_type, "fungible");
        assert_eq!(asset.asset_creator, "0xA");
        assert_eq!(asset.decimals, Some(9));
        assert_eq!(asset.max_supply, Some(1_000_000));
        assert_eq!(asset.mint_admin.as_deref(), Some("0xadmin"));
        assert_eq!(asset.pause_unpause_admin, None);
    }

    #[test]
    fn test_missing_asset_address_is_fatal() {
        let input = json!({"asset_type": 1});
        let out = Map::new();
        let ctx = ActionContext {
            action_type: 4,
            input: &input,
            output: &out,
            sponsor: "0xA",
            tx_hash: "tx1",
            timestamp: Utc::now(),
        };

        assert!(matches!(
            CreateAssetHandler::build_asset(&ctx),
            Err(HandlerError::MissingField {
                field: "asset_address",
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_asset_type_is_fatal() {
        let input = json!({"asset_type": 9});
        let out = output(json!({"asset_address": "0xasset"}));
        let ctx = ActionContext {
            action_type: 4,
            input: &input,
            output: &out,
            sponsor: "0xA",
            tx_hash: "tx1",
            timestamp: Utc::now(),
        };

        assert!(matches!(
            CreateAssetHandler::build_asset(&ctx),
            Err(HandlerError::InvalidField {
                field: "asset_type",
                ..
            })
        ));
    }
}
