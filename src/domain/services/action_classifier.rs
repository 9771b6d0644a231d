//! Action type table and routing of side-effecting actions to their handlers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use sea_orm::DatabaseTransaction;

use crate::domain::errors::HandlerError;
use crate::domain::services::handlers::{
    ActionContext, ActionHandler, CreateAssetHandler, RegisterValidatorStakeHandler,
};

/// Name stored for action codes missing from the table
pub const UNKNOWN_ACTION_NAME: &str = "Unknown";

/// Action types known to the subscriber, by wire code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActionKind {
    Transfer = 0,
    ContractCall = 1,
    ContractDeploy = 2,
    ContractPublish = 3,
    CreateAsset = 4,
    UpdateAsset = 5,
    MintAssetFT = 6,
    MintAssetNFT = 7,
    BurnAssetFT = 8,
    BurnAssetNFT = 9,
    RegisterValidatorStake = 10,
    WithdrawValidatorStake = 11,
    ClaimValidatorStakeRewards = 12,
    DelegateUserStake = 13,
    UndelegateUserStake = 14,
    ClaimDelegationStakeRewards = 15,
    CreateDataset = 16,
    UpdateDataset = 17,
    InitiateContributeDataset = 18,
    CompleteContributeDataset = 19,
    PublishDatasetMarketplace = 20,
    SubscribeDatasetMarketplace = 21,
    ClaimMarketplacePayment = 22,
}

impl ActionKind {
    pub const ALL: [ActionKind; 23] = [
        ActionKind::Transfer,
        ActionKind::ContractCall,
        ActionKind::ContractDeploy,
        ActionKind::ContractPublish,
        ActionKind::CreateAsset,
        ActionKind::UpdateAsset,
        ActionKind::MintAssetFT,
        ActionKind::MintAssetNFT,
        ActionKind::BurnAssetFT,
        ActionKind::BurnAssetNFT,
        ActionKind::RegisterValidatorStake,
        ActionKind::WithdrawValidatorStake,
        ActionKind::ClaimValidatorStakeRewards,
        ActionKind::DelegateUserStake,
        ActionKind::UndelegateUserStake,
        ActionKind::ClaimDelegationStakeRewards,
        ActionKind::CreateDataset,
        ActionKind::UpdateDataset,
        ActionKind::InitiateContributeDataset,
        ActionKind::CompleteContributeDataset,
        ActionKind::PublishDatasetMarketplace,
        ActionKind::SubscribeDatasetMarketplace,
        ActionKind::ClaimMarketplacePayment,
    ];

    pub fn from_code(code: u8) -> Option<ActionKind> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Canonical name used for storage
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Transfer => "Transfer",
            ActionKind::ContractCall => "ContractCall",
            ActionKind::ContractDeploy => "ContractDeploy",
            ActionKind::ContractPublish => "ContractPublish",
            ActionKind::CreateAsset => "CreateAsset",
            ActionKind::UpdateAsset => "UpdateAsset",
            ActionKind::MintAssetFT => "MintAssetFT",
            ActionKind::MintAssetNFT => "MintAssetNFT",
            ActionKind::BurnAssetFT => "BurnAssetFT",
            ActionKind::BurnAssetNFT => "BurnAssetNFT",
            ActionKind::RegisterValidatorStake => "RegisterValidatorStake",
            ActionKind::WithdrawValidatorStake => "WithdrawValidatorStake",
            ActionKind::ClaimValidatorStakeRewards => "ClaimValidatorStakeRewards",
            ActionKind::DelegateUserStake => "DelegateUserStake",
            ActionKind::UndelegateUserStake => "UndelegateUserStake",
            ActionKind::ClaimDelegationStakeRewards => "ClaimDelegationStakeRewards",
            ActionKind::CreateDataset => "CreateDataset",
            ActionKind::UpdateDataset => "UpdateDataset",
            ActionKind::InitiateContributeDataset => "InitiateContributeDataset",
            ActionKind::CompleteContributeDataset => "CompleteContributeDataset",
            ActionKind::PublishDatasetMarketplace => "PublishDatasetMarketplace",
            ActionKind::SubscribeDatasetMarketplace => "SubscribeDatasetMarketplace",
            ActionKind::ClaimMarketplacePayment => "ClaimMarketplacePayment",
        }
    }
}

/// Resolves action names and dispatches registered post-processing handlers.
///
/// Codes without a handler are a no-op; new side effects are added with
/// [`ActionClassifier::register`].
#[derive(Clone, Default)]
pub struct ActionClassifier {
    handlers: HashMap<u8, Arc<dyn ActionHandler>>,
}

impl fmt::Debug for ActionClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut codes: Vec<_> = self.handlers.keys().collect();
        codes.sort();
        f.debug_struct("ActionClassifier")
            .field("handled_codes", &codes)
            .finish()
    }
}

impl ActionClassifier {
    /// Classifier without any side-effect handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier with the asset creation and validator stake handlers
    pub fn with_default_handlers() -> Self {
        let mut classifier = Self::new();
        classifier.register(ActionKind::CreateAsset.code(), Arc::new(CreateAssetHandler));
        classifier.register(
            ActionKind::RegisterValidatorStake.code(),
            Arc::new(RegisterValidatorStakeHandler),
        );
        classifier
    }

    /// Register (or replace) the handler for an action code
    pub fn register(&mut self, code: u8, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(code, handler);
    }

    pub fn has_handler(&self, code: u8) -> bool {
        self.handlers.contains_key(&code)
    }

    /// Canonical name for `code`, or [`UNKNOWN_ACTION_NAME`]
    pub fn name_of(&self, code: u8) -> &'static str {
        ActionKind::from_code(code)
            .map(ActionKind::name)
            .unwrap_or(UNKNOWN_ACTION_NAME)
    }

    /// Run the handler registered for the action's type, if any
    pub async fn classify_and_handle(
        &self,
        db: &DatabaseTransaction,
        ctx: &ActionContext<'_>,
    ) -> Result<(), HandlerError> {
        match self.handlers.get(&ctx.action_type) {
            Some(handler) => handler.handle(db, ctx).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_table_positions() {
        for (position, kind) in ActionKind::ALL.iter().enumerate() {
            assert_eq!(kind.code() as usize, position);
            assert_eq!(ActionKind::from_code(kind.code()), Some(*kind));
        }
    }

    #[test]
    fn test_unknown_codes_resolve_to_sentinel() {
        let classifier = ActionClassifier::new();
        assert_eq!(classifier.name_of(0), "Transfer");
        assert_eq!(classifier.name_of(10), "RegisterValidatorStake");
        assert_eq!(classifier.name_of(23), UNKNOWN_ACTION_NAME);
        assert_eq!(classifier.name_of(255), UNKNOWN_ACTION_NAME);
    }

    #[test]
    fn test_default_handlers_registered() {
        let classifier = ActionClassifier::with_default_handlers();
        assert!(classifier.has_handler(ActionKind::CreateAsset.code()));
        assert!(classifier.has_handler(ActionKind::RegisterValidatorStake.code()));
        assert!(!classifier.has_handler(ActionKind::Transfer.code()));
    }
}
