pub mod action_classifier;
pub mod decoder;
pub mod handlers;
pub mod participants;

pub use action_classifier::{ActionClassifier, ActionKind, UNKNOWN_ACTION_NAME};
pub use decoder::{BlockDecoder, DecodedOutput, DecoderFactory, JsonDecoderFactory};
pub use handlers::{ActionContext, ActionHandler};
pub use participants::{ParticipantSet, TxParticipants};
