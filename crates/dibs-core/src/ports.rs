use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// Key-value persistence port (the host runtime's "brain").
///
/// Records are whole JSON documents under a small set of well-known keys.
/// There is no transactional guarantee beyond single-key get/set, so each
/// command performs one get/mutate/set cycle against the key that owns the
/// state it touches.
#[async_trait]
pub trait Brain: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Outbound reply port. The adapter decides how the text reaches the room.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn emit(&self, text: &str) -> Result<()>;
}
