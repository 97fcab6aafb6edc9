use std::sync::Arc;

use crate::{Actor, ActorId, HostEnvironment};

/// Name of the platform integration (Bedrock players via Floodgate).
pub const PLATFORM_EXTENSION: &str = "floodgate";

/// Platform-admitted actors get ids whose leading 64 bits are zero.
pub fn is_synthetic_id(id: &ActorId) -> bool {
    id.as_bytes()[..8].iter().all(|byte| *byte == 0)
}

/// Classifies actors that joined through the platform layer.
#[derive(Clone)]
pub struct PlatformClassifier {
    host: Arc<dyn HostEnvironment>,
    extension: String,
}

impl PlatformClassifier {
    pub fn new(host: Arc<dyn HostEnvironment>) -> Self {
        Self::with_extension(host, PLATFORM_EXTENSION)
    }

    pub fn with_extension(host: Arc<dyn HostEnvironment>, extension: impl Into<String>) -> Self {
        Self {
            host,
            extension: extension.into(),
        }
    }

    pub fn is_layer_active(&self) -> bool {
        self.host.is_extension_enabled(&self.extension)
    }

    /// Never true while the platform layer is inactive.
    pub fn is_platform_member(&self, actor: &dyn Actor) -> bool {
        self.is_layer_active() && actor.id().is_some_and(|id| is_synthetic_id(&id))
    }
}
