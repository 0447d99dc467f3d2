use std::sync::atomic::{AtomicU64, Ordering};

use netsink_frame::FrameConfig;
use netsink_output::{DestinationResolver, TemplateError};

use crate::config::ServerConfig;
use crate::gate::SerializationGate;

/// State shared by the dispatcher and every session handler.
///
/// Built once before the listener accepts anything and kept until the
/// process exits.
#[derive(Debug)]
pub struct SinkContext {
    sequence: AtomicU64,
    resolver: DestinationResolver,
    gate: SerializationGate,
    frame: FrameConfig,
}

impl SinkContext {
    /// Build the context, validating the naming template.
    pub fn new(config: &ServerConfig) -> Result<Self, TemplateError> {
        let resolver = DestinationResolver::new(config.output_pattern.as_deref(), config.append)?;
        Ok(Self {
            sequence: AtomicU64::new(0),
            resolver,
            gate: SerializationGate::new(config.serialize),
            frame: config.frame_config(),
        })
    }

    /// Assign the next sequence id. The first id is 1; ids are never reused.
    pub fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn resolver(&self) -> &DestinationResolver {
        &self.resolver
    }

    pub fn gate(&self) -> &SerializationGate {
        &self.gate
    }

    pub fn frame_config(&self) -> &FrameConfig {
        &self.frame
    }
}
