//! Gateway application state.
//!
//! This module defines the shared state that is available to all request handlers.

use std::sync::Arc;

use teamfight_control::CrudService;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
pub struct GatewayState<S>
where
    S: CrudService,
{
    /// The CRUD service requests are dispatched to.
    pub service: Arc<S>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<S> GatewayState<S>
where
    S: CrudService,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(service: Arc<S>, config: GatewayConfig) -> Self {
        Self { service, config }
    }
}

impl<S> Clone for GatewayState<S>
where
    S: CrudService,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            config: self.config.clone(),
        }
    }
}
