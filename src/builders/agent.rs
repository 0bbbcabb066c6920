use crate::agent::DqnAgent;
use crate::config::{DqnConfig, NetworkConfig};
use crate::error::{NavigatorError, Result};
use crate::network::QNetwork;

/// Builder for a [`DqnAgent`] backed by a [`QNetwork`].
pub struct DqnAgentBuilder {
    state_size: Option<usize>,
    action_size: Option<usize>,
    network: NetworkConfig,
    config: DqnConfig,
}

impl DqnAgentBuilder {
    pub fn new() -> Self {
        DqnAgentBuilder {
            state_size: None,
            action_size: None,
            network: NetworkConfig::default(),
            config: DqnConfig::default(),
        }
    }

    pub fn state_size(mut self, size: usize) -> Self {
        self.state_size = Some(size);
        self
    }

    pub fn action_size(mut self, size: usize) -> Self {
        self.action_size = Some(size);
        self
    }

    pub fn hidden_sizes(mut self, sizes: &[usize]) -> Self {
        self.network.hidden_sizes = sizes.to_vec();
        self
    }

    pub fn network_seed(mut self, seed: u64) -> Self {
        self.network.seed = Some(seed);
        self
    }

    pub fn network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    pub fn config(mut self, config: DqnConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<DqnAgent<QNetwork>> {
        let state_size = self.state_size.ok_or_else(|| NavigatorError::InvalidParameter {
            name: "state_size".to_string(),
            reason: "State size must be specified".to_string(),
        })?;
        let action_size = self.action_size.ok_or_else(|| NavigatorError::InvalidParameter {
            name: "action_size".to_string(),
            reason: "Action size must be specified".to_string(),
        })?;
        self.network.validate()?;

        let local = QNetwork::with_hidden(
            state_size,
            &self.network.hidden_sizes,
            action_size,
            self.config.optimizer.build(),
            self.network.seed,
        )?;
        DqnAgent::new(local, self.config)
    }
}

impl Default for DqnAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
