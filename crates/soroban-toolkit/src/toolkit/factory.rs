// Toolkit factory over the merged network registry

use super::{SorobanToolkit, ToolkitOptions};
use crate::config::NetworkRegistry;
use crate::error::{Result, ToolkitError};

/// Creates per-network toolkits sharing one set of options
pub struct ToolkitFactory {
    options: ToolkitOptions,
    registry: NetworkRegistry,
}

/// Factory over the built-in networks plus `options.custom_networks`
pub fn create_toolkit(options: ToolkitOptions) -> ToolkitFactory {
    ToolkitFactory::new(options)
}

impl ToolkitFactory {
    pub fn new(options: ToolkitOptions) -> Self {
        Self::with_registry(options, NetworkRegistry::builtin())
    }

    /// Factory over `base` instead of the built-in presets; custom networks still win
    pub fn with_registry(options: ToolkitOptions, base: NetworkRegistry) -> Self {
        let registry = base.merged_with(&options.custom_networks);
        Self { options, registry }
    }

    /// Construct a toolkit bound to the named network
    pub fn get_network_toolkit(&self, network_name: &str) -> Result<SorobanToolkit> {
        let network = self
            .registry
            .get(network_name)
            .cloned()
            .ok_or_else(|| ToolkitError::UnknownNetwork(network_name.to_string()))?;
        SorobanToolkit::new(&self.options, network)
    }

    /// Names of every network in the merged registry, sorted
    pub fn list_available_networks(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ToolkitOptions {
        &self.options
    }
}
