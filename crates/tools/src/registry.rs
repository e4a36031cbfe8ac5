use crate::deployment_tools::ContractDeploymentTools;
use crate::error::ToolError;
use crate::gas_tools::GasStrategyTools;
use crate::indexer_tools::IndexingTools;
use crate::parallel_tools::ParallelExecutionTools;
use crate::scan::Scanner;
use crate::traits::{OperationDescriptor, ToolModule};
use crate::transaction_tools::TransactionTools;
use crate::validation_tools::ValidationTools;
use crate::web3_tools::Web3ConfigTools;
use monad_mcp_config::MonadConfig;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tool modules in registration order, plus an operation name → module index.
pub struct ToolRegistry {
    modules: Vec<Arc<dyn ToolModule>>,
    routes: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            routes: HashMap::new(),
        }
    }

    /// The seven Monad migration modules, sharing one config and scanner.
    pub fn standard(config: Arc<MonadConfig>) -> Result<Self, ToolError> {
        let scanner = Scanner::new()?;

        let mut registry = Self::new();
        registry
            .register(Arc::new(ContractDeploymentTools::new(
                config.clone(),
                scanner.clone(),
            )))
            .register(Arc::new(Web3ConfigTools::new(config.clone(), scanner.clone())))
            .register(Arc::new(GasStrategyTools::new(config.clone(), scanner.clone())))
            .register(Arc::new(ParallelExecutionTools::new(config.clone(), scanner)))
            .register(Arc::new(IndexingTools::new(config.clone())))
            .register(Arc::new(TransactionTools::new(config.clone())))
            .register(Arc::new(ValidationTools::new(config)?));
        Ok(registry)
    }

    /// Register every operation `module` declares. A name that is already
    /// routed is taken over by the new module.
    pub fn register(&mut self, module: Arc<dyn ToolModule>) -> &mut Self {
        let index = self.modules.len();
        for descriptor in module.operations() {
            if let Some(previous) = self.routes.insert(descriptor.name.clone(), index) {
                warn!(
                    "Operation {} from module {} replaces the one from {}",
                    descriptor.name,
                    module.name(),
                    self.modules[previous].name()
                );
            }
        }
        debug!("Registered module: {}", module.name());
        self.modules.push(module);
        self
    }

    /// Module that owns operation `name`.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolModule>> {
        self.routes
            .get(name)
            .and_then(|&index| self.modules.get(index))
            .cloned()
    }

    pub fn list(&self) -> Vec<OperationDescriptor> {
        self.modules
            .iter()
            .flat_map(|module| module.operations())
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.list().into_iter().map(|d| d.name).collect()
    }

    pub fn modules(&self) -> &[Arc<dyn ToolModule>] {
        &self.modules
    }

    /// Number of routable operation names.
    pub fn count(&self) -> usize {
        self.routes.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
