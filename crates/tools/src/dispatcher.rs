use crate::error::ToolError;
use crate::operation::Operation;
use crate::registry::ToolRegistry;
use crate::traits::{OperationDescriptor, Report};
use std::sync::Arc;
use tracing::{info, warn};

pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Descriptors of every registered operation.
    pub fn list(&self) -> Vec<OperationDescriptor> {
        self.registry.list()
    }

    /// Run operation `name` with JSON `args` as received from a protocol host.
    pub async fn dispatch(&self, name: &str, args: serde_json::Value) -> Result<Report, ToolError> {
        info!("Dispatching operation: {}", name);

        // 1. Lookup owning module
        let module = self.registry.get(name).ok_or_else(|| {
            warn!("Operation not found: {}", name);
            ToolError::OperationNotFound(name.to_string())
        })?;

        // 2. Typed arguments
        let operation = Operation::from_call(name, args)?;

        // 3. Execute
        module.execute(operation).await
    }

    /// Run an already-typed operation.
    pub async fn invoke(&self, operation: Operation) -> Result<Report, ToolError> {
        let name = operation.name();
        info!("Invoking operation: {}", name);

        let module = self
            .registry
            .get(name.as_str())
            .ok_or_else(|| ToolError::OperationNotFound(name.to_string()))?;
        module.execute(operation).await
    }
}
