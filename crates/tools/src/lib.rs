//! Monad migration tools.
//!
//! Operations are grouped into [`ToolModule`]s, collected in a
//! [`ToolRegistry`] and invoked through a [`Dispatcher`]. Every operation
//! renders a markdown [`Report`] from the shared [`monad_mcp_config::MonadConfig`].

pub mod analyzer;
pub mod deployment_tools;
pub mod dispatcher;
pub mod error;
pub mod gas_tools;
pub mod indexer_tools;
pub mod operation;
pub mod parallel_tools;
pub mod registry;
pub mod render;
pub mod scan;
pub mod traits;
pub mod transaction_tools;
pub mod validation_tools;
pub mod web3_tools;

pub use dispatcher::Dispatcher;
pub use error::ToolError;
pub use operation::{Operation, OperationName};
pub use registry::ToolRegistry;
pub use traits::{Content, OperationDescriptor, Report, ToolModule};
