//! Chain parameters shared by every Monad migration tool.
//!
//! A [`MonadConfig`] is built once at startup, either from the built-in
//! testnet table or from a YAML override file, and then handed out behind an
//! `Arc`. Nothing mutates it afterwards.

pub mod error;
pub mod table;

pub use error::ConfigError;
pub use table::{
    is_address, ContractEntry, GasConfig, IndexerConfig, Limits, MonadConfig, NetworkConfig,
    WEI_PER_GWEI,
};
