//! The configuration table and its YAML loader.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const WEI_PER_GWEI: u64 = 1_000_000_000;

/// Network identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub ws_url: String,
    pub explorer_url: String,
    pub currency_symbol: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: 10143,
            name: "Monad Testnet".to_string(),
            rpc_url: "https://testnet-rpc.monad.xyz".to_string(),
            ws_url: "wss://testnet-rpc.monad.xyz".to_string(),
            explorer_url: "https://testnet.monadexplorer.com".to_string(),
            currency_symbol: "MON".to_string(),
        }
    }
}

/// Gas constants, all in wei except `transfer_gas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    pub base_fee_wei: u64,
    pub priority_fee_wei: u64,
    pub transfer_gas: u64,
}

impl GasConfig {
    /// Base fee plus priority fee.
    pub fn default_gas_price(&self) -> u64 {
        self.base_fee_wei.saturating_add(self.priority_fee_wei)
    }

    pub fn default_gas_price_gwei(&self) -> u64 {
        self.default_gas_price() / WEI_PER_GWEI
    }

    pub fn base_fee_gwei(&self) -> u64 {
        self.base_fee_wei / WEI_PER_GWEI
    }

    pub fn priority_fee_gwei(&self) -> u64 {
        self.priority_fee_wei / WEI_PER_GWEI
    }
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            base_fee_wei: 50 * WEI_PER_GWEI,
            priority_fee_wei: 2 * WEI_PER_GWEI,
            transfer_gas: 21_000,
        }
    }
}

/// One canonical contract deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractEntry {
    pub name: String,
    pub address: String,
}

impl ContractEntry {
    fn new(name: &str, address: &str) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
        }
    }
}

fn default_contracts() -> Vec<ContractEntry> {
    vec![
        ContractEntry::new("Multicall3", "0xcA11bde05977b3631167028862bE2a173976CA11"),
        ContractEntry::new("WMON", "0x760AfE86e5de5fa0Ee542fc7B7B713e1c5425701"),
        ContractEntry::new("Permit2", "0x000000000022D473030F116dDEE9F6B43aC78BA3"),
        ContractEntry::new("CreateX", "0xba5Ed099633D3B313e4D5F7bdc1305d3c28ba5Ed"),
        ContractEntry::new("Create2Deployer", "0x13b0D85CcB8bf860b6b79AF3029fCA081AE9beF2"),
        ContractEntry::new("EntryPointV07", "0x0000000071727De22E5E9d8BAf0edAc6f37da032"),
    ]
}

/// Size, batch and range thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_contract_size: u64,
    pub max_log_block_range: u64,
    pub recommended_batch_size: u64,
    pub max_concurrent_requests: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_contract_size: 131_072,
            max_log_block_range: 100,
            recommended_batch_size: 50,
            max_concurrent_requests: 10,
        }
    }
}

/// Indexer provider network identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    pub envio_network: String,
    pub goldsky_network: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            envio_network: "monad-testnet".to_string(),
            goldsky_network: "monad-testnet".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonadConfig {
    pub network: NetworkConfig,
    pub gas: GasConfig,
    /// Ordered; lookups by address return the earliest match.
    pub contracts: Vec<ContractEntry>,
    pub limits: Limits,
    pub indexers: IndexerConfig,
}

impl Default for MonadConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            gas: GasConfig::default(),
            contracts: default_contracts(),
            limits: Limits::default(),
            indexers: IndexerConfig::default(),
        }
    }
}

impl MonadConfig {
    /// Load a YAML override file. Missing sections and fields keep their
    /// built-in values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        debug!("Loaded config file {} ({} bytes)", path.display(), content.len());

        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Err(ConfigError::Empty);
        }

        let config: MonadConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.chain_id == 0 {
            return Err(ConfigError::Invalid("network.chain_id must be non-zero".into()));
        }

        if self.network.rpc_url.trim().is_empty() {
            return Err(ConfigError::Invalid("network.rpc_url is empty".into()));
        }

        if self.gas.base_fee_wei == 0 || self.gas.transfer_gas == 0 {
            return Err(ConfigError::Invalid(
                "gas.base_fee_wei and gas.transfer_gas must be non-zero".into(),
            ));
        }

        if self
            .gas
            .base_fee_wei
            .checked_add(self.gas.priority_fee_wei)
            .is_none()
        {
            return Err(ConfigError::Invalid("gas price overflows u64".into()));
        }

        let limits = &self.limits;
        if limits.max_contract_size == 0
            || limits.max_log_block_range == 0
            || limits.recommended_batch_size == 0
            || limits.max_concurrent_requests == 0
        {
            return Err(ConfigError::Invalid("limits must all be non-zero".into()));
        }

        for entry in &self.contracts {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Invalid("contract entry with empty name".into()));
            }
            if !is_address(&entry.address) {
                return Err(ConfigError::Invalid(format!(
                    "contract {} has malformed address {}",
                    entry.name, entry.address
                )));
            }
        }

        Ok(())
    }

    /// Case-insensitive exact match against the contract table.
    pub fn is_known_address(&self, address: &str) -> bool {
        self.name_for_address(address).is_some()
    }

    /// Name of the first contract entry whose address matches.
    pub fn name_for_address(&self, address: &str) -> Option<&str> {
        self.contracts
            .iter()
            .find(|entry| entry.address.eq_ignore_ascii_case(address))
            .map(|entry| entry.name.as_str())
    }

    pub fn contract_address(&self, name: &str) -> Option<&str> {
        self.contracts
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.address.as_str())
    }
}

/// `0x` followed by exactly 40 hex digits.
pub fn is_address(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gas_price_is_derived() {
        let gas = GasConfig::default();
        assert_eq!(gas.default_gas_price(), 52_000_000_000);
        assert_eq!(gas.default_gas_price_gwei(), 52);
    }

    #[test]
    fn test_default_table_is_valid() {
        assert!(MonadConfig::default().validate().is_ok());
    }

    #[test]
    fn test_is_address() {
        assert!(is_address("0xcA11bde05977b3631167028862bE2a173976CA11"));
        assert!(!is_address("cA11bde05977b3631167028862bE2a173976CA11"));
        assert!(!is_address("0x1234"));
        assert!(!is_address("0xZZ11bde05977b3631167028862bE2a173976CA11"));
    }

    #[test]
    fn test_name_for_address_earliest_wins() {
        let mut config = MonadConfig::default();
        config.contracts.push(ContractEntry::new(
            "Multicall3Alias",
            "0xca11bde05977b3631167028862be2a173976ca11",
        ));
        assert_eq!(
            config.name_for_address("0xCA11BDE05977B3631167028862BE2A173976CA11"),
            Some("Multicall3")
        );
    }
}
