use monad_mcp_config::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_constants() {
    let config = MonadConfig::default();
    assert_eq!(config.network.chain_id, 10143);
    assert_eq!(config.gas.base_fee_wei, 50_000_000_000);
    assert_eq!(config.gas.priority_fee_wei, 2_000_000_000);
    assert_eq!(config.gas.default_gas_price(), 52_000_000_000);
    assert_eq!(config.gas.transfer_gas, 21_000);
    assert_eq!(config.limits.max_contract_size, 131_072);
    assert_eq!(config.limits.max_log_block_range, 100);
    assert_eq!(config.limits.recommended_batch_size, 50);
}

#[test]
fn test_known_address_is_case_insensitive() {
    let config = MonadConfig::default();
    assert!(config.is_known_address("0xca11bde05977b3631167028862be2a173976ca11"));
    assert!(config.is_known_address("0xCA11BDE05977B3631167028862BE2A173976CA11"));
    assert!(!config.is_known_address("0x0000000000000000000000000000000000000001"));
}

#[test]
fn test_name_for_address() {
    let config = MonadConfig::default();
    assert_eq!(
        config.name_for_address("0x760afe86e5de5fa0ee542fc7b7b713e1c5425701"),
        Some("WMON")
    );
    assert_eq!(config.name_for_address("0xdeadbeef"), None);
}

#[test]
fn test_known_address_requires_exact_match() {
    let config = MonadConfig::default();
    assert!(!config.is_known_address(" 0xcA11bde05977b3631167028862bE2a173976CA11"));
    assert!(!config.is_known_address("0xcA11bde05977b3631167028862bE2a173976CA1"));
}

#[test]
fn test_contract_address_by_name() {
    let config = MonadConfig::default();
    assert_eq!(
        config.contract_address("Multicall3"),
        Some("0xcA11bde05977b3631167028862bE2a173976CA11")
    );
    assert_eq!(config.contract_address("multicall3"), None);
}

#[test]
fn test_load_partial_override() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("monad.yaml");
    fs::write(
        &path,
        "network:\n  chain_id: 143\n  name: Monad Mainnet\nlimits:\n  recommended_batch_size: 25\n",
    )
    .unwrap();

    let config = MonadConfig::load(&path).unwrap();
    assert_eq!(config.network.chain_id, 143);
    assert_eq!(config.network.name, "Monad Mainnet");
    assert_eq!(config.network.rpc_url, "https://testnet-rpc.monad.xyz");
    assert_eq!(config.limits.recommended_batch_size, 25);
    assert_eq!(config.limits.max_contract_size, 131_072);
    assert_eq!(config.gas.default_gas_price(), 52_000_000_000);
    assert_eq!(config.contracts.len(), 6);
}

#[test]
fn test_load_replaces_contract_list() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("monad.yaml");
    fs::write(
        &path,
        "contracts:\n  - name: Router\n    address: \"0x1111111111111111111111111111111111111111\"\n",
    )
    .unwrap();

    let config = MonadConfig::load(&path).unwrap();
    assert_eq!(config.contracts.len(), 1);
    assert_eq!(
        config.name_for_address("0x1111111111111111111111111111111111111111"),
        Some("Router")
    );
}

#[test]
fn test_load_missing_file() {
    let result = MonadConfig::load("/nonexistent/monad.yaml");
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_load_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.yaml");
    fs::write(&path, "   \n").unwrap();

    let result = MonadConfig::load(&path);
    assert!(matches!(result, Err(ConfigError::Empty)));
}

#[test]
fn test_load_invalid_yaml() {
    let result = MonadConfig::from_yaml_str("network: [unclosed");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_rejects_zero_chain_id() {
    let result = MonadConfig::from_yaml_str("network:\n  chain_id: 0\n");
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_rejects_malformed_contract_address() {
    let result = MonadConfig::from_yaml_str(
        "contracts:\n  - name: Broken\n    address: \"0x1234\"\n",
    );
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_rejects_zero_limits() {
    let result = MonadConfig::from_yaml_str("limits:\n  recommended_batch_size: 0\n");
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}
