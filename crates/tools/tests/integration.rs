use monad_mcp_config::MonadConfig;
use monad_mcp_tools::operation::*;
use monad_mcp_tools::*;
use serde_json::json;
use std::sync::Arc;

fn dispatcher() -> Dispatcher {
    let registry = ToolRegistry::standard(Arc::new(MonadConfig::default())).unwrap();
    Dispatcher::new(Arc::new(registry))
}

async fn run(name: &str, args: serde_json::Value) -> String {
    dispatcher()
        .dispatch(name, args)
        .await
        .unwrap()
        .first_text()
        .to_string()
}

const MULTICALL3: &str = "0xcA11bde05977b3631167028862bE2a173976CA11";
const ENTRY_POINT: &str = "0x0000000071727De22E5E9d8BAf0edAc6f37da032";

fn operation_cases() -> Vec<(&'static str, serde_json::Value, Vec<&'static str>)> {
    vec![
        (
            "migrate_contract_deployment",
            json!({"originalCode": "contract Token {}", "contractType": "erc20"}),
            vec!["10143", "52000000000", "https://testnet-rpc.monad.xyz"],
        ),
        (
            "optimize_contract_size",
            json!({"contractCode": "contract Big {}"}),
            vec!["131072"],
        ),
        (
            "add_monad_gas_optimizations",
            json!({"contractCode": "contract C {}"}),
            vec!["52000000000", "50000000000", "2000000000", "21000"],
        ),
        (
            "generate_monad_deployment_script",
            json!({"contractName": "Token"}),
            vec!["10143", "52000000000"],
        ),
        (
            "migrate_web3_config",
            json!({"originalConfig": "const chainId = 1;", "framework": "viem"}),
            vec!["10143", "https://testnet-rpc.monad.xyz", "https://testnet.monadexplorer.com"],
        ),
        (
            "optimize_rpc_calls",
            json!({"code": "await provider.getLogs(filter)", "library": "ethers"}),
            vec!["50", "100"],
        ),
        (
            "implement_batch_calls",
            json!({"functions": ["balanceOf(address)", "totalSupply()"]}),
            vec!["BATCH_SIZE = 50"],
        ),
        (
            "optimize_gas_estimation",
            json!({"code": "await contract.estimateGas.transfer(to, 1)"}),
            vec!["52000000000", "21000"],
        ),
        (
            "implement_gas_limit_strategy",
            json!({"transactionTypes": ["transfer", "swap"]}),
            vec!["52000000000", "25200", "300000"],
        ),
        (
            "implement_multicall_pattern",
            json!({"calls": ["balanceOf(address)"]}),
            vec![MULTICALL3],
        ),
        (
            "optimize_concurrent_calls",
            json!({"originalCode": "for (const a of xs) { await f(a); }"}),
            vec!["MAX_CONCURRENCY = 10"],
        ),
        (
            "setup_envio_indexer",
            json!({"contractAddress": MULTICALL3, "events": ["Transfer(address,address,uint256)"]}),
            vec!["10143", "Multicall3"],
        ),
        (
            "configure_goldsky_subgraph",
            json!({"contractName": "Token", "events": ["Transfer(address,address,uint256)"]}),
            vec!["10143", "monad-testnet"],
        ),
        (
            "implement_concurrent_transactions",
            json!({"transactionCount": 120}),
            vec!["10143", "52000000000", "21000"],
        ),
        (
            "optimize_nonce_management",
            json!({"walletType": "smart_wallet"}),
            vec![ENTRY_POINT],
        ),
        (
            "validate_monad_migration",
            json!({"projectType": "defi", "codeBase": ""}),
            vec!["10143"],
        ),
        (
            "check_gas_optimization",
            json!({"code": ""}),
            vec!["52000000000"],
        ),
        (
            "generate_migration_checklist",
            json!({"complexity": "simple"}),
            vec!["10143"],
        ),
    ]
}

#[tokio::test]
async fn test_every_operation_renders_config_constants() {
    let cases = operation_cases();
    assert_eq!(cases.len(), OperationName::ALL.len());
    for (name, args, constants) in cases {
        let text = run(name, args).await;
        assert!(!text.is_empty(), "{name} rendered nothing");
        for constant in constants {
            assert!(text.contains(constant), "{name} output lacks {constant}");
        }
    }
}

#[tokio::test]
async fn test_unknown_operation() {
    let result = dispatcher().dispatch("nonexistent_tool", json!({})).await;
    assert!(matches!(
        result,
        Err(ToolError::OperationNotFound(name)) if name == "nonexistent_tool"
    ));
}

#[tokio::test]
async fn test_missing_required_field() {
    let result = dispatcher()
        .dispatch("check_gas_optimization", json!({}))
        .await;
    match result {
        Err(ToolError::InvalidArguments { operation, message }) => {
            assert_eq!(operation, "check_gas_optimization");
            assert!(message.contains("code"));
        }
        other => panic!("expected InvalidArguments, got {:?}", other.map(|r| r.is_error)),
    }
}

#[tokio::test]
async fn test_validation_full_score() {
    let code = r#"
        const chainId = 10143;
        const gasPrice = 52000000000n;
        const results = await multicall.aggregate3(calls);
        await Promise.all(requests);
    "#;
    let text = run(
        "validate_monad_migration",
        json!({"projectType": "dapp", "codeBase": code}),
    )
    .await;
    assert!(text.contains("100/100 (5/5 checks passed)"));
    assert!(!text.contains("- [ ]"));
}

#[tokio::test]
async fn test_validation_partial_score() {
    let code = "const chainId = 10143; await provider.estimateGas(tx);";
    let text = run(
        "validate_monad_migration",
        json!({"projectType": "dapp", "codeBase": code}),
    )
    .await;
    assert!(text.contains("20/100 (1/5 checks passed)"));
    assert!(text.contains("- [x] **Chain ID**"));
    assert!(text.contains("- [ ] **No Gas Estimation**"));
}

#[tokio::test]
async fn test_gas_check_on_empty_code() {
    let text = run("check_gas_optimization", json!({"code": ""})).await;
    assert!(text.contains("20/100 (1/5 checks passed)"));
    assert!(text.contains("- [x] **No Gas Estimation**"));
    assert_eq!(text.matches("- [ ]").count(), 4);
}

#[tokio::test]
async fn test_checklist_rendered_counts() {
    for (complexity, count) in [("simple", 5), ("moderate", 11), ("complex", 21)] {
        let text = run(
            "generate_migration_checklist",
            json!({"complexity": complexity}),
        )
        .await;
        let items = text.lines().filter(|l| l.starts_with("- [ ]")).count();
        assert_eq!(items, count, "{complexity}");
    }
}

#[tokio::test]
async fn test_output_is_deterministic() {
    let dispatcher = dispatcher();
    for (name, args, _) in operation_cases() {
        let first = dispatcher.dispatch(name, args.clone()).await.unwrap();
        let second = dispatcher.dispatch(name, args).await.unwrap();
        assert_eq!(first, second, "{name}");
    }
}

#[tokio::test]
async fn test_invoke_typed_operation() {
    let report = dispatcher()
        .invoke(Operation::GenerateMigrationChecklist(
            GenerateMigrationChecklistArgs {
                complexity: Complexity::Moderate,
            },
        ))
        .await
        .unwrap();
    assert!(!report.is_error);
    assert!(report.first_text().contains("Monad Migration Checklist"));
}

#[tokio::test]
async fn test_invalid_contract_name_rejected() {
    let result = dispatcher()
        .dispatch(
            "generate_monad_deployment_script",
            json!({"contractName": "My Token"}),
        )
        .await;
    assert!(matches!(result, Err(ToolError::InvalidArguments { .. })));
}

#[tokio::test]
async fn test_zero_transaction_count_rejected() {
    let result = dispatcher()
        .dispatch(
            "implement_concurrent_transactions",
            json!({"transactionCount": 0}),
        )
        .await;
    assert!(matches!(result, Err(ToolError::InvalidArguments { .. })));
}

#[tokio::test]
async fn test_foundry_deployment_script() {
    let text = run(
        "generate_monad_deployment_script",
        json!({"contractName": "Vault", "framework": "foundry", "constructorArgs": ["100"]}),
    )
    .await;
    assert!(text.contains("contract DeployVault is Script"));
    assert!(text.contains("new Vault(100)"));
    assert!(text.contains("--with-gas-price 52000000000"));
}

#[tokio::test]
async fn test_custom_config_flows_into_reports() {
    let mut config = MonadConfig::default();
    config.network.chain_id = 143;
    let registry = ToolRegistry::standard(Arc::new(config)).unwrap();
    let dispatcher = Dispatcher::new(Arc::new(registry));

    let report = dispatcher
        .dispatch("generate_migration_checklist", json!({"complexity": "simple"}))
        .await
        .unwrap();
    assert!(report.first_text().contains("chain id 143"));
    assert!(!report.first_text().contains("10143"));
}

#[tokio::test]
async fn test_indexer_rejects_invalid_contract_name() {
    let dispatcher = dispatcher();
    let cases = [
        (
            "setup_envio_indexer",
            json!({
                "contractAddress": MULTICALL3,
                "contractName": "Foo\nnetworks: []",
                "events": []
            }),
        ),
        (
            "configure_goldsky_subgraph",
            json!({"contractName": "Foo\nnetworks: []", "events": []}),
        ),
        (
            "configure_goldsky_subgraph",
            json!({"contractName": "my-token", "events": []}),
        ),
    ];
    for (name, args) in cases {
        match dispatcher.dispatch(name, args).await {
            Err(ToolError::InvalidArguments { operation, message }) => {
                assert_eq!(operation, name);
                assert!(message.contains("contractName"), "{message}");
            }
            other => panic!(
                "{name}: expected InvalidArguments, got {:?}",
                other.map(|r| r.is_error)
            ),
        }
    }
}

#[tokio::test]
async fn test_envio_blank_contract_name_uses_default() {
    let text = run(
        "setup_envio_indexer",
        json!({"contractAddress": "0x1234", "contractName": "  ", "events": []}),
    )
    .await;
    assert!(text.contains("Envio Indexer: Contract"));
}

#[tokio::test]
async fn test_transaction_cost_overflow_rejected() {
    let mut config = MonadConfig::default();
    config.gas.transfer_gas = u64::MAX;
    config.gas.base_fee_wei = u64::MAX / 2;
    let registry = ToolRegistry::standard(Arc::new(config)).unwrap();
    let dispatcher = Dispatcher::new(Arc::new(registry));

    let result = dispatcher
        .dispatch(
            "implement_concurrent_transactions",
            json!({"transactionCount": u64::MAX}),
        )
        .await;
    match result {
        Err(ToolError::InvalidArguments { message, .. }) => {
            assert!(message.contains("overflows"));
        }
        other => panic!("expected InvalidArguments, got {:?}", other.map(|r| r.is_error)),
    }
}
