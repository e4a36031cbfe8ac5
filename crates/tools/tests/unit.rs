#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use monad_mcp_config::MonadConfig;
    use monad_mcp_tools::operation::*;
    use monad_mcp_tools::validation_tools::checklist_items;
    use monad_mcp_tools::*;
    use serde_json::json;
    use std::sync::Arc;

    fn standard() -> ToolRegistry {
        ToolRegistry::standard(Arc::new(MonadConfig::default())).unwrap()
    }

    // Stand-in module that claims an existing operation name.
    struct ShadowModule;

    #[async_trait]
    impl ToolModule for ShadowModule {
        fn name(&self) -> &str {
            "shadow"
        }

        fn operations(&self) -> Vec<OperationDescriptor> {
            vec![OperationDescriptor::new(
                "check_gas_optimization",
                "shadowed",
                json!({"type": "object", "properties": {}, "required": []}),
            )]
        }

        async fn execute(&self, _operation: Operation) -> Result<Report, ToolError> {
            Ok(Report::text("shadow"))
        }
    }

    #[test]
    fn test_registry_lists_all_operations_in_order() {
        let registry = standard();
        let names = registry.names();
        let expected: Vec<String> = OperationName::ALL
            .iter()
            .map(|n| n.as_str().to_string())
            .collect();
        assert_eq!(names, expected);
        assert_eq!(registry.count(), 18);
        assert_eq!(registry.modules().len(), 7);
    }

    #[test]
    fn test_registry_module_order() {
        let registry = standard();
        let modules: Vec<&str> = registry.modules().iter().map(|m| m.name()).collect();
        assert_eq!(
            modules,
            vec![
                "contract_deployment",
                "web3_config",
                "gas_strategy",
                "parallel_execution",
                "indexing",
                "transactions",
                "validation",
            ]
        );
    }

    #[test]
    fn test_required_fields_match_declarations() {
        let registry = standard();
        let expected: &[(&str, &[&str])] = &[
            ("migrate_contract_deployment", &["originalCode", "contractType"]),
            ("optimize_contract_size", &["contractCode"]),
            ("add_monad_gas_optimizations", &["contractCode"]),
            ("generate_monad_deployment_script", &["contractName"]),
            ("migrate_web3_config", &["originalConfig", "framework"]),
            ("optimize_rpc_calls", &["code", "library"]),
            ("implement_batch_calls", &["functions"]),
            ("optimize_gas_estimation", &["code"]),
            ("implement_gas_limit_strategy", &["transactionTypes"]),
            ("implement_multicall_pattern", &["calls"]),
            ("optimize_concurrent_calls", &["originalCode"]),
            ("setup_envio_indexer", &["contractAddress", "events"]),
            ("configure_goldsky_subgraph", &["contractName", "events"]),
            ("implement_concurrent_transactions", &["transactionCount"]),
            ("optimize_nonce_management", &["walletType"]),
            ("validate_monad_migration", &["projectType", "codeBase"]),
            ("check_gas_optimization", &["code"]),
            ("generate_migration_checklist", &["complexity"]),
        ];

        let descriptors = registry.list();
        assert_eq!(descriptors.len(), expected.len());
        for (descriptor, (name, required)) in descriptors.iter().zip(expected) {
            assert_eq!(descriptor.name, *name);
            assert!(!descriptor.description.is_empty());
            assert_eq!(descriptor.input_schema["type"], "object");
            assert_eq!(descriptor.required_fields(), *required, "{name}");
        }
    }

    #[test]
    fn test_list_is_idempotent() {
        let registry = standard();
        assert_eq!(registry.list(), registry.list());
    }

    #[test]
    fn test_registry_get() {
        let registry = standard();
        assert_eq!(registry.get("setup_envio_indexer").unwrap().name(), "indexing");
        assert!(registry.get("nonexistent_tool").is_none());
    }

    #[test]
    fn test_registry_empty() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.count(), 0);
        assert!(registry.list().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_registration_overwrites() {
        let mut registry = standard();
        registry.register(Arc::new(ShadowModule));

        assert_eq!(registry.count(), 18);
        assert_eq!(registry.get("check_gas_optimization").unwrap().name(), "shadow");
        assert_eq!(registry.list().len(), 19);

        let dispatcher = Dispatcher::new(Arc::new(registry));
        let report = dispatcher
            .dispatch("check_gas_optimization", json!({"code": ""}))
            .await
            .unwrap();
        assert_eq!(report.first_text(), "shadow");
    }

    #[tokio::test]
    async fn test_module_rejects_foreign_operation() {
        let registry = standard();
        let module = registry.get("setup_envio_indexer").unwrap();
        let operation = Operation::CheckGasOptimization(CheckGasOptimizationArgs {
            code: String::new(),
        });

        let result = module.execute(operation).await;
        assert!(matches!(
            result,
            Err(ToolError::OperationNotFound(name)) if name == "check_gas_optimization"
        ));
    }

    #[test]
    fn test_checklist_counts() {
        let config = MonadConfig::default();
        for (complexity, count) in [
            (Complexity::Simple, 5),
            (Complexity::Moderate, 11),
            (Complexity::Complex, 21),
        ] {
            assert_eq!(checklist_items(&config, complexity).len(), count);
        }
    }

    #[test]
    fn test_report_serialization() {
        let report = Report::text("hello");
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"content": [{"type": "text", "text": "hello"}]})
        );

        let report = Report::error("bad");
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"content": [{"type": "text", "text": "bad"}], "isError": true})
        );
    }

    #[test]
    fn test_descriptor_serialization_uses_input_schema_key() {
        let registry = standard();
        let value = serde_json::to_value(&registry.list()[0]).unwrap();
        assert!(value.get("inputSchema").is_some());
        assert!(value.get("input_schema").is_none());
    }
}
