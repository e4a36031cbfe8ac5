use crate::analyzer::{Analysis, Importance, Rule, RuleSet};
use crate::error::ToolError;
use crate::operation::{
    CheckGasOptimizationArgs, Complexity, GenerateMigrationChecklistArgs, Operation,
    OperationName, ProjectType, ValidateMonadMigrationArgs,
};
use crate::render::Markdown;
use crate::traits::{OperationDescriptor, Report, ToolModule};
use async_trait::async_trait;
use monad_mcp_config::MonadConfig;
use regex::escape;
use serde_json::json;
use std::sync::Arc;

/// Rules applied by `validate_monad_migration`.
pub fn migration_rules(config: &MonadConfig) -> Result<RuleSet, ToolError> {
    let chain_id = config.network.chain_id.to_string();
    let gas_price = config.gas.default_gas_price().to_string();

    Ok(RuleSet::new(
        "migration",
        vec![
            Rule::present(
                "Chain ID",
                &escape(&chain_id),
                Importance::High,
                &format!("Network configuration uses chain id {chain_id}"),
            )?,
            Rule::present(
                "Gas Price",
                &escape(&gas_price),
                Importance::High,
                &format!("Transactions use the fixed gas price of {gas_price} wei"),
            )?,
            Rule::present(
                "Multicall",
                "(?i)multicall",
                Importance::Medium,
                "Contract reads are aggregated through Multicall",
            )?,
            Rule::present(
                "Concurrent Requests",
                r"Promise\.all",
                Importance::Medium,
                "Independent requests run concurrently with Promise.all",
            )?,
            Rule::absent(
                "No Gas Estimation",
                "estimateGas",
                Importance::High,
                "Static gas limits replace estimateGas calls",
            )?,
        ],
    ))
}

/// Rules applied by `check_gas_optimization`.
pub fn gas_rules(config: &MonadConfig) -> Result<RuleSet, ToolError> {
    let gas_price = config.gas.default_gas_price().to_string();

    Ok(RuleSet::new(
        "gas",
        vec![
            Rule::present(
                "Static Gas Price",
                &escape(&gas_price),
                Importance::High,
                &format!("Gas price is pinned to {gas_price} wei"),
            )?,
            Rule::present(
                "Explicit Gas Limit",
                "gasLimit",
                Importance::High,
                "Transactions set an explicit gasLimit",
            )?,
            Rule::present(
                "EIP-1559 Fields",
                "maxFeePerGas",
                Importance::Low,
                "Fee fields are set with maxFeePerGas / maxPriorityFeePerGas",
            )?,
            Rule::present(
                "Batched Calls",
                "(?i)multicall|batch",
                Importance::Medium,
                "Reads are batched instead of sent one by one",
            )?,
            Rule::absent(
                "No Gas Estimation",
                "estimateGas",
                Importance::High,
                "No estimateGas round trips before sending",
            )?,
        ],
    ))
}

/// Checklist items for a migration of the given complexity. Simple projects
/// get the five base items; moderate adds six; complex adds ten more.
pub fn checklist_items(config: &MonadConfig, complexity: Complexity) -> Vec<String> {
    let net = &config.network;
    let gas = &config.gas;
    let limits = &config.limits;
    let multicall = config
        .contract_address("Multicall3")
        .unwrap_or("the Multicall3 deployment");

    let mut items = vec![
        format!("Point RPC endpoints at {}", net.rpc_url),
        format!("Set chain id {} in every network configuration", net.chain_id),
        format!(
            "Set gas price to {} wei ({} gwei)",
            gas.default_gas_price(),
            gas.default_gas_price_gwei()
        ),
        format!("Fund deployer accounts with testnet {}", net.currency_symbol),
        format!("Deploy contracts and verify them on {}", net.explorer_url),
    ];

    if matches!(complexity, Complexity::Moderate | Complexity::Complex) {
        items.extend([
            "Replace estimateGas calls with static gas limits".to_string(),
            format!("Aggregate contract reads through Multicall3 at {multicall}"),
            "Run independent RPC requests concurrently with Promise.all".to_string(),
            format!(
                "Split eth_getLogs queries into ranges of {} blocks",
                limits.max_log_block_range
            ),
            format!(
                "Confirm deployed bytecode stays under {} bytes",
                limits.max_contract_size
            ),
            format!(
                "Configure an indexer (Envio `{}` or Goldsky `{}`)",
                config.indexers.envio_network, config.indexers.goldsky_network
            ),
        ]);
    }

    if complexity == Complexity::Complex {
        items.extend([
            "Manage nonces locally for concurrent transaction submission".to_string(),
            format!(
                "Send transactions in batches of {}",
                limits.recommended_batch_size
            ),
            "Audit gas limits per transaction type; the full limit is charged".to_string(),
            "Remove hard-coded chain ids and block-number assumptions from contracts".to_string(),
            "Switch integrations to canonical Permit2, CreateX and EntryPoint deployments"
                .to_string(),
            format!(
                "Load test with up to {} concurrent requests",
                limits.max_concurrent_requests
            ),
            "Rescale block-based timeouts and voting periods for faster blocks".to_string(),
            "Re-test cross-contract call ordering under parallel execution".to_string(),
            "Add monitoring and alerting for failed or stuck transactions".to_string(),
            "Plan rollback and fallback RPC endpoints before cut-over".to_string(),
        ]);
    }

    items
}

fn project_notes(project_type: ProjectType) -> &'static str {
    match project_type {
        ProjectType::Dapp => {
            "Front ends should read through a batched client and subscribe to new heads instead of polling."
        }
        ProjectType::Defi => {
            "Re-point oracles, routers and price feeds to their Monad deployments before enabling trading."
        }
        ProjectType::Nft => {
            "Batch mints and metadata reads; marketplaces should index through Envio or Goldsky."
        }
        ProjectType::Gaming => {
            "High-frequency game actions need local nonce management and explicit gas limits."
        }
        ProjectType::Infrastructure => {
            "Keep log queries within the block range limit and size batches to the RPC limits."
        }
    }
}

/// End-of-migration checks: rule scoring and checklists.
pub struct ValidationTools {
    config: Arc<MonadConfig>,
    migration: RuleSet,
    gas: RuleSet,
}

impl ValidationTools {
    pub fn new(config: Arc<MonadConfig>) -> Result<Self, ToolError> {
        let migration = migration_rules(&config)?;
        let gas = gas_rules(&config)?;
        Ok(Self {
            config,
            migration,
            gas,
        })
    }

    fn render_analysis(md: &mut Markdown, analysis: &Analysis) {
        md.field(
            "Score",
            format!(
                "{}/100 ({}/{} checks passed)",
                analysis.score,
                analysis.passed_count(),
                analysis.total()
            ),
        );

        md.heading(2, "Checks");
        for result in &analysis.results {
            let importance = result
                .importance
                .map(|i| format!(" ({})", i.as_str()))
                .unwrap_or_default();
            md.checkbox(
                result.passed,
                &format!("**{}**{}: {}", result.name, importance, result.description),
            );
        }

        md.heading(2, "Action Items");
        let mut failed = analysis.failed().peekable();
        if failed.peek().is_none() {
            md.line("None. All checks passed.");
        }
        for (i, result) in failed.enumerate() {
            md.numbered(i + 1, &format!("{}: {}", result.name, result.description));
        }
    }

    fn validate_monad_migration(&self, args: &ValidateMonadMigrationArgs) -> Report {
        let analysis = self.migration.evaluate(&args.code_base);

        let mut md = Markdown::new();
        md.heading(1, "Monad Migration Validation");
        md.field("Project type", args.project_type)
            .field(
                "Target",
                format!("{} ({})", self.config.network.name, self.config.network.chain_id),
            );
        Self::render_analysis(&mut md, &analysis);

        md.heading(2, "Project Notes").para(project_notes(args.project_type));

        md.into_report()
    }

    fn check_gas_optimization(&self, args: &CheckGasOptimizationArgs) -> Report {
        let gas = &self.config.gas;
        let analysis = self.gas.evaluate(&args.code);

        let mut md = Markdown::new();
        md.heading(1, "Gas Optimization Check");
        Self::render_analysis(&mut md, &analysis);

        md.heading(2, "Monad Gas Parameters")
            .field("Base fee", format!("{} wei", gas.base_fee_wei))
            .field("Priority fee", format!("{} wei", gas.priority_fee_wei))
            .field("Gas price", format!("{} wei", gas.default_gas_price()))
            .field("Transfer gas", gas.transfer_gas);

        md.into_report()
    }

    fn generate_migration_checklist(&self, args: &GenerateMigrationChecklistArgs) -> Report {
        let net = &self.config.network;
        let items = checklist_items(&self.config, args.complexity);

        let mut md = Markdown::new();
        md.heading(1, "Monad Migration Checklist");
        md.field("Target", format!("{} (chain id {})", net.name, net.chain_id))
            .field("Complexity", args.complexity)
            .field("Items", items.len());

        md.heading(2, "Tasks");
        for (i, item) in items.iter().enumerate() {
            md.checkbox(false, &format!("{}. {}", i + 1, item));
        }

        md.into_report()
    }
}

#[async_trait]
impl ToolModule for ValidationTools {
    fn name(&self) -> &str {
        "validation"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new(
                OperationName::ValidateMonadMigration.as_str(),
                "Score a migrated codebase against Monad migration checks",
                json!({
                    "type": "object",
                    "properties": {
                        "projectType": {
                            "type": "string",
                            "enum": ProjectType::wire_values()
                        },
                        "codeBase": {
                            "type": "string",
                            "description": "Source code or configuration to check"
                        }
                    },
                    "required": ["projectType", "codeBase"]
                }),
            ),
            OperationDescriptor::new(
                OperationName::CheckGasOptimization.as_str(),
                "Score code against Monad gas best practices",
                json!({
                    "type": "object",
                    "properties": {
                        "code": {
                            "type": "string",
                            "description": "Code that sends transactions"
                        }
                    },
                    "required": ["code"]
                }),
            ),
            OperationDescriptor::new(
                OperationName::GenerateMigrationChecklist.as_str(),
                "Produce a migration checklist sized to project complexity",
                json!({
                    "type": "object",
                    "properties": {
                        "complexity": {
                            "type": "string",
                            "enum": Complexity::wire_values()
                        }
                    },
                    "required": ["complexity"]
                }),
            ),
        ]
    }

    async fn execute(&self, operation: Operation) -> Result<Report, ToolError> {
        match operation {
            Operation::ValidateMonadMigration(args) => Ok(self.validate_monad_migration(&args)),
            Operation::CheckGasOptimization(args) => Ok(self.check_gas_optimization(&args)),
            Operation::GenerateMigrationChecklist(args) => {
                Ok(self.generate_migration_checklist(&args))
            }
            other => Err(ToolError::OperationNotFound(other.name().to_string())),
        }
    }
}
