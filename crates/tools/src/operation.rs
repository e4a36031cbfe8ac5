//! Typed operations.
//!
//! Every operation the server understands is a variant of [`Operation`]
//! carrying its own argument struct. Protocol callers go through
//! [`Operation::from_call`], which turns a name and a JSON argument object
//! into a variant; Rust callers construct variants directly.

use crate::error::ToolError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a closed enum whose variants map one-to-one onto wire strings.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub fn wire_values() -> Vec<&'static str> {
                Self::ALL.iter().map(|value| value.as_str()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(
    /// Names of every operation, in registration order.
    OperationName {
        MigrateContractDeployment => "migrate_contract_deployment",
        OptimizeContractSize => "optimize_contract_size",
        AddMonadGasOptimizations => "add_monad_gas_optimizations",
        GenerateMonadDeploymentScript => "generate_monad_deployment_script",
        MigrateWeb3Config => "migrate_web3_config",
        OptimizeRpcCalls => "optimize_rpc_calls",
        ImplementBatchCalls => "implement_batch_calls",
        OptimizeGasEstimation => "optimize_gas_estimation",
        ImplementGasLimitStrategy => "implement_gas_limit_strategy",
        ImplementMulticallPattern => "implement_multicall_pattern",
        OptimizeConcurrentCalls => "optimize_concurrent_calls",
        SetupEnvioIndexer => "setup_envio_indexer",
        ConfigureGoldskySubgraph => "configure_goldsky_subgraph",
        ImplementConcurrentTransactions => "implement_concurrent_transactions",
        OptimizeNonceManagement => "optimize_nonce_management",
        ValidateMonadMigration => "validate_monad_migration",
        CheckGasOptimization => "check_gas_optimization",
        GenerateMigrationChecklist => "generate_migration_checklist",
    }
);

impl FromStr for OperationName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ToolError::OperationNotFound(s.to_string()))
    }
}

wire_enum!(ContractType {
    Erc20 => "erc20",
    Erc721 => "erc721",
    Erc1155 => "erc1155",
    Defi => "defi",
    Governance => "governance",
    Custom => "custom",
});

wire_enum!(
    /// Client frameworks whose chain configuration can be migrated.
    Web3Framework {
        Ethers => "ethers",
        Web3 => "web3",
        Viem => "viem",
        Wagmi => "wagmi",
    }
);

wire_enum!(Web3Library {
    Ethers => "ethers",
    Web3 => "web3",
    Viem => "viem",
});

wire_enum!(DeployFramework {
    Hardhat => "hardhat",
    Foundry => "foundry",
});

wire_enum!(OptimizationLevel {
    Basic => "basic",
    Aggressive => "aggressive",
});

wire_enum!(WalletType {
    Eoa => "eoa",
    SmartWallet => "smart_wallet",
    Multisig => "multisig",
});

wire_enum!(ProjectType {
    Dapp => "dapp",
    Defi => "defi",
    Nft => "nft",
    Gaming => "gaming",
    Infrastructure => "infrastructure",
});

wire_enum!(Complexity {
    Simple => "simple",
    Moderate => "moderate",
    Complex => "complex",
});

fn default_true() -> bool {
    true
}

fn default_hardhat() -> DeployFramework {
    DeployFramework::Hardhat
}

fn default_basic() -> OptimizationLevel {
    OptimizationLevel::Basic
}

fn default_ethers() -> Web3Library {
    Web3Library::Ethers
}

fn default_safety_margin() -> u32 {
    20
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateContractDeploymentArgs {
    pub original_code: String,
    pub contract_type: ContractType,
    #[serde(default)]
    pub constructor_args: Vec<String>,
    #[serde(default = "default_true")]
    pub optimize_for_monad: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeContractSizeArgs {
    pub contract_code: String,
    #[serde(default)]
    pub target_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMonadGasOptimizationsArgs {
    pub contract_code: String,
    #[serde(default = "default_basic")]
    pub optimization_level: OptimizationLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMonadDeploymentScriptArgs {
    pub contract_name: String,
    #[serde(default)]
    pub constructor_args: Vec<String>,
    #[serde(default = "default_hardhat")]
    pub framework: DeployFramework,
    #[serde(default = "default_true")]
    pub verify: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateWeb3ConfigArgs {
    pub original_config: String,
    pub framework: Web3Framework,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRpcCallsArgs {
    pub code: String,
    pub library: Web3Library,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementBatchCallsArgs {
    pub functions: Vec<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeGasEstimationArgs {
    pub code: String,
    #[serde(default = "default_ethers")]
    pub library: Web3Library,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementGasLimitStrategyArgs {
    pub transaction_types: Vec<String>,
    #[serde(default = "default_safety_margin")]
    pub safety_margin: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementMulticallPatternArgs {
    pub calls: Vec<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeConcurrentCallsArgs {
    pub original_code: String,
    #[serde(default)]
    pub max_concurrency: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupEnvioIndexerArgs {
    pub contract_address: String,
    pub events: Vec<String>,
    #[serde(default)]
    pub contract_name: Option<String>,
    #[serde(default)]
    pub start_block: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureGoldskySubgraphArgs {
    pub contract_name: String,
    pub events: Vec<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub start_block: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementConcurrentTransactionsArgs {
    pub transaction_count: u64,
    #[serde(default)]
    pub batch_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeNonceManagementArgs {
    pub wallet_type: WalletType,
    #[serde(default)]
    pub concurrent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateMonadMigrationArgs {
    pub project_type: ProjectType,
    pub code_base: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckGasOptimizationArgs {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMigrationChecklistArgs {
    pub complexity: Complexity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    MigrateContractDeployment(MigrateContractDeploymentArgs),
    OptimizeContractSize(OptimizeContractSizeArgs),
    AddMonadGasOptimizations(AddMonadGasOptimizationsArgs),
    GenerateMonadDeploymentScript(GenerateMonadDeploymentScriptArgs),
    MigrateWeb3Config(MigrateWeb3ConfigArgs),
    OptimizeRpcCalls(OptimizeRpcCallsArgs),
    ImplementBatchCalls(ImplementBatchCallsArgs),
    OptimizeGasEstimation(OptimizeGasEstimationArgs),
    ImplementGasLimitStrategy(ImplementGasLimitStrategyArgs),
    ImplementMulticallPattern(ImplementMulticallPatternArgs),
    OptimizeConcurrentCalls(OptimizeConcurrentCallsArgs),
    SetupEnvioIndexer(SetupEnvioIndexerArgs),
    ConfigureGoldskySubgraph(ConfigureGoldskySubgraphArgs),
    ImplementConcurrentTransactions(ImplementConcurrentTransactionsArgs),
    OptimizeNonceManagement(OptimizeNonceManagementArgs),
    ValidateMonadMigration(ValidateMonadMigrationArgs),
    CheckGasOptimization(CheckGasOptimizationArgs),
    GenerateMigrationChecklist(GenerateMigrationChecklistArgs),
}

impl Operation {
    pub fn name(&self) -> OperationName {
        match self {
            Operation::MigrateContractDeployment(_) => OperationName::MigrateContractDeployment,
            Operation::OptimizeContractSize(_) => OperationName::OptimizeContractSize,
            Operation::AddMonadGasOptimizations(_) => OperationName::AddMonadGasOptimizations,
            Operation::GenerateMonadDeploymentScript(_) => {
                OperationName::GenerateMonadDeploymentScript
            }
            Operation::MigrateWeb3Config(_) => OperationName::MigrateWeb3Config,
            Operation::OptimizeRpcCalls(_) => OperationName::OptimizeRpcCalls,
            Operation::ImplementBatchCalls(_) => OperationName::ImplementBatchCalls,
            Operation::OptimizeGasEstimation(_) => OperationName::OptimizeGasEstimation,
            Operation::ImplementGasLimitStrategy(_) => OperationName::ImplementGasLimitStrategy,
            Operation::ImplementMulticallPattern(_) => OperationName::ImplementMulticallPattern,
            Operation::OptimizeConcurrentCalls(_) => OperationName::OptimizeConcurrentCalls,
            Operation::SetupEnvioIndexer(_) => OperationName::SetupEnvioIndexer,
            Operation::ConfigureGoldskySubgraph(_) => OperationName::ConfigureGoldskySubgraph,
            Operation::ImplementConcurrentTransactions(_) => {
                OperationName::ImplementConcurrentTransactions
            }
            Operation::OptimizeNonceManagement(_) => OperationName::OptimizeNonceManagement,
            Operation::ValidateMonadMigration(_) => OperationName::ValidateMonadMigration,
            Operation::CheckGasOptimization(_) => OperationName::CheckGasOptimization,
            Operation::GenerateMigrationChecklist(_) => OperationName::GenerateMigrationChecklist,
        }
    }

    /// Parse a protocol-level call. A `null` argument value is treated as an
    /// empty object.
    pub fn from_call(name: &str, args: serde_json::Value) -> Result<Self, ToolError> {
        let name: OperationName = name.parse()?;
        Self::from_parts(name, args)
    }

    pub fn from_parts(name: OperationName, args: serde_json::Value) -> Result<Self, ToolError> {
        let args = if args.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            args
        };

        let operation = match name {
            OperationName::MigrateContractDeployment => {
                Operation::MigrateContractDeployment(parse_args(name, args)?)
            }
            OperationName::OptimizeContractSize => {
                Operation::OptimizeContractSize(parse_args(name, args)?)
            }
            OperationName::AddMonadGasOptimizations => {
                Operation::AddMonadGasOptimizations(parse_args(name, args)?)
            }
            OperationName::GenerateMonadDeploymentScript => {
                Operation::GenerateMonadDeploymentScript(parse_args(name, args)?)
            }
            OperationName::MigrateWeb3Config => {
                Operation::MigrateWeb3Config(parse_args(name, args)?)
            }
            OperationName::OptimizeRpcCalls => Operation::OptimizeRpcCalls(parse_args(name, args)?),
            OperationName::ImplementBatchCalls => {
                Operation::ImplementBatchCalls(parse_args(name, args)?)
            }
            OperationName::OptimizeGasEstimation => {
                Operation::OptimizeGasEstimation(parse_args(name, args)?)
            }
            OperationName::ImplementGasLimitStrategy => {
                Operation::ImplementGasLimitStrategy(parse_args(name, args)?)
            }
            OperationName::ImplementMulticallPattern => {
                Operation::ImplementMulticallPattern(parse_args(name, args)?)
            }
            OperationName::OptimizeConcurrentCalls => {
                Operation::OptimizeConcurrentCalls(parse_args(name, args)?)
            }
            OperationName::SetupEnvioIndexer => {
                Operation::SetupEnvioIndexer(parse_args(name, args)?)
            }
            OperationName::ConfigureGoldskySubgraph => {
                Operation::ConfigureGoldskySubgraph(parse_args(name, args)?)
            }
            OperationName::ImplementConcurrentTransactions => {
                Operation::ImplementConcurrentTransactions(parse_args(name, args)?)
            }
            OperationName::OptimizeNonceManagement => {
                Operation::OptimizeNonceManagement(parse_args(name, args)?)
            }
            OperationName::ValidateMonadMigration => {
                Operation::ValidateMonadMigration(parse_args(name, args)?)
            }
            OperationName::CheckGasOptimization => {
                Operation::CheckGasOptimization(parse_args(name, args)?)
            }
            OperationName::GenerateMigrationChecklist => {
                Operation::GenerateMigrationChecklist(parse_args(name, args)?)
            }
        };

        Ok(operation)
    }
}

fn parse_args<T: DeserializeOwned>(
    name: OperationName,
    args: serde_json::Value,
) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::invalid(name.as_str(), e.to_string()))
}
