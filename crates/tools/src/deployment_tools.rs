use crate::error::ToolError;
use crate::operation::{
    AddMonadGasOptimizationsArgs, ContractType, DeployFramework, GenerateMonadDeploymentScriptArgs,
    MigrateContractDeploymentArgs, Operation, OperationName, OptimizationLevel,
    OptimizeContractSizeArgs,
};
use crate::render::{is_identifier, js_string, percent_of, Markdown};
use crate::scan::Scanner;
use crate::traits::{OperationDescriptor, Report, ToolModule};
use async_trait::async_trait;
use monad_mcp_config::MonadConfig;
use serde_json::json;
use std::sync::Arc;

/// Contract-level migration: deployment, bytecode size and gas.
pub struct ContractDeploymentTools {
    config: Arc<MonadConfig>,
    scanner: Scanner,
}

impl ContractDeploymentTools {
    pub fn new(config: Arc<MonadConfig>, scanner: Scanner) -> Self {
        Self { config, scanner }
    }

    fn migrate_contract_deployment(&self, args: &MigrateContractDeploymentArgs) -> Report {
        let net = &self.config.network;
        let gas = &self.config.gas;
        let limits = &self.config.limits;
        let size = args.original_code.len() as u64;

        let mut md = Markdown::new();
        md.heading(1, "Monad Contract Deployment Migration");

        md.heading(2, "Target Network")
            .field("Network", &net.name)
            .field("Chain ID", net.chain_id)
            .field("RPC URL", &net.rpc_url)
            .field("Explorer", &net.explorer_url)
            .field("Contract type", args.contract_type);

        md.heading(2, "Source Review").field(
            "Source size",
            format!(
                "{} bytes ({}% of the {} byte contract limit)",
                size,
                percent_of(size, limits.max_contract_size),
                limits.max_contract_size
            ),
        );

        let foreign: Vec<String> = self
            .scanner
            .chain_ids(&args.original_code)
            .into_iter()
            .filter(|id| *id != net.chain_id)
            .map(|id| id.to_string())
            .collect();
        if foreign.is_empty() {
            md.bullet("No hard-coded foreign chain ids found.");
        } else {
            md.bullet(&format!(
                "Hard-coded chain ids found: {}. Replace them with {} or read `block.chainid`.",
                foreign.join(", "),
                net.chain_id
            ));
        }

        md.heading(2, "Contract Type Notes");
        for note in contract_type_notes(args.contract_type) {
            md.bullet(note);
        }

        md.heading(2, "Constructor Arguments");
        if args.constructor_args.is_empty() {
            md.line("None.");
        } else {
            for (i, arg) in args.constructor_args.iter().enumerate() {
                md.numbered(i + 1, &format!("`{arg}`"));
            }
        }

        if args.optimize_for_monad {
            md.heading(2, "Monad Optimizations")
                .bullet(&format!(
                    "Use a fixed gas price of {} wei ({} gwei base + {} gwei priority).",
                    gas.default_gas_price(),
                    gas.base_fee_gwei(),
                    gas.priority_fee_gwei()
                ))
                .bullet(
                    "Monad charges the full gas limit, so send explicit gas limits instead of padded estimates.",
                )
                .bullet(&format!(
                    "Deployed bytecode may be up to {} bytes; splitting into libraries is rarely needed.",
                    limits.max_contract_size
                ))
                .bullet(
                    "Enable the optimizer (`runs: 200`) and `viaIR` for smaller, cheaper bytecode.",
                );
        }

        let ctor = args
            .constructor_args
            .iter()
            .map(|a| js_string(a))
            .collect::<Vec<_>>()
            .join(", ");

        md.heading(2, "Deployment Configuration").code(
            "typescript",
            &format!(
                r#"// hardhat.config.ts
networks: {{
  monadTestnet: {{
    url: "{rpc}",
    chainId: {chain_id},
    gasPrice: {gas_price},
    accounts: [process.env.PRIVATE_KEY!],
  }},
}},

// deploy
const factory = await ethers.getContractFactory("Contract");
const contract = await factory.deploy({ctor}{sep}{{ gasPrice: {gas_price}n }});
await contract.waitForDeployment();"#,
                rpc = net.rpc_url,
                chain_id = net.chain_id,
                gas_price = gas.default_gas_price(),
                ctor = ctor,
                sep = if ctor.is_empty() { "" } else { ", " },
            ),
        );

        md.heading(2, "Source").code(
            "solidity",
            &format!(
                "// Target: {} (chain id {})\n{}",
                net.name, net.chain_id, args.original_code
            ),
        );

        md.into_report()
    }

    fn optimize_contract_size(&self, args: &OptimizeContractSizeArgs) -> Report {
        let limit = args
            .target_size
            .filter(|size| *size > 0)
            .unwrap_or(self.config.limits.max_contract_size);
        let size = args.contract_code.len() as u64;
        let code = &args.contract_code;

        let mut md = Markdown::new();
        md.heading(1, "Contract Size Optimization");

        md.heading(2, "Size Budget")
            .field("Source size", format!("{size} bytes"))
            .field("Size limit", format!("{limit} bytes"))
            .field("Usage", format!("{}%", percent_of(size, limit)))
            .field(
                "Status",
                if size <= limit {
                    "within limit"
                } else {
                    "over limit"
                },
            );
        md.para(&format!(
            "Monad allows deployed bytecode up to {} bytes. The figure above measures source text; check the compiled size with `forge build --sizes` or `hardhat-contract-sizer`.",
            self.config.limits.max_contract_size
        ));

        md.heading(2, "Findings");
        let requires = self.scanner.string_requires(code);
        if requires > 0 {
            md.bullet(&format!(
                "{requires} `require` statement(s) with string messages; custom errors are smaller."
            ));
        }
        let loops = self.scanner.for_loops(code);
        if loops > 0 {
            md.bullet(
                &format!("{loops} `for` loop(s); hoist repeated storage reads out of loop bodies."),
            );
        }
        if requires == 0 && loops == 0 {
            md.bullet("No size hot spots detected.");
        }

        md.heading(2, "Techniques")
            .numbered(1, "Replace revert strings with custom errors.")
            .numbered(2, "Move shared logic into external libraries.")
            .numbered(3, "Drop unused functions, modifiers and events.")
            .numbered(4, "Prefer internal functions over repeated modifiers.")
            .numbered(5, "Compile with the optimizer and `viaIR` enabled.");

        md.heading(2, "Compiler Settings").code(
            "toml",
            r#"# foundry.toml
[profile.default]
optimizer = true
optimizer_runs = 200
via_ir = true"#,
        );

        md.into_report()
    }

    fn add_monad_gas_optimizations(&self, args: &AddMonadGasOptimizationsArgs) -> Report {
        let gas = &self.config.gas;
        let code = &args.contract_code;

        let mut md = Markdown::new();
        md.heading(1, "Monad Gas Optimizations");

        md.heading(2, "Gas Pricing")
            .field("Base fee", format!("{} wei ({} gwei)", gas.base_fee_wei, gas.base_fee_gwei()))
            .field(
                "Priority fee",
                format!("{} wei ({} gwei)", gas.priority_fee_wei, gas.priority_fee_gwei()),
            )
            .field(
                "Default gas price",
                format!("{} wei ({} gwei)", gas.default_gas_price(), gas.default_gas_price_gwei()),
            )
            .field("Standard transfer", format!("{} gas", gas.transfer_gas));
        md.para(
            "Transactions are charged on the gas limit rather than gas used. Tight limits matter more than on Ethereum.",
        );

        md.heading(2, "Findings");
        let loops = self.scanner.for_loops(code);
        let requires = self.scanner.string_requires(code);
        md.bullet(&format!("`for` loops: {loops}"))
            .bullet(&format!("`require` with string messages: {requires}"));

        md.heading(2, "Recommendations")
            .bullet("Cache storage reads in memory variables inside functions.")
            .bullet("Use `calldata` instead of `memory` for read-only external arguments.")
            .bullet("Replace revert strings with custom errors.")
            .bullet("Mark constants and set-once values `constant` / `immutable`.");

        if args.optimization_level == OptimizationLevel::Aggressive {
            md.heading(2, "Aggressive Optimizations")
                .bullet("Pack related state variables into single 32-byte slots.")
                .bullet("Wrap loop counters in `unchecked` blocks.")
                .bullet("Use inline assembly for hot paths such as balance lookups.")
                .bullet("Emit events instead of storing data that is only read off-chain.");
        }

        md.heading(2, "Example").code(
            "solidity",
            r#"error InsufficientBalance(uint256 available, uint256 required);

function sum(uint256[] calldata values) external pure returns (uint256 total) {
    uint256 len = values.length;
    for (uint256 i; i < len; ) {
        total += values[i];
        unchecked { ++i; }
    }
}"#,
        );

        md.into_report()
    }

    fn generate_monad_deployment_script(
        &self,
        args: &GenerateMonadDeploymentScriptArgs,
    ) -> Result<Report, ToolError> {
        let name = args.contract_name.trim();
        if !is_identifier(name) {
            return Err(ToolError::invalid(
                OperationName::GenerateMonadDeploymentScript.as_str(),
                format!("contractName `{}` is not a valid identifier", args.contract_name),
            ));
        }

        let net = &self.config.network;
        let gas_price = self.config.gas.default_gas_price();

        let mut md = Markdown::new();
        md.heading(1, &format!("Deployment Script: {name}"));
        md.field("Framework", args.framework)
            .field("Network", format!("{} ({})", net.name, net.chain_id))
            .field("Gas price", format!("{gas_price} wei"));

        match args.framework {
            DeployFramework::Hardhat => {
                let ctor = args
                    .constructor_args
                    .iter()
                    .map(|a| js_string(a))
                    .collect::<Vec<_>>();
                let deploy_args = if ctor.is_empty() {
                    format!("{{ gasPrice: {gas_price}n }}")
                } else {
                    format!("{}, {{ gasPrice: {gas_price}n }}", ctor.join(", "))
                };

                md.heading(2, "scripts/deploy.ts").code(
                    "typescript",
                    &format!(
                        r#"import {{ ethers }} from "hardhat";

async function main() {{
  const network = await ethers.provider.getNetwork();
  if (network.chainId !== {chain_id}n) {{
    throw new Error(`Expected chain {chain_id}, got ${{network.chainId}}`);
  }}

  const factory = await ethers.getContractFactory("{name}");
  const contract = await factory.deploy({deploy_args});
  await contract.waitForDeployment();

  console.log("{name} deployed to:", await contract.getAddress());
}}

main().catch((error) => {{
  console.error(error);
  process.exitCode = 1;
}});"#,
                        chain_id = net.chain_id,
                        name = name,
                        deploy_args = deploy_args,
                    ),
                );
                md.heading(2, "Run").code(
                    "bash",
                    "npx hardhat run scripts/deploy.ts --network monadTestnet",
                );

                if args.verify {
                    let mut cmd = String::from(
                        "npx hardhat verify --network monadTestnet <DEPLOYED_ADDRESS>",
                    );
                    for a in &args.constructor_args {
                        cmd.push(' ');
                        cmd.push_str(&js_string(a));
                    }
                    md.heading(2, "Verify").code("bash", &cmd).para(&format!(
                        "Verified sources appear on {}.",
                        net.explorer_url
                    ));
                }
            }
            DeployFramework::Foundry => {
                let ctor = args.constructor_args.join(", ");
                md.heading(2, &format!("script/Deploy{name}.s.sol")).code(
                    "solidity",
                    &format!(
                        r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.24;

import {{Script}} from "forge-std/Script.sol";
import {{{name}}} from "../src/{name}.sol";

contract Deploy{name} is Script {{
    function run() external returns ({name} deployed) {{
        require(block.chainid == {chain_id}, "wrong chain");
        vm.startBroadcast();
        deployed = new {name}({ctor});
        vm.stopBroadcast();
    }}
}}"#,
                        name = name,
                        chain_id = net.chain_id,
                        ctor = ctor,
                    ),
                );

                let mut cmd = format!(
                    "forge script script/Deploy{name}.s.sol \\\n  --rpc-url {} \\\n  --with-gas-price {gas_price} \\\n  --broadcast",
                    net.rpc_url
                );
                if args.verify {
                    cmd.push_str(" \\\n  --verify --verifier sourcify");
                }
                md.heading(2, "Run").code("bash", &cmd);
            }
        }

        Ok(md.into_report())
    }
}

fn contract_type_notes(contract_type: ContractType) -> &'static [&'static str] {
    match contract_type {
        ContractType::Erc20 => &[
            "Standard ERC-20 logic ports unchanged; re-check any hard-coded decimals or supply caps tied to another chain.",
            "Use WMON instead of WETH for wrapped native token integrations.",
        ],
        ContractType::Erc721 => &[
            "Batch mints benefit from Monad throughput; keep per-transaction gas limits explicit.",
            "Point metadata base URIs at chain-agnostic storage.",
        ],
        ContractType::Erc1155 => &[
            "Prefer `safeBatchTransferFrom` for multi-token moves.",
            "Re-check any URI templates that embed a chain id.",
        ],
        ContractType::Defi => &[
            "Replace oracle and router addresses with their Monad deployments.",
            "Use the canonical Multicall3 and Permit2 deployments for integrations.",
            "Re-tune time-based parameters; blocks arrive much faster than on Ethereum.",
        ],
        ContractType::Governance => &[
            "Voting periods expressed in blocks must be rescaled for faster block times.",
            "Prefer timestamp-based voting clocks (ERC-6372).",
        ],
        ContractType::Custom => {
            &["Review every external address and block-number assumption before deploying."]
        }
    }
}

#[async_trait]
impl ToolModule for ContractDeploymentTools {
    fn name(&self) -> &str {
        "contract_deployment"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new(
                OperationName::MigrateContractDeployment.as_str(),
                "Adapt an existing contract and its deployment setup to Monad",
                json!({
                    "type": "object",
                    "properties": {
                        "originalCode": {
                            "type": "string",
                            "description": "Original contract source"
                        },
                        "contractType": {
                            "type": "string",
                            "enum": ContractType::wire_values(),
                            "description": "Kind of contract being migrated"
                        },
                        "constructorArgs": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Constructor arguments, in order"
                        },
                        "optimizeForMonad": {
                            "type": "boolean",
                            "description": "Include Monad-specific gas and size notes",
                            "default": true
                        }
                    },
                    "required": ["originalCode", "contractType"]
                }),
            ),
            OperationDescriptor::new(
                OperationName::OptimizeContractSize.as_str(),
                "Check contract size against the Monad limit and suggest reductions",
                json!({
                    "type": "object",
                    "properties": {
                        "contractCode": {
                            "type": "string",
                            "description": "Contract source"
                        },
                        "targetSize": {
                            "type": "integer",
                            "minimum": 1,
                            "description": "Size budget in bytes (defaults to the Monad limit)"
                        }
                    },
                    "required": ["contractCode"]
                }),
            ),
            OperationDescriptor::new(
                OperationName::AddMonadGasOptimizations.as_str(),
                "Suggest gas optimizations for Monad's pricing model",
                json!({
                    "type": "object",
                    "properties": {
                        "contractCode": {
                            "type": "string",
                            "description": "Contract source"
                        },
                        "optimizationLevel": {
                            "type": "string",
                            "enum": OptimizationLevel::wire_values(),
                            "default": "basic"
                        }
                    },
                    "required": ["contractCode"]
                }),
            ),
            OperationDescriptor::new(
                OperationName::GenerateMonadDeploymentScript.as_str(),
                "Generate a Hardhat or Foundry deployment script targeting Monad",
                json!({
                    "type": "object",
                    "properties": {
                        "contractName": {
                            "type": "string",
                            "description": "Solidity contract name"
                        },
                        "constructorArgs": {
                            "type": "array",
                            "items": {"type": "string"}
                        },
                        "framework": {
                            "type": "string",
                            "enum": DeployFramework::wire_values(),
                            "default": "hardhat"
                        },
                        "verify": {
                            "type": "boolean",
                            "description": "Include a verification step",
                            "default": true
                        }
                    },
                    "required": ["contractName"]
                }),
            ),
        ]
    }

    async fn execute(&self, operation: Operation) -> Result<Report, ToolError> {
        match operation {
            Operation::MigrateContractDeployment(args) => {
                Ok(self.migrate_contract_deployment(&args))
            }
            Operation::OptimizeContractSize(args) => Ok(self.optimize_contract_size(&args)),
            Operation::AddMonadGasOptimizations(args) => {
                Ok(self.add_monad_gas_optimizations(&args))
            }
            Operation::GenerateMonadDeploymentScript(args) => {
                self.generate_monad_deployment_script(&args)
            }
            other => Err(ToolError::OperationNotFound(other.name().to_string())),
        }
    }
}
