use crate::error::ToolError;
use crate::operation::{
    ImplementGasLimitStrategyArgs, Operation, OperationName, OptimizeGasEstimationArgs,
    Web3Library,
};
use crate::render::{format_units, js_string, Markdown};
use crate::scan::Scanner;
use crate::traits::{OperationDescriptor, Report, ToolModule};
use async_trait::async_trait;
use monad_mcp_config::MonadConfig;
use serde_json::json;
use std::sync::Arc;

/// Gas used by an unrecognised transaction type.
pub const DEFAULT_GAS_LIMIT: u64 = 100_000;

const KNOWN_GAS_LIMITS: &[(&str, u64)] = &[
    ("transfer", 21_000),
    ("erc20transfer", 65_000),
    ("approve", 50_000),
    ("swap", 250_000),
    ("mint", 150_000),
    ("deploy", 3_000_000),
];

/// Base gas for a transaction type. Matching ignores case, `_`, `-` and
/// spaces; `None` for unknown types.
pub fn base_gas_limit(transaction_type: &str) -> Option<u64> {
    let key: String = transaction_type
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect();
    KNOWN_GAS_LIMITS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, gas)| *gas)
}

/// `base * (100 + margin) / 100`, halves rounded up.
pub fn with_margin(base: u64, margin_percent: u32) -> u64 {
    let scaled = base as u128 * (100 + margin_percent as u128);
    ((2 * scaled + 100) / 200) as u64
}

/// Gas limits and pricing strategy.
pub struct GasStrategyTools {
    config: Arc<MonadConfig>,
    scanner: Scanner,
}

impl GasStrategyTools {
    pub fn new(config: Arc<MonadConfig>, scanner: Scanner) -> Self {
        Self { config, scanner }
    }

    fn optimize_gas_estimation(&self, args: &OptimizeGasEstimationArgs) -> Report {
        let gas = &self.config.gas;
        let price = gas.default_gas_price();
        let estimates = self.scanner.estimate_gas_calls(&args.code);

        let mut md = Markdown::new();
        md.heading(1, "Gas Estimation Optimization");

        md.heading(2, "Findings")
            .field("`estimateGas` calls", estimates);
        if estimates > 0 {
            md.para(
                "Each estimate is an extra round trip, and Monad bills the gas limit you send. Static limits per call type are faster and cheaper.",
            );
        } else {
            md.para(
                "No gas estimation calls found. Make sure every transaction still sets an explicit gas limit.",
            );
        }

        md.heading(2, "Static Gas Limits");
        for (name, limit) in KNOWN_GAS_LIMITS {
            md.bullet(&format!("`{name}`: {limit}"));
        }

        md.heading(2, "Pricing")
            .field("Gas price", format!("{} wei ({} gwei)", price, gas.default_gas_price_gwei()))
            .field("Transfer gas", gas.transfer_gas)
            .field(
                "Transfer cost",
                format!(
                    "{} {}",
                    format_units(gas.transfer_gas as u128 * price as u128, 18),
                    self.config.network.currency_symbol
                ),
            );

        let snippet = match args.library {
            Web3Library::Ethers => format!(
                r#"const tx = await contract.transfer(to, amount, {{
  gasLimit: 65000n,
  gasPrice: {price}n,
}});"#
            ),
            Web3Library::Web3 => format!(
                r#"await contract.methods.transfer(to, amount).send({{
  from,
  gas: 65000,
  gasPrice: "{price}",
}});"#
            ),
            Web3Library::Viem => format!(
                r#"await walletClient.writeContract({{
  address,
  abi,
  functionName: "transfer",
  args: [to, amount],
  gas: 65000n,
  gasPrice: {price}n,
}});"#
            ),
        };
        md.heading(2, &format!("Replacement ({})", args.library))
            .code("typescript", &snippet);

        md.into_report()
    }

    fn implement_gas_limit_strategy(&self, args: &ImplementGasLimitStrategyArgs) -> Report {
        let price = self.config.gas.default_gas_price();
        let symbol = &self.config.network.currency_symbol;
        let margin = args.safety_margin;

        let mut md = Markdown::new();
        md.heading(1, "Gas Limit Strategy");
        md.field("Safety margin", format!("{margin}%"))
            .field("Gas price", format!("{price} wei"));

        md.heading(2, "Limits")
            .line("| Type | Base | Limit | Max cost |")
            .line("|---|---|---|---|");

        let mut entries = Vec::with_capacity(args.transaction_types.len());
        let mut unknown = Vec::new();
        for tx_type in &args.transaction_types {
            let base = match base_gas_limit(tx_type) {
                Some(base) => base,
                None => {
                    unknown.push(tx_type.as_str());
                    DEFAULT_GAS_LIMIT
                }
            };
            let limit = with_margin(base, margin);
            let cost = format_units(limit as u128 * price as u128, 18);
            md.line(&format!("| {tx_type} | {base} | {limit} | {cost} {symbol} |"));
            entries.push(format!("  {}: {limit}n,", js_string(tx_type)));
        }

        if !unknown.is_empty() {
            md.para(&format!(
                "Unknown types ({}) use the default base of {} gas; measure them on testnet and update the table.",
                unknown.join(", "),
                DEFAULT_GAS_LIMIT
            ));
        }

        md.heading(2, "Implementation").code(
            "typescript",
            &format!(
                r#"export const GAS_PRICE = {price}n;

export const GAS_LIMITS = {{
{entries}
}} as const;

export function txOverrides(kind: keyof typeof GAS_LIMITS) {{
  return {{ gasLimit: GAS_LIMITS[kind], gasPrice: GAS_PRICE }};
}}"#,
                price = price,
                entries = entries.join("\n"),
            ),
        );

        md.into_report()
    }
}

#[async_trait]
impl ToolModule for GasStrategyTools {
    fn name(&self) -> &str {
        "gas_strategy"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new(
                OperationName::OptimizeGasEstimation.as_str(),
                "Replace dynamic gas estimation with static Monad gas settings",
                json!({
                    "type": "object",
                    "properties": {
                        "code": {
                            "type": "string",
                            "description": "Code that sends transactions"
                        },
                        "library": {
                            "type": "string",
                            "enum": Web3Library::wire_values(),
                            "default": "ethers"
                        }
                    },
                    "required": ["code"]
                }),
            ),
            OperationDescriptor::new(
                OperationName::ImplementGasLimitStrategy.as_str(),
                "Build a per-transaction-type gas limit table",
                json!({
                    "type": "object",
                    "properties": {
                        "transactionTypes": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Transaction kinds, e.g. transfer, approve, swap"
                        },
                        "safetyMargin": {
                            "type": "integer",
                            "minimum": 0,
                            "description": "Extra headroom in percent",
                            "default": 20
                        }
                    },
                    "required": ["transactionTypes"]
                }),
            ),
        ]
    }

    async fn execute(&self, operation: Operation) -> Result<Report, ToolError> {
        match operation {
            Operation::OptimizeGasEstimation(args) => Ok(self.optimize_gas_estimation(&args)),
            Operation::ImplementGasLimitStrategy(args) => {
                Ok(self.implement_gas_limit_strategy(&args))
            }
            other => Err(ToolError::OperationNotFound(other.name().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_gas_limit_normalizes() {
        assert_eq!(base_gas_limit("transfer"), Some(21_000));
        assert_eq!(base_gas_limit("ERC20_Transfer"), Some(65_000));
        assert_eq!(base_gas_limit("erc20-transfer"), Some(65_000));
        assert_eq!(base_gas_limit("bridge"), None);
    }

    #[test]
    fn test_with_margin() {
        assert_eq!(with_margin(21_000, 20), 25_200);
        assert_eq!(with_margin(21_000, 0), 21_000);
        assert_eq!(with_margin(1, 50), 2);
    }
}
