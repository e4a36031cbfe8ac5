use crate::error::ToolError;
use crate::operation::{
    ImplementMulticallPatternArgs, Operation, OperationName, OptimizeConcurrentCallsArgs,
};
use crate::render::{bare_name, js_string, Markdown};
use crate::scan::Scanner;
use crate::traits::{OperationDescriptor, Report, ToolModule};
use async_trait::async_trait;
use monad_mcp_config::{is_address, MonadConfig};
use serde_json::json;
use std::sync::Arc;

const MULTICALL3: &str = "Multicall3";

/// Read aggregation and request concurrency.
pub struct ParallelExecutionTools {
    config: Arc<MonadConfig>,
    scanner: Scanner,
}

impl ParallelExecutionTools {
    pub fn new(config: Arc<MonadConfig>, scanner: Scanner) -> Self {
        Self { config, scanner }
    }

    fn implement_multicall_pattern(&self, args: &ImplementMulticallPatternArgs) -> Report {
        let batch_size = self.config.limits.recommended_batch_size;

        let mut md = Markdown::new();
        md.heading(1, "Multicall Pattern");

        let multicall = match self.config.contract_address(MULTICALL3) {
            Some(address) => {
                md.field("Multicall3", format!("`{address}`"));
                js_string(address)
            }
            None => {
                md.bullet("Warning: no Multicall3 entry in the configured contract table.");
                "MULTICALL3_ADDRESS".to_string()
            }
        };

        let target = match args.contract_address.as_deref() {
            Some(address) if is_address(address) => {
                md.field("Target", format!("`{address}`"));
                js_string(address)
            }
            Some(address) => {
                md.bullet(&format!(
                    "Warning: `{address}` is not a valid address; using a placeholder."
                ));
                "TARGET_ADDRESS".to_string()
            }
            None => "TARGET_ADDRESS".to_string(),
        };

        md.field("Calls", args.calls.len())
            .field("Max calls per aggregate", batch_size);

        md.heading(2, "Calls");
        if args.calls.is_empty() {
            md.line("No calls supplied.");
        } else {
            for (i, call) in args.calls.iter().enumerate() {
                md.numbered(i + 1, &format!("`{call}`"));
            }
        }

        let contracts = args
            .calls
            .iter()
            .map(|call| {
                format!(
                    "    {{ address: {target}, abi, functionName: {} }},",
                    js_string(bare_name(call))
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        md.heading(2, "viem").code(
            "typescript",
            &format!(
                r#"const results = await client.multicall({{
  multicallAddress: {multicall},
  batchSize: {batch_size},
  allowFailure: true,
  contracts: [
{contracts}
  ],
}});"#
            ),
        );

        let encoded = args
            .calls
            .iter()
            .map(|call| {
                format!(
                    "  {{ target: {target}, allowFailure: true, callData: iface.encodeFunctionData({}, []) }},",
                    js_string(bare_name(call))
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        md.heading(2, "ethers").code(
            "typescript",
            &format!(
                r#"const multicall = new ethers.Contract(
  {multicall},
  ["function aggregate3((address target, bool allowFailure, bytes callData)[] calls) payable returns ((bool success, bytes returnData)[])"],
  provider
);

const calls = [
{encoded}
];

const results = await multicall.aggregate3.staticCall(calls);"#
            ),
        );

        md.into_report()
    }

    fn optimize_concurrent_calls(
        &self,
        args: &OptimizeConcurrentCallsArgs,
    ) -> Result<Report, ToolError> {
        let limit = args
            .max_concurrency
            .unwrap_or(self.config.limits.max_concurrent_requests);
        if limit == 0 {
            return Err(ToolError::invalid(
                OperationName::OptimizeConcurrentCalls.as_str(),
                "maxConcurrency must be at least 1",
            ));
        }

        let code = &args.original_code;
        let awaits = self.scanner.awaits(code);
        let in_loops = self.scanner.awaits_in_loops(code);
        let parallel = self.scanner.promise_alls(code);

        let mut md = Markdown::new();
        md.heading(1, "Concurrent Call Optimization");

        md.heading(2, "Findings")
            .field("`await` expressions", awaits)
            .field("Awaited calls inside loops", in_loops)
            .field("`Promise.all` / `Promise.allSettled`", parallel)
            .field("Concurrency limit", limit);

        md.heading(2, "Recommendations");
        if in_loops > 0 {
            md.bullet(
                "Turn loop bodies that await independent calls into a mapped list of promises.",
            );
        }
        if awaits > 1 && parallel == 0 {
            md.bullet(
                "Independent sequential awaits can be started together and awaited with `Promise.all`.",
            );
        }
        md.bullet(&format!(
            "Cap in-flight requests at {limit} to stay inside RPC rate limits."
        ))
        .bullet("Use `Promise.allSettled` where one failed read must not discard the rest.");

        md.heading(2, "Concurrency Helper").code(
            "typescript",
            &format!(
                r#"const MAX_CONCURRENCY = {limit};

export async function mapConcurrent<T, R>(
  items: T[],
  fn: (item: T) => Promise<R>,
  limit = MAX_CONCURRENCY
): Promise<R[]> {{
  const results: R[] = new Array(items.length);
  let next = 0;
  async function worker() {{
    while (next < items.length) {{
      const index = next++;
      results[index] = await fn(items[index]);
    }}
  }}
  await Promise.all(Array.from({{ length: Math.min(limit, items.length) }}, worker));
  return results;
}}"#
            ),
        );

        md.heading(2, "Original Code").code("typescript", code);

        Ok(md.into_report())
    }
}

#[async_trait]
impl ToolModule for ParallelExecutionTools {
    fn name(&self) -> &str {
        "parallel_execution"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new(
                OperationName::ImplementMulticallPattern.as_str(),
                "Aggregate contract reads through Multicall3",
                json!({
                    "type": "object",
                    "properties": {
                        "calls": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Function names or signatures to aggregate"
                        },
                        "contractAddress": {
                            "type": "string",
                            "description": "Contract the calls target"
                        }
                    },
                    "required": ["calls"]
                }),
            ),
            OperationDescriptor::new(
                OperationName::OptimizeConcurrentCalls.as_str(),
                "Rewrite sequential async calls to run concurrently",
                json!({
                    "type": "object",
                    "properties": {
                        "originalCode": {
                            "type": "string",
                            "description": "Code with sequential async calls"
                        },
                        "maxConcurrency": {
                            "type": "integer",
                            "minimum": 1,
                            "description": "Maximum in-flight requests"
                        }
                    },
                    "required": ["originalCode"]
                }),
            ),
        ]
    }

    async fn execute(&self, operation: Operation) -> Result<Report, ToolError> {
        match operation {
            Operation::ImplementMulticallPattern(args) => {
                Ok(self.implement_multicall_pattern(&args))
            }
            Operation::OptimizeConcurrentCalls(args) => self.optimize_concurrent_calls(&args),
            other => Err(ToolError::OperationNotFound(other.name().to_string())),
        }
    }
}
