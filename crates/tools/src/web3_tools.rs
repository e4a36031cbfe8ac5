use crate::error::ToolError;
use crate::operation::{
    ImplementBatchCallsArgs, MigrateWeb3ConfigArgs, Operation, OperationName,
    OptimizeRpcCallsArgs, Web3Framework, Web3Library,
};
use crate::render::{bare_name, js_string, Markdown};
use crate::scan::Scanner;
use crate::traits::{OperationDescriptor, Report, ToolModule};
use async_trait::async_trait;
use monad_mcp_config::{is_address, MonadConfig};
use serde_json::json;
use std::sync::Arc;

/// Client-side configuration: providers, RPC usage and request batching.
pub struct Web3ConfigTools {
    config: Arc<MonadConfig>,
    scanner: Scanner,
}

impl Web3ConfigTools {
    pub fn new(config: Arc<MonadConfig>, scanner: Scanner) -> Self {
        Self { config, scanner }
    }

    fn chain_definition(&self, framework: Web3Framework) -> String {
        let net = &self.config.network;
        let batch = self.config.limits.recommended_batch_size;

        match framework {
            Web3Framework::Ethers => format!(
                r#"import {{ ethers }} from "ethers";

const monadTestnet = {{ chainId: {chain_id}, name: "monad-testnet" }};

export const provider = new ethers.JsonRpcProvider(
  "{rpc}",
  monadTestnet,
  {{ staticNetwork: true, batchMaxCount: {batch} }}
);"#,
                chain_id = net.chain_id,
                rpc = net.rpc_url,
                batch = batch,
            ),
            Web3Framework::Web3 => format!(
                r#"import {{ Web3 }} from "web3";

export const web3 = new Web3("{rpc}");

const chainId = await web3.eth.getChainId();
if (chainId !== {chain_id}n) {{
  throw new Error(`Connected to chain ${{chainId}}, expected {chain_id}`);
}}"#,
                chain_id = net.chain_id,
                rpc = net.rpc_url,
            ),
            Web3Framework::Viem | Web3Framework::Wagmi => {
                let define = format!(
                    r#"import {{ defineChain, createPublicClient, http }} from "viem";

export const monadTestnet = defineChain({{
  id: {chain_id},
  name: "{name}",
  nativeCurrency: {{ name: "{symbol}", symbol: "{symbol}", decimals: 18 }},
  rpcUrls: {{
    default: {{ http: ["{rpc}"], webSocket: ["{ws}"] }},
  }},
  blockExplorers: {{
    default: {{ name: "Monad Explorer", url: "{explorer}" }},
  }},
  testnet: true,
}});"#,
                    chain_id = net.chain_id,
                    name = net.name,
                    symbol = net.currency_symbol,
                    rpc = net.rpc_url,
                    ws = net.ws_url,
                    explorer = net.explorer_url,
                );

                let client = if framework == Web3Framework::Wagmi {
                    format!(
                        r#"

import {{ createConfig }} from "wagmi";

export const config = createConfig({{
  chains: [monadTestnet],
  transports: {{
    [monadTestnet.id]: http("{rpc}", {{ batch: {{ batchSize: {batch} }} }}),
  }},
}});"#,
                        rpc = net.rpc_url,
                        batch = batch,
                    )
                } else {
                    format!(
                        r#"

export const client = createPublicClient({{
  chain: monadTestnet,
  transport: http("{rpc}", {{ batch: {{ batchSize: {batch} }} }}),
}});"#,
                        rpc = net.rpc_url,
                        batch = batch,
                    )
                };

                define + &client
            }
        }
    }

    fn migrate_web3_config(&self, args: &MigrateWeb3ConfigArgs) -> Report {
        let net = &self.config.network;
        let original = &args.original_config;

        let mut md = Markdown::new();
        md.heading(1, &format!("Web3 Config Migration ({})", args.framework));

        md.heading(2, "Detected Settings");
        let ids = self.scanner.chain_ids(original);
        if ids.is_empty() {
            md.bullet("Chain ids: none found");
        } else {
            let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
            md.bullet(&format!("Chain ids: {}", ids.join(", ")));
        }
        let endpoints = self.scanner.endpoints(original);
        if endpoints.is_empty() {
            md.bullet("Endpoints: none found");
        } else {
            for url in &endpoints {
                md.bullet(&format!("Endpoint `{url}` will be replaced"));
            }
        }

        md.heading(2, "Monad Settings")
            .field("Chain ID", net.chain_id)
            .field("RPC URL", &net.rpc_url)
            .field("WebSocket URL", &net.ws_url)
            .field("Explorer", &net.explorer_url)
            .field("Currency", &net.currency_symbol);

        md.heading(2, "Updated Configuration")
            .code("typescript", &self.chain_definition(args.framework));

        md.heading(2, "Original Configuration").code("typescript", original);

        md.into_report()
    }

    fn optimize_rpc_calls(&self, args: &OptimizeRpcCallsArgs) -> Report {
        let limits = &self.config.limits;
        let code = &args.code;

        let mut md = Markdown::new();
        md.heading(1, &format!("RPC Call Optimization ({})", args.library));

        md.heading(2, "Findings");
        let in_loops = self.scanner.awaits_in_loops(code);
        let polling = self.scanner.polling_loops(code);
        let log_queries = self.scanner.log_queries(code);
        md.field("Awaited calls inside loops", in_loops)
            .field("Polling timers", polling)
            .field("Log queries", log_queries);

        md.heading(2, "Recommendations");
        if in_loops > 0 {
            md.bullet(
                "Collect loop requests and send them together with `Promise.all` or a batch request.",
            );
        }
        if polling > 0 {
            md.bullet(
                "Replace `setInterval` block polling with a WebSocket `newHeads` subscription.",
            );
        }
        if log_queries > 0 {
            md.bullet(&format!(
                "Split log queries into ranges of at most {} blocks.",
                limits.max_log_block_range
            ));
        }
        md.bullet(&format!(
            "Keep JSON-RPC batches at {} requests or fewer.",
            limits.recommended_batch_size
        ))
        .bullet("Cache immutable reads such as token decimals and symbols.");

        let batching = match args.library {
            Web3Library::Ethers => format!(
                r#"const provider = new ethers.JsonRpcProvider("{rpc}", undefined, {{
  batchMaxCount: {batch},
  batchStallTime: 10,
}});

const balances = await Promise.all(
  addresses.map((address) => provider.getBalance(address))
);"#,
                rpc = self.config.network.rpc_url,
                batch = limits.recommended_batch_size,
            ),
            Web3Library::Web3 => format!(
                r#"const batch = new web3.BatchRequest();
for (const address of addresses.slice(0, {batch})) {{
  batch.add({{ jsonrpc: "2.0", id: address, method: "eth_getBalance", params: [address, "latest"] }});
}}
const balances = await batch.execute();"#,
                batch = limits.recommended_batch_size,
            ),
            Web3Library::Viem => format!(
                r#"const client = createPublicClient({{
  chain: monadTestnet,
  transport: http("{rpc}", {{ batch: {{ batchSize: {batch}, wait: 10 }} }}),
}});

const balances = await Promise.all(
  addresses.map((address) => client.getBalance({{ address }}))
);"#,
                rpc = self.config.network.rpc_url,
                batch = limits.recommended_batch_size,
            ),
        };
        md.heading(2, "Batched Requests").code("typescript", &batching);

        md.heading(2, "Chunked Log Queries").code(
            "typescript",
            &format!(
                r#"const MAX_BLOCK_RANGE = {range}n;

async function getLogsChunked(getLogs, fromBlock, toBlock) {{
  const logs = [];
  for (let start = fromBlock; start <= toBlock; start += MAX_BLOCK_RANGE) {{
    const end = start + MAX_BLOCK_RANGE - 1n < toBlock ? start + MAX_BLOCK_RANGE - 1n : toBlock;
    logs.push(...(await getLogs({{ fromBlock: start, toBlock: end }})));
  }}
  return logs;
}}"#,
                range = limits.max_log_block_range,
            ),
        );

        md.into_report()
    }

    fn implement_batch_calls(&self, args: &ImplementBatchCallsArgs) -> Report {
        let batch_size = self.config.limits.recommended_batch_size.max(1) as usize;
        let count = args.functions.len();
        let batches = count.div_ceil(batch_size);

        let mut md = Markdown::new();
        md.heading(1, "Batch Call Implementation");

        md.field("Functions", count)
            .field("Batch size", batch_size)
            .field("Batches", batches);

        let target = match args.contract_address.as_deref() {
            Some(address) if is_address(address) => {
                if let Some(name) = self.config.name_for_address(address) {
                    md.field("Target", format!("`{address}` ({name})"));
                } else {
                    md.field("Target", format!("`{address}`"));
                }
                js_string(address)
            }
            Some(address) => {
                md.bullet(&format!(
                    "Warning: `{address}` is not a valid address; using a placeholder."
                ));
                "CONTRACT_ADDRESS".to_string()
            }
            None => "CONTRACT_ADDRESS".to_string(),
        };

        md.heading(2, "Calls");
        if args.functions.is_empty() {
            md.line("No functions supplied.");
        } else {
            for (i, function) in args.functions.iter().enumerate() {
                md.numbered(i + 1, &format!("`{function}` (batch {})", i / batch_size + 1));
            }
        }

        let entries = args
            .functions
            .iter()
            .map(|f| {
                format!(
                    "  {{ address: {target}, abi, functionName: {} }},",
                    js_string(bare_name(f))
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        md.heading(2, "Implementation").code(
            "typescript",
            &format!(
                r#"const BATCH_SIZE = {batch_size};

const calls = [
{entries}
];

async function runBatched(client, calls) {{
  const results = [];
  for (let i = 0; i < calls.length; i += BATCH_SIZE) {{
    const chunk = calls.slice(i, i + BATCH_SIZE);
    results.push(...(await client.multicall({{ contracts: chunk, allowFailure: true }})));
  }}
  return results;
}}"#,
                batch_size = batch_size,
                entries = entries,
            ),
        );

        md.into_report()
    }
}

#[async_trait]
impl ToolModule for Web3ConfigTools {
    fn name(&self) -> &str {
        "web3_config"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new(
                OperationName::MigrateWeb3Config.as_str(),
                "Rewrite a client chain configuration for Monad",
                json!({
                    "type": "object",
                    "properties": {
                        "originalConfig": {
                            "type": "string",
                            "description": "Existing provider or chain configuration"
                        },
                        "framework": {
                            "type": "string",
                            "enum": Web3Framework::wire_values()
                        }
                    },
                    "required": ["originalConfig", "framework"]
                }),
            ),
            OperationDescriptor::new(
                OperationName::OptimizeRpcCalls.as_str(),
                "Find RPC usage patterns that should be batched or chunked",
                json!({
                    "type": "object",
                    "properties": {
                        "code": {
                            "type": "string",
                            "description": "Client code making RPC calls"
                        },
                        "library": {
                            "type": "string",
                            "enum": Web3Library::wire_values()
                        }
                    },
                    "required": ["code", "library"]
                }),
            ),
            OperationDescriptor::new(
                OperationName::ImplementBatchCalls.as_str(),
                "Generate batched read calls for a list of contract functions",
                json!({
                    "type": "object",
                    "properties": {
                        "functions": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Function names or signatures"
                        },
                        "contractAddress": {
                            "type": "string",
                            "description": "Target contract address"
                        }
                    },
                    "required": ["functions"]
                }),
            ),
        ]
    }

    async fn execute(&self, operation: Operation) -> Result<Report, ToolError> {
        match operation {
            Operation::MigrateWeb3Config(args) => Ok(self.migrate_web3_config(&args)),
            Operation::OptimizeRpcCalls(args) => Ok(self.optimize_rpc_calls(&args)),
            Operation::ImplementBatchCalls(args) => Ok(self.implement_batch_calls(&args)),
            other => Err(ToolError::OperationNotFound(other.name().to_string())),
        }
    }
}
