use crate::error::ToolError;
use crate::operation::{
    ConfigureGoldskySubgraphArgs, Operation, OperationName, SetupEnvioIndexerArgs,
};
use crate::render::{bare_name, is_identifier, lower_first, Markdown};
use crate::traits::{OperationDescriptor, Report, ToolModule};
use async_trait::async_trait;
use monad_mcp_config::{is_address, MonadConfig};
use serde_json::json;
use std::sync::Arc;

const ADDRESS_PLACEHOLDER: &str = "<CONTRACT_ADDRESS>";

/// Indexer scaffolding for Envio HyperIndex and Goldsky subgraphs.
pub struct IndexingTools {
    config: Arc<MonadConfig>,
}

impl IndexingTools {
    pub fn new(config: Arc<MonadConfig>) -> Self {
        Self { config }
    }

    fn describe_address(&self, md: &mut Markdown, address: &str) {
        if !is_address(address) {
            md.bullet(&format!(
                "Warning: `{address}` is not a 0x-prefixed 20-byte address."
            ));
        } else if let Some(name) = self.config.name_for_address(address) {
            md.bullet(&format!("`{address}` is the canonical {name} deployment."));
        }
    }

    fn setup_envio_indexer(&self, args: &SetupEnvioIndexerArgs) -> Result<Report, ToolError> {
        let net = &self.config.network;
        let contract = args
            .contract_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("Contract");
        check_contract_name(OperationName::SetupEnvioIndexer, contract)?;

        let mut md = Markdown::new();
        md.heading(1, &format!("Envio Indexer: {contract}"));
        md.field("Network", format!("{} ({})", self.config.indexers.envio_network, net.chain_id))
            .field("Contract", format!("`{}`", args.contract_address))
            .field("Start block", args.start_block)
            .field("Events", args.events.len());
        self.describe_address(&mut md, &args.contract_address);

        let event_lines = args
            .events
            .iter()
            .map(|event| format!("          - event: {event}"))
            .collect::<Vec<_>>()
            .join("\n");

        md.heading(2, "config.yaml").code(
            "yaml",
            &format!(
                r#"name: {indexer}-indexer
networks:
  - id: {chain_id}
    start_block: {start_block}
    contracts:
      - name: {contract}
        address:
          - {address}
        handler: src/EventHandlers.ts
        events:
{event_lines}"#,
                indexer = lower_first(contract),
                chain_id = net.chain_id,
                start_block = args.start_block,
                contract = contract,
                address = args.contract_address,
                event_lines = event_lines,
            ),
        );

        let mut schema = String::new();
        let mut handlers = format!("import {{ {contract} }} from \"generated\";\n");
        for event in &args.events {
            let name = bare_name(event);
            let entity = format!("{contract}_{name}");
            schema.push_str(&format!(
                "type {entity} {{\n  id: ID!\n  blockNumber: BigInt!\n  transactionHash: String!\n}}\n\n"
            ));
            handlers.push_str(&format!(
                r#"
{contract}.{name}.handler(async ({{ event, context }}) => {{
  context.{entity}.set({{
    id: `${{event.chainId}}_${{event.block.number}}_${{event.logIndex}}`,
    blockNumber: BigInt(event.block.number),
    transactionHash: event.transaction.hash,
  }});
}});
"#
            ));
        }

        if args.events.is_empty() {
            md.para("No events supplied; add at least one event before running codegen.");
        } else {
            md.heading(2, "schema.graphql").code("graphql", &schema);
            md.heading(2, "src/EventHandlers.ts").code("typescript", &handlers);
        }

        md.heading(2, "Commands").code(
            "bash",
            "pnpm envio codegen\npnpm envio dev",
        );
        md.para(&format!(
            "Envio queries blocks in ranges the node accepts; Monad RPC log queries are capped at {} blocks, so prefer HyperSync for backfills.",
            self.config.limits.max_log_block_range
        ));

        Ok(md.into_report())
    }

    fn configure_goldsky_subgraph(
        &self,
        args: &ConfigureGoldskySubgraphArgs,
    ) -> Result<Report, ToolError> {
        let network = &self.config.indexers.goldsky_network;
        let contract = args.contract_name.trim();
        check_contract_name(OperationName::ConfigureGoldskySubgraph, contract)?;
        let address = args
            .contract_address
            .as_deref()
            .unwrap_or(ADDRESS_PLACEHOLDER);

        let mut md = Markdown::new();
        md.heading(1, &format!("Goldsky Subgraph: {contract}"));
        md.field("Network", network)
            .field("Chain ID", self.config.network.chain_id)
            .field("Contract", format!("`{address}`"))
            .field("Start block", args.start_block)
            .field("Events", args.events.len());
        if let Some(address) = args.contract_address.as_deref() {
            self.describe_address(&mut md, address);
        }

        let handlers_yaml = args
            .events
            .iter()
            .map(|event| {
                format!(
                    "        - event: {event}\n          handler: handle{}",
                    bare_name(event)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let entities_yaml = args
            .events
            .iter()
            .map(|event| format!("        - {}", bare_name(event)))
            .collect::<Vec<_>>()
            .join("\n");

        md.heading(2, "subgraph.yaml").code(
            "yaml",
            &format!(
                r#"specVersion: 1.0.0
schema:
  file: ./schema.graphql
dataSources:
  - kind: ethereum
    name: {contract}
    network: {network}
    source:
      address: "{address}"
      abi: {contract}
      startBlock: {start_block}
    mapping:
      kind: ethereum/events
      apiVersion: 0.0.7
      language: wasm/assemblyscript
      entities:
{entities_yaml}
      abis:
        - name: {contract}
          file: ./abis/{contract}.json
      eventHandlers:
{handlers_yaml}
      file: ./src/mapping.ts"#,
                contract = contract,
                network = network,
                address = address,
                start_block = args.start_block,
                entities_yaml = entities_yaml,
                handlers_yaml = handlers_yaml,
            ),
        );

        if !args.events.is_empty() {
            let imports = args
                .events
                .iter()
                .map(|event| bare_name(event))
                .collect::<Vec<_>>();
            let mut mapping = format!(
                "import {{ {} }} from \"../generated/{contract}/{contract}\";\n",
                imports
                    .iter()
                    .map(|name| format!("{name} as {name}Event"))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            mapping.push_str(&format!(
                "import {{ {} }} from \"../generated/schema\";\n",
                imports.join(", ")
            ));
            for name in &imports {
                mapping.push_str(&format!(
                    r#"
export function handle{name}(event: {name}Event): void {{
  let entity = new {name}(event.transaction.hash.concatI32(event.logIndex.toI32()));
  entity.blockNumber = event.block.number;
  entity.save();
}}
"#
                ));
            }
            md.heading(2, "src/mapping.ts").code("typescript", &mapping);
        }

        md.heading(2, "Deploy").code(
            "bash",
            &format!(
                "graph codegen && graph build\ngoldsky subgraph deploy {}/1.0.0 --path .",
                lower_first(contract)
            ),
        );

        Ok(md.into_report())
    }
}

// Contract names become YAML keys, GraphQL types and TypeScript imports.
fn check_contract_name(operation: OperationName, name: &str) -> Result<(), ToolError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(ToolError::invalid(
            operation.as_str(),
            format!("contractName `{name}` is not a valid identifier"),
        ))
    }
}

#[async_trait]
impl ToolModule for IndexingTools {
    fn name(&self) -> &str {
        "indexing"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new(
                OperationName::SetupEnvioIndexer.as_str(),
                "Scaffold an Envio HyperIndex indexer for a Monad contract",
                json!({
                    "type": "object",
                    "properties": {
                        "contractAddress": {
                            "type": "string",
                            "description": "Address of the indexed contract"
                        },
                        "events": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Event signatures, e.g. Transfer(address indexed from, address indexed to, uint256 value)"
                        },
                        "contractName": {
                            "type": "string",
                            "default": "Contract"
                        },
                        "startBlock": {
                            "type": "integer",
                            "minimum": 0,
                            "default": 0
                        }
                    },
                    "required": ["contractAddress", "events"]
                }),
            ),
            OperationDescriptor::new(
                OperationName::ConfigureGoldskySubgraph.as_str(),
                "Generate a Goldsky subgraph manifest and mappings for Monad",
                json!({
                    "type": "object",
                    "properties": {
                        "contractName": {
                            "type": "string",
                            "description": "Contract and data source name"
                        },
                        "events": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Event signatures"
                        },
                        "contractAddress": {
                            "type": "string"
                        },
                        "startBlock": {
                            "type": "integer",
                            "minimum": 0,
                            "default": 0
                        }
                    },
                    "required": ["contractName", "events"]
                }),
            ),
        ]
    }

    async fn execute(&self, operation: Operation) -> Result<Report, ToolError> {
        match operation {
            Operation::SetupEnvioIndexer(args) => self.setup_envio_indexer(&args),
            Operation::ConfigureGoldskySubgraph(args) => self.configure_goldsky_subgraph(&args),
            other => Err(ToolError::OperationNotFound(other.name().to_string())),
        }
    }
}
