use crate::error::ToolError;
use crate::operation::{
    ImplementConcurrentTransactionsArgs, Operation, OperationName, OptimizeNonceManagementArgs,
    WalletType,
};
use crate::render::{format_units, Markdown};
use crate::traits::{OperationDescriptor, Report, ToolModule};
use async_trait::async_trait;
use monad_mcp_config::MonadConfig;
use serde_json::json;
use std::sync::Arc;

/// Batches listed individually before the plan is summarised.
const MAX_LISTED_BATCHES: u64 = 10;

/// Transaction submission: batching and nonce handling.
pub struct TransactionTools {
    config: Arc<MonadConfig>,
}

impl TransactionTools {
    pub fn new(config: Arc<MonadConfig>) -> Self {
        Self { config }
    }

    fn implement_concurrent_transactions(
        &self,
        args: &ImplementConcurrentTransactionsArgs,
    ) -> Result<Report, ToolError> {
        let op = OperationName::ImplementConcurrentTransactions.as_str();
        if args.transaction_count == 0 {
            return Err(ToolError::invalid(op, "transactionCount must be at least 1"));
        }
        let batch_size = args
            .batch_size
            .unwrap_or(self.config.limits.recommended_batch_size);
        if batch_size == 0 {
            return Err(ToolError::invalid(op, "batchSize must be at least 1"));
        }

        let gas = &self.config.gas;
        let count = args.transaction_count;
        let batches = count.div_ceil(batch_size);
        let total_gas = count as u128 * gas.transfer_gas as u128;
        let total_cost = total_gas
            .checked_mul(gas.default_gas_price() as u128)
            .ok_or_else(|| ToolError::invalid(op, "total transfer cost overflows"))?;

        let mut md = Markdown::new();
        md.heading(1, "Concurrent Transactions");
        md.field("Transactions", count)
            .field("Batch size", batch_size)
            .field("Batches", batches)
            .field("Gas per transfer", gas.transfer_gas)
            .field(
                "Total transfer cost",
                format!(
                    "{} {}",
                    format_units(total_cost, 18),
                    self.config.network.currency_symbol
                ),
            );

        md.heading(2, "Batch Plan");
        for batch in 0..batches.min(MAX_LISTED_BATCHES) {
            let first = batch * batch_size + 1;
            let last = (batch + 1).saturating_mul(batch_size).min(count);
            md.numbered(batch as usize + 1, &format!("transactions {first}-{last}"));
        }
        if batches > MAX_LISTED_BATCHES {
            md.line(&format!("... and {} more batches", batches - MAX_LISTED_BATCHES));
        }

        md.heading(2, "Implementation").code(
            "typescript",
            &format!(
                r#"const BATCH_SIZE = {batch_size};
const GAS_PRICE = {gas_price}n;
const GAS_LIMIT = {transfer_gas}n;

export async function sendConcurrent(wallet, requests) {{
  let nonce = await wallet.getNonce("pending");
  const receipts = [];

  for (let i = 0; i < requests.length; i += BATCH_SIZE) {{
    const batch = requests.slice(i, i + BATCH_SIZE).map((request) =>
      wallet.sendTransaction({{
        ...request,
        nonce: nonce++,
        gasLimit: request.gasLimit ?? GAS_LIMIT,
        gasPrice: GAS_PRICE,
        chainId: {chain_id},
      }})
    );
    const sent = await Promise.all(batch);
    receipts.push(...(await Promise.all(sent.map((tx) => tx.wait()))));
  }}

  return receipts;
}}"#,
                batch_size = batch_size,
                gas_price = gas.default_gas_price(),
                transfer_gas = gas.transfer_gas,
                chain_id = self.config.network.chain_id,
            ),
        );

        md.heading(2, "Notes")
            .bullet(
                "Nonces are assigned locally, so every transaction in a batch can be broadcast at once.",
            )
            .bullet(
                "If a send fails, re-read the pending nonce before retrying the remaining batch.",
            );

        Ok(md.into_report())
    }

    fn optimize_nonce_management(&self, args: &OptimizeNonceManagementArgs) -> Report {
        let mut md = Markdown::new();
        md.heading(1, &format!("Nonce Management ({})", args.wallet_type));

        match args.wallet_type {
            WalletType::Eoa => {
                md.heading(2, "Strategy")
                    .bullet("Read the pending nonce once at startup.")
                    .bullet("Hand out nonces from a local counter behind a mutex or queue.")
                    .bullet(
                        "Resync from the node on `nonce too low` or `replacement underpriced` errors.",
                    );
                md.code(
                    "typescript",
                    r#"export class NonceManager {
  private next?: number;
  private lock = Promise.resolve();

  constructor(private provider, private address: string) {}

  async acquire(): Promise<number> {
    let release;
    const previous = this.lock;
    this.lock = new Promise((resolve) => (release = resolve));
    await previous;
    try {
      if (this.next === undefined) {
        this.next = await this.provider.getTransactionCount(this.address, "pending");
      }
      return this.next++;
    } finally {
      release();
    }
  }

  reset() {
    this.next = undefined;
  }
}"#,
                );
            }
            WalletType::SmartWallet => {
                let entry_point = self
                    .config
                    .contract_address("EntryPointV07")
                    .unwrap_or("ENTRY_POINT_ADDRESS");
                md.heading(2, "Strategy")
                    .field("EntryPoint", format!("`{entry_point}`"))
                    .bullet(
                        "ERC-4337 accounts use two-dimensional nonces: a 192-bit key and a 64-bit sequence.",
                    )
                    .bullet(
                        "Give each independent flow its own key so user operations do not block each other.",
                    );
                md.code(
                    "typescript",
                    &format!(
                        r#"const entryPoint = new ethers.Contract(
  "{entry_point}",
  ["function getNonce(address sender, uint192 key) view returns (uint256)"],
  provider
);

const nonce = await entryPoint.getNonce(account, flowKey);"#
                    ),
                );
            }
            WalletType::Multisig => {
                md.heading(2, "Strategy")
                    .bullet("Multisig transactions execute strictly in nonce order.")
                    .bullet("Queue proposals off-chain and collect signatures before submitting.")
                    .bullet(
                        "Batch several actions into one MultiSend transaction to use a single nonce.",
                    );
                md.code(
                    "typescript",
                    r#"const nonce = await safe.getNonce();
const tx = await safe.createTransaction({ transactions: actions, options: { nonce } });
const signed = await safe.signTransaction(tx);
await safe.executeTransaction(signed);"#,
                );
            }
        }

        if args.concurrent {
            md.heading(2, "Concurrent Submission")
                .bullet(&format!(
                    "Allocate nonces up front for a whole batch (up to {} transactions).",
                    self.config.limits.recommended_batch_size
                ))
                .bullet(
                    "Broadcast the batch in parallel; a gap blocks later nonces until it is filled.",
                )
                .bullet(
                    "Track each nonce until its receipt arrives and rebroadcast any that were dropped.",
                );
        }

        md.into_report()
    }
}

#[async_trait]
impl ToolModule for TransactionTools {
    fn name(&self) -> &str {
        "transactions"
    }

    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::new(
                OperationName::ImplementConcurrentTransactions.as_str(),
                "Send many transactions in parallel batches with local nonces",
                json!({
                    "type": "object",
                    "properties": {
                        "transactionCount": {
                            "type": "integer",
                            "minimum": 1,
                            "description": "Number of transactions to send"
                        },
                        "batchSize": {
                            "type": "integer",
                            "minimum": 1,
                            "description": "Transactions per batch"
                        }
                    },
                    "required": ["transactionCount"]
                }),
            ),
            OperationDescriptor::new(
                OperationName::OptimizeNonceManagement.as_str(),
                "Pick a nonce strategy for a wallet type",
                json!({
                    "type": "object",
                    "properties": {
                        "walletType": {
                            "type": "string",
                            "enum": WalletType::wire_values()
                        },
                        "concurrent": {
                            "type": "boolean",
                            "default": false
                        }
                    },
                    "required": ["walletType"]
                }),
            ),
        ]
    }

    async fn execute(&self, operation: Operation) -> Result<Report, ToolError> {
        match operation {
            Operation::ImplementConcurrentTransactions(args) => {
                self.implement_concurrent_transactions(&args)
            }
            Operation::OptimizeNonceManagement(args) => Ok(self.optimize_nonce_management(&args)),
            other => Err(ToolError::OperationNotFound(other.name().to_string())),
        }
    }
}
