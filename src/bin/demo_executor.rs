//! Demo Executor Binary
//!
//! Serves the wallet walkthrough model to an AltWalker driver:
//!
//! ```bash
//! cargo run --bin demo_executor -- --url http://localhost:5000
//! altwalker online tests -m models/wallet.json "random(vertex_coverage(100))" \
//!     --executor http --url http://localhost:5000
//! ```

use anyhow::{anyhow, bail, Context};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use altwalker_executor::registry::{MethodTable, Model};
use altwalker_executor::types::ContextMap;
use altwalker_executor::ExecutorService;

const INITIAL_BALANCE: i64 = 1000;

#[derive(Debug)]
struct Wallet {
    amount: i64,
}

impl Wallet {
    fn new(amount: i64) -> Self {
        Self { amount }
    }

    fn pay(&mut self, cost: i64) {
        self.amount -= cost;
    }
}

/// Wallet walkthrough: a full wallet, a random payment, a wallet that is no longer full
#[derive(Debug, Default)]
struct WalletModel {
    wallet: Option<Wallet>,
}

impl WalletModel {
    fn wallet(&mut self) -> anyhow::Result<&mut Wallet> {
        self.wallet
            .as_mut()
            .ok_or_else(|| anyhow!("setUpModel has not run for WalletModel"))
    }

    fn set_up_model(&mut self) {
        self.wallet = Some(Wallet::new(INITIAL_BALANCE));
    }

    fn full_wallet(&mut self, data: &mut ContextMap) -> anyhow::Result<()> {
        let amount = self.wallet()?.amount;
        data.insert("amount".to_string(), amount.into());
        if amount != INITIAL_BALANCE {
            bail!("expected a full wallet of {INITIAL_BALANCE}, found {amount}");
        }
        Ok(())
    }

    fn pay_random_amount(&mut self, data: &mut ContextMap) -> anyhow::Result<()> {
        let wallet = self.wallet()?;
        if wallet.amount <= 0 {
            bail!("wallet is empty");
        }
        let to_pay = (Uuid::new_v4().as_u128() % wallet.amount as u128) as i64;
        wallet.pay(to_pay);

        data.insert("amount".to_string(), wallet.amount.into());
        info!("payed {to_pay}");
        Ok(())
    }

    fn non_full_wallet(&mut self, data: &mut ContextMap) -> anyhow::Result<()> {
        let recorded = data
            .get("amount")
            .and_then(amount_of)
            .context("context map carries no numeric `amount`")?;
        let amount = self.wallet()?.amount;
        if recorded != amount {
            bail!("wallet holds {amount} but the context recorded {recorded}");
        }
        Ok(())
    }
}

/// The driver may hand numbers back as strings
fn amount_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

impl Model for WalletModel {
    fn construct() -> anyhow::Result<Self> {
        Ok(Self::default())
    }

    fn methods(table: &mut MethodTable<Self>) {
        table
            .step("setUpModel", WalletModel::set_up_model)
            .step_with_context("full_wallet", WalletModel::full_wallet)
            .step_with_context("pay_random_amount", WalletModel::pay_random_amount)
            .step_with_context("non_full_wallet", WalletModel::non_full_wallet);
    }
}

/// Minimal vertex/edge model
struct ExampleModel;

impl Model for ExampleModel {
    fn construct() -> anyhow::Result<Self> {
        Ok(ExampleModel)
    }

    fn methods(table: &mut MethodTable<Self>) {
        table
            .step("vertex_1", |_: &mut ExampleModel| info!("vertex_1"))
            .step("edge_1", |_: &mut ExampleModel| info!("edge_1"))
            .step("vertex_2", |_: &mut ExampleModel| info!("vertex_2"));
    }
}

/// Run-level fixtures
struct Setup;

impl Model for Setup {
    fn construct() -> anyhow::Result<Self> {
        Ok(Setup)
    }

    fn methods(table: &mut MethodTable<Self>) {
        table
            .step("setUpRun", |_: &mut Setup| info!("test run starting"))
            .step("tearDownRun", |_: &mut Setup| info!("test run finished"));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut service = ExecutorService::new();
    service
        .register_model::<WalletModel>()?
        .register_model::<ExampleModel>()?
        .register_setup::<Setup>()?;

    service.run_from_args(std::env::args_os()).await
}
