use anyhow::Result;
use auction_ledger::{
    config::Config,
    ledger::AuctionLedger,
    persistence::{InMemoryStore, PostgresStore, SharedStore},
    service,
};
use clap::Parser;
use parking_lot::Mutex;
use tokio::{runtime::Runtime, sync::oneshot};
use tracing::info;

fn main() -> Result<()> {
    let config = Config::parse();
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .init();

    let store: SharedStore = match &config.postgres_url {
        Some(url) => {
            info!("using postgres store");
            PostgresStore::connect(url, config.postgres_pool_size)?.into_shared()
        }
        None => {
            info!("using in-memory store");
            InMemoryStore::new_shared()
        }
    };
    let ledger = AuctionLedger::new_shared(store);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let stop_tx = Mutex::new(Some(stop_tx));
    ctrlc::set_handler(move || {
        eprintln!("Stopping ledger...");
        if let Some(tx) = stop_tx.lock().take() {
            let _ = tx.send(());
        }
    })?;

    let runtime = Runtime::new()?;
    runtime.block_on(service::serve(config.listen, ledger, async {
        let _ = stop_rx.await;
    }))
}
