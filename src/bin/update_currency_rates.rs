// One-shot currency rate refresh, meant to be run from cron.
//
// Usage:
//   update_currency_rates [--force] [db_path]
//
// Without --force a still-fresh cached table is left alone.

use std::sync::{Arc, Mutex};

use b2b_marketplace::app::resolve_db_path;
use b2b_marketplace::config::load_config;
use b2b_marketplace::currency::{
    fallback_rates, CurrencyConverter, ExchangeRateHostProvider, RateTable, SqliteRateStore,
    SystemClock,
};
use b2b_marketplace::db::{init_schema, open_sqlite_connection};

fn print_rates(rates: &RateTable) {
    for (currency, rate) in rates {
        println!("  1 USD = {:.4} {}", rate, currency);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    b2b_marketplace::logging::init();

    let mut force = false;
    let mut db_arg = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--force" => force = true,
            other => db_arg = Some(other.to_string()),
        }
    }

    let config = load_config()?;
    let db_path = match db_arg {
        Some(path) => path,
        None => resolve_db_path(&config.database.path),
    };

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let converter = CurrencyConverter::new(
        SqliteRateStore::new(conn, config.currency.cache_ttl_secs)?,
        ExchangeRateHostProvider::new(&config.currency)?,
        SystemClock,
    );

    println!("Starting currency rates update...");

    if force {
        converter.invalidate()?;
        println!("Cleared cached rates");
    } else if let Some(rates) = converter.cached() {
        println!("Cached rates are still fresh (use --force to refresh):");
        print_rates(&rates);
        return Ok(());
    }

    match converter.refresh().await {
        Ok(rates) => {
            let codes: Vec<_> = rates.keys().map(|c| c.as_str()).collect();
            println!("Successfully updated currency rates: {}", codes.join(", "));
            print_rates(&rates);
        }
        Err(e) => {
            tracing::error!(error = %e, "汇率更新失败");
            println!("WARNING: failed to fetch rates ({}), using fallback rates", e);
            print_rates(&fallback_rates());
        }
    }

    Ok(())
}
