//! Kalshi yes/no pair arbitrage bot entry point.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kalshi_arb::api::{create_router, AppState};
use kalshi_arb::arbitrage::{select_best, ArbExecutor, ExecutionReport};
use kalshi_arb::auth::Authenticator;
use kalshi_arb::config::{Config, LegFailurePolicy};
use kalshi_arb::market::{Exchange, KalshiClient};
use kalshi_arb::metrics;
use kalshi_arb::trading::has_open_position;
use kalshi_arb::utils::shutdown_signal;
use kalshi_arb::BotError;

/// Kalshi yes/no pair arbitrage bot.
#[derive(Parser, Debug)]
#[command(name = "kalshi-arb")]
#[command(about = "Automated arbitrage bot for Kalshi binary-outcome markets")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port for health/metrics (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the main arbitrage bot loop (default).
    Run {
        /// HTTP server port for health/metrics (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Check credentials against the live API.
    CheckAuth,

    /// Run one scan and print the best opportunity without trading.
    Scan,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("kalshi_arb=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::CheckAuth) => cmd_check_auth().await,
        Some(Command::Scan) => cmd_scan().await,
        Some(Command::Run { port }) => cmd_run(port).await,
        None => cmd_run(args.port).await,
    }
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("KALSHI ARB BOT - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Check credential material
    print!("Checking credentials... ");
    match Authenticator::from_config(&config) {
        Ok(auth) => {
            println!("OK");
            println!("  Auth method: {}", auth.method());
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Credential material invalid"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Base URL: {}", config.kalshi_base_url);
    println!("  Profit Threshold: {}c", config.profit_threshold_cents);
    println!("  Contract Count: {}", config.contract_count);
    println!("  Scan Interval: {}s", config.scan_interval_secs);
    println!("  Market Page Limit: {}", config.market_page_limit);
    println!("  Leg Delay: {}ms", config.leg_delay_ms);
    println!("  Guard Fail Mode: {}", config.guard_fail_mode);
    println!("  Leg Failure Policy: {}", config.leg_failure_policy);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Check credentials against the live API.
async fn cmd_check_auth() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("KALSHI ARB BOT - AUTH CHECK");
    println!("======================================================================");

    let config = Config::load()?;
    config.validate()?;

    println!("Host: {}", config.kalshi_base_url);

    // Create client
    print!("\n1. Creating client... ");
    let auth = Authenticator::from_config(&config)?;
    println!("OK");
    println!("   Auth method: {}", auth.method());
    let client = KalshiClient::new(&config, auth);

    // Authenticate
    print!("\n2. Authenticating... ");
    match client.authenticate().await {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("   Error: {}", e);
            return Err(anyhow::anyhow!("Authentication failed"));
        }
    }

    // Fetch positions as a round-trip check of signed/authorized requests
    print!("\n3. Fetching positions... ");
    match client.positions().await {
        Ok(positions) => {
            println!("OK");
            let open = positions.iter().filter(|p| p.quantity != 0).count();
            println!("   Total records: {}", positions.len());
            println!("   Open positions: {}", open);
        }
        Err(e) => {
            println!("FAILED");
            println!("   Error: {}", e);
            return Err(anyhow::anyhow!("Positions fetch failed"));
        }
    }

    println!("\n======================================================================");
    println!("AUTH CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run one scan and print the best opportunity without trading.
async fn cmd_scan() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("KALSHI ARB BOT - SINGLE SCAN (no orders)");
    println!("======================================================================");

    let config = Config::load()?;
    config.validate()?;

    let auth = Authenticator::from_config(&config)?;
    let client = KalshiClient::new(&config, auth);
    client.authenticate().await?;

    println!("\nFetching open markets...");
    let markets = client.open_markets().await?;
    println!("  Markets scanned: {}", markets.len());

    match select_best(&markets, config.profit_threshold_cents) {
        Some(opp) => {
            println!("\nOPPORTUNITY FOUND");
            println!("----------------------------------------------------------------------");
            println!("  Ticker: {}", opp.ticker);
            println!("  Action: {}", opp.action);
            println!("  Yes Price: {}c", opp.yes_price);
            println!("  No Price: {}c", opp.no_price);
            println!("  Pair Sum: {}c", opp.pair_sum());
            println!("  Profit: {}c per contract pair", opp.profit_cents);
        }
        None => {
            println!(
                "\nNo opportunity at or above {}c across {} markets.",
                config.profit_threshold_cents,
                markets.len()
            );
        }
    }

    println!("======================================================================");
    Ok(())
}

/// Run the main arbitrage bot loop.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let port = port_override.unwrap_or(config.port);

    // Install the Prometheus recorder before any metric is emitted; the
    // describe_* calls only stick once a real recorder is in place
    let prometheus = PrometheusBuilder::new().install_recorder()?;
    metrics::init_metrics();

    // Create app state
    let app_state = AppState::new().with_prometheus(prometheus);

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(app_state.clone());

    // Spawn HTTP server
    let _server_handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    // Build credentials; a malformed private key is fatal here
    let auth = Authenticator::from_config(&config).map_err(|e| {
        error!("Credential material rejected: {}", e);
        e
    })?;
    let auth_method = auth.method();
    *app_state.auth_method.write().await = Some(auth_method);

    let client = KalshiClient::new(&config, auth);

    // Startup authentication failures are fatal; later ones are retried
    client.authenticate().await.map_err(|e| {
        error!("Initial authentication failed: {}", e);
        e
    })?;

    let mut executor = ArbExecutor::new(
        config.contract_count,
        Duration::from_millis(config.leg_delay_ms),
    );

    info!("========================================");
    info!("KALSHI ARBITRAGE BOT STARTED");
    info!("========================================");
    info!("Auth method: {}", auth_method);
    info!("Profit threshold: {}c", config.profit_threshold_cents);
    info!("Contract count: {}", config.contract_count);
    info!("Scan interval: {}s", config.scan_interval_secs);
    info!("========================================");

    app_state.set_ready(true);

    // Main bot loop
    loop {
        match run_cycle(&client, &config, &mut executor).await {
            Ok(report) => {
                app_state.record_scan_cycle();
                *app_state.stats.write().await = executor.stats();

                if let Some(report) = report {
                    if report.is_one_sided()
                        && config.leg_failure_policy == LegFailurePolicy::Halt
                    {
                        error!(
                            ticker = %report.opportunity.ticker,
                            "halting on one-sided execution per policy"
                        );
                        return Err(anyhow::anyhow!(
                            "one-sided execution on {}: yes={:?} no={:?}",
                            report.opportunity.ticker,
                            report.yes_leg,
                            report.no_leg
                        ));
                    }
                }

                tokio::time::sleep(Duration::from_secs(config.scan_interval_secs)).await;
            }
            Err(e) => {
                let backoff = backoff_for(&e, config.error_backoff_secs);
                warn!(error = %e, backoff_secs = backoff.as_secs(), "cycle failed, backing off");
                tokio::time::sleep(backoff).await;

                // Best-effort re-authentication; session tokens can expire
                metrics::inc_reauths();
                if let Err(e) = client.authenticate().await {
                    warn!(error = %e, "re-authentication failed, will retry next cycle");
                }
            }
        }
    }
}

/// One scan cycle: guard, scan, and execute at most one opportunity.
async fn run_cycle(
    client: &KalshiClient,
    config: &Config,
    executor: &mut ArbExecutor,
) -> Result<Option<ExecutionReport>, BotError> {
    let _timer = metrics::timer_scan();
    metrics::inc_scan_cycles();

    // Position guard: at most one trade in flight
    if has_open_position(client, config.guard_fail_mode).await {
        metrics::inc_guard_skips();
        return Ok(None);
    }

    let markets = client.open_markets().await?;

    let Some(opportunity) = select_best(&markets, config.profit_threshold_cents) else {
        return Ok(None);
    };
    metrics::inc_opportunities_detected();

    let report = executor.execute(client, opportunity).await;
    Ok(Some(report))
}

/// Backoff duration for a failed cycle. Authentication failures get a
/// longer pause so an expiring session is not hammered.
fn backoff_for(error: &BotError, base_secs: u64) -> Duration {
    use kalshi_arb::error::{FetchError, OrderError};
    match error {
        BotError::Auth(_)
        | BotError::Fetch(FetchError::Auth(_))
        | BotError::Order(OrderError::Auth(_)) => Duration::from_secs(base_secs * 2),
        _ => Duration::from_secs(base_secs),
    }
}
