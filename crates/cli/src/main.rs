use clap::{Args, Parser, Subcommand};
use proxyzone_dns_api::AppState;
use proxyzone_dns_domain::CliOverrides;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

const DEFAULT_RELOAD_API: &str = "127.0.0.1:8054";

#[derive(Parser)]
#[command(name = "proxyzone-dns")]
#[command(version)]
#[command(about = "Authoritative DNS server with client-subnet aware proxy zones")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the DNS server and the reload API
    Start(StartArgs),

    /// Ask a running server to reload its zones
    Reload {
        /// Address of the reload API
        #[arg(long, value_name = "ADDR", default_value = DEFAULT_RELOAD_API)]
        reload_api: String,
    },
}

#[derive(Args)]
struct StartArgs {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Reload API address
    #[arg(long, value_name = "ADDR")]
    reload_api: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Start(args) => start(args).await,
        Command::Reload { reload_api } => reload(&reload_api).await,
    }
}

async fn start(args: StartArgs) -> anyhow::Result<()> {
    let cli_overrides = CliOverrides {
        dns_port: args.dns_port,
        bind_address: args.bind.clone(),
        reload_api: args.reload_api.clone(),
        log_level: args.log_level.clone(),
    };

    let config = bootstrap::load_config(args.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting proxyzone-dns v{}", env!("CARGO_PKG_VERSION"));
    bootstrap::log_config_summary(&config);

    let services = di::Services::new(&config, args.config.clone())?;
    let app_state = AppState {
        reload_zones: services.reload_zones.clone(),
    };

    let shutdown = CancellationToken::new();

    let dns_addr = config.server.dns_listen_addr();
    let dns_shutdown = shutdown.clone();
    let dns_task = tokio::spawn(server::start_dns_server(
        dns_addr,
        services.handler.clone(),
        dns_shutdown,
    ));

    let web_shutdown = shutdown.clone();
    let web_task = tokio::spawn(server::start_web_server(
        config.server.reload_api.clone(),
        app_state,
        web_shutdown,
    ));

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown signal received");
        signal_shutdown.cancel();
    });

    let (dns_result, web_result) = tokio::join!(
        watch(dns_task, "DNS server", shutdown.clone()),
        watch(web_task, "Reload API", shutdown.clone()),
    );

    info!("Server shutdown complete");
    dns_result.and(web_result)
}

/// Cancels everything else when `task` exits with an error.
async fn watch(
    task: tokio::task::JoinHandle<anyhow::Result<()>>,
    name: &'static str,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let result = match task.await {
        Ok(result) => result,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = &result {
        error!(server = name, error = %e, "Server failed");
        shutdown.cancel();
    }
    result
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn reload(reload_api: &str) -> anyhow::Result<()> {
    let url = format!("http://{}/dns/reload", reload_api);

    let response = reqwest::Client::new().post(&url).send().await?;
    let status = response.status();
    let body: serde_json::Value = response.json().await?;

    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        anyhow::bail!("reload failed with status {}", status);
    }
    Ok(())
}
