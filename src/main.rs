use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod config;
mod controller;
mod dashboard;
mod error;
mod icons;
mod notify;
mod solana;
mod theme;
mod wallet;

use config::AppConfig;
use controller::{format_sol, TransferController, TransferSettings};
use dashboard::Dashboard;
use solana::client::DevnetClient;
use wallet::KeyfileEnvironment;

#[derive(Parser)]
#[command(name = "devnet-handoff")]
#[command(author, version)]
#[command(about = "Fund a throwaway devnet account and hand SOL off to your wallet")]
#[command(long_about = None)]
#[command(after_help = format!("\n{}\n  {} {}\n  {} {}\n  {} {}\n\n{}\n  {} {}\n  {} {}\n",
    "GETTING STARTED:".bright_magenta().bold(),
    "1.".bright_cyan(), "solana-keygen new            # if you have no wallet yet".bright_white(),
    "2.".bright_cyan(), "devnet-handoff               # open the dashboard".bright_white(),
    "3.".bright_cyan(), "devnet-handoff demo          # or run the whole flow headless".bright_white(),
    "NETWORK:".bright_magenta().bold(),
    "RPC:".bright_blue(), "https://api.devnet.solana.com".dimmed(),
    "Config:".bright_blue(), "~/.devnet-handoff/".dimmed(),
))]
#[command(styles = get_styles())]
struct Cli {
    /// RPC endpoint URL (defaults to the configured one, then devnet)
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Wallet keypair JSON file (defaults to the configured one, then ~/.config/solana/id.json)
    #[arg(long, global = true)]
    wallet: Option<String>,

    /// Log file (defaults to ~/.devnet-handoff/devnet-handoff.log)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal dashboard (default)
    Dashboard,

    /// Create, connect and transfer in one go, without the dashboard
    Demo,

    /// Configure default settings
    Config {
        /// Set default wallet keypair path
        #[arg(long)]
        wallet: Option<String>,

        /// Set default RPC endpoint
        #[arg(long)]
        rpc_url: Option<String>,

        /// Reconnect to the wallet at startup without asking
        #[arg(long)]
        trust_wallet: Option<bool>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

fn get_styles() -> clap::builder::Styles {
    use clap::builder::styling::*;
    clap::builder::Styles::styled()
        .header(AnsiColor::BrightMagenta.on_default().bold())
        .usage(AnsiColor::BrightCyan.on_default().bold())
        .literal(AnsiColor::BrightGreen.on_default())
        .placeholder(AnsiColor::Magenta.on_default())
        .error(AnsiColor::BrightRed.on_default().bold())
        .valid(AnsiColor::BrightCyan.on_default())
        .invalid(AnsiColor::BrightYellow.on_default())
}

fn print_banner() {
    println!();
    println!("{}", "╔═══════════════════════════════════════════════╗".on_black().bright_magenta());
    println!("{}", "║         D E V N E T   H A N D O F F           ║".on_black().bright_cyan().bold());
    println!("{}", "╚═══════════════════════════════════════════════╝".on_black().bright_magenta());
    println!();
}

fn print_section(title: &str) {
    println!("{}", format!("▓▒░ {} ░▒▓", title).on_black().bright_cyan().bold());
    println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".on_black().bright_magenta());
    println!();
}

/// Logs go to a file; stdout belongs to the dashboard.
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn spinner(message: String) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.magenta} {msg}")?,
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    Ok(spinner)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = match cli.log_file.clone() {
        Some(path) => path,
        None => AppConfig::default_log_path()?,
    };
    init_logging(&log_path)?;

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => {
            let config = AppConfig::load()?;
            let (controller, wallet_path) = build_controller(&config, &cli.rpc_url, &cli.wallet);
            cmd_dashboard(controller, wallet_path).await?;
        }

        Commands::Demo => {
            print_banner();
            print_section("DEVNET HANDOFF DEMO");
            let config = AppConfig::load()?;
            let (controller, _) = build_controller(&config, &cli.rpc_url, &cli.wallet);
            cmd_demo(controller).await?;
        }

        Commands::Config { wallet, rpc_url, trust_wallet, show } => {
            print_section("CONFIGURATION");
            let (mut config, load_error) = AppConfig::load_or_default_from(&AppConfig::config_path()?);
            if let Some(err) = load_error {
                eprintln!("{} {:#}", "Warning:".yellow().bold(), err);
                eprintln!("  Starting from defaults; saving replaces the existing file.");
                println!();
            }
            cmd_config(&mut config, wallet, rpc_url, trust_wallet, show)?;
        }
    }

    Ok(())
}

fn build_controller(
    config: &AppConfig,
    rpc_url: &Option<String>,
    wallet: &Option<String>,
) -> (TransferController, Option<PathBuf>) {
    let rpc_url = config.resolve_rpc_url(rpc_url.as_deref());
    let wallet_path = config.resolve_wallet_path(wallet.as_deref());
    tracing::info!(%rpc_url, wallet = ?wallet_path, "starting");

    let ledger = Arc::new(DevnetClient::new(&rpc_url));
    let mut controller = TransferController::new(ledger, TransferSettings::default());
    controller.detect_provider(&KeyfileEnvironment::new(wallet_path.clone(), config.trust_wallet));

    (controller, wallet_path)
}

async fn cmd_dashboard(mut controller: TransferController, wallet_path: Option<PathBuf>) -> Result<()> {
    // Trusted wallets reconnect silently; anything else waits for the user
    controller.try_eager_connect().await;

    let mut dashboard = Dashboard::new(controller, wallet_path);
    dashboard.run()
}

async fn cmd_demo(mut controller: TransferController) -> Result<()> {
    println!("{} {}", "RPC:   ".bold(), controller.endpoint().dimmed());
    match controller.provider() {
        Some(p) => println!("{} {}", "Wallet:".bold(), p.brand().yellow()),
        None => {
            eprintln!("{} No wallet provider found.", "Error:".red().bold());
            eprintln!("  Run {} or pass {}", "solana-keygen new".bright_white(), "--wallet <PATH>".bright_white());
            bail!("no wallet provider");
        }
    }
    println!();

    let grant = format_sol(controller.settings().fund_grant_lamports);
    let step = spinner(format!("Creating new account and airdropping {} SOL...", grant))?;
    let funding = controller.create_funded_account().await;
    step.finish_and_clear();
    let funding = report_step(&controller, funding)?;

    let step = spinner("Connecting to wallet...".to_string())?;
    let connected = controller.connect_wallet().await;
    step.finish_and_clear();
    let recipient = report_step(&controller, connected)?;

    let amount = format_sol(controller.settings().transfer_lamports);
    let step = spinner(format!("Transferring {} SOL to wallet...", amount))?;
    let transfer = controller.transfer_funds().await;
    step.finish_and_clear();
    let receipt = report_step(&controller, transfer)?;

    let balance = |lamports: Option<u64>| match lamports {
        Some(l) => format!("{} SOL", format_sol(l)),
        None => "---".to_string(),
    };

    println!();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table
        .set_header(vec![
            "Account".bright_white().to_string(),
            "Address".bright_white().to_string(),
            "Balance".bright_white().to_string(),
        ])
        .add_row(vec![
            "Sender".bright_cyan().to_string(),
            funding.address.to_string().bright_white().to_string(),
            balance(receipt.sender_balance).bright_yellow().to_string(),
        ])
        .add_row(vec![
            "Wallet".bright_cyan().to_string(),
            recipient.to_string().bright_white().to_string(),
            balance(receipt.recipient_balance).bright_yellow().to_string(),
        ]);
    println!("{}", table);
    println!();
    println!(
        "{} {} {}",
        "Airdrop: ".bold(),
        funding.signature.to_string().dimmed(),
        format!("(sender had {} after funding)", balance(funding.balance)).dimmed()
    );
    println!(
        "{} {} {}",
        "Transfer:".bold(),
        receipt.signature.to_string().dimmed(),
        format!("({} SOL)", format_sol(receipt.lamports)).dimmed()
    );
    println!();

    // Disconnect is best effort; the transfer already landed
    if let Err(e) = controller.disconnect_wallet().await {
        tracing::warn!(error = %e, "disconnect after demo failed");
    }

    Ok(())
}

/// Print the toast the step left behind and turn a failure into an exit.
fn report_step<T, E>(controller: &TransferController, outcome: Result<T, E>) -> Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let message = controller
        .toasts()
        .latest()
        .map(|toast| toast.message.clone())
        .unwrap_or_default();

    match outcome {
        Ok(value) => {
            println!("{} {}", "✓".green().bold(), message);
            Ok(value)
        }
        Err(e) => {
            println!("{} {}", "✗".red().bold(), message);
            Err(e.into())
        }
    }
}

fn cmd_config(
    config: &mut AppConfig,
    wallet: Option<String>,
    rpc_url: Option<String>,
    trust_wallet: Option<bool>,
    show: bool,
) -> Result<()> {
    let changed = wallet.is_some() || rpc_url.is_some() || trust_wallet.is_some();

    if let Some(path) = wallet {
        if !Path::new(&path).exists() {
            bail!("Wallet keypair file not found: {}", path);
        }
        config.wallet_path = Some(path);
    }
    if let Some(url) = rpc_url {
        config.rpc_url = Some(url);
    }
    if let Some(trusted) = trust_wallet {
        config.trust_wallet = trusted;
    }

    if changed {
        config.save()?;
        println!("{} Configuration saved to:", "✓".green().bold());
        println!("  {}", AppConfig::config_path()?.display().to_string().dimmed());
        println!();
    }

    if show || changed {
        println!("{}", "Current Configuration:".bold());
        println!();
        println!("{} {}", "Config file: ".bold(), AppConfig::config_path()?.display().to_string().dimmed());
        println!("{} {}", "RPC URL:     ".bold(), config.resolve_rpc_url(None).yellow());
        println!(
            "{} {}",
            "Wallet:      ".bold(),
            config
                .wallet_path
                .as_deref()
                .unwrap_or("~/.config/solana/id.json (default)")
                .yellow()
        );
        println!("{} {}", "Trust wallet:".bold(), config.trust_wallet.to_string().yellow());
    } else {
        println!("{}", "Usage:".bold());
        println!("  devnet-handoff config --wallet <PATH>        # Set default wallet");
        println!("  devnet-handoff config --rpc-url <URL>        # Set default RPC endpoint");
        println!("  devnet-handoff config --trust-wallet true    # Reconnect at startup");
        println!("  devnet-handoff config --show                 # Show current config");
    }

    Ok(())
}
