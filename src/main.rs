//! archdesk - Main entry point

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{debug, error, info, warn};

use archdesk::cli::{is_affirmative, Cli, Commands};
use archdesk::config_file::ResolverConfig;
use archdesk::context::RunContext;
use archdesk::installer::Installer;
use archdesk::logic::classify::classify;
use archdesk::logic::provision::{run_provision, total_steps};
use archdesk::logic::report::RunReport;
use archdesk::logic::resolver::Resolver;
use archdesk::logic::retry::{RetryPolicy, ThreadSleeper};
use archdesk::package_manager::{DryRunBackend, PackageBackend, SystemBackend};
use archdesk::platform::PlatformInfo;
use archdesk::process_guard::{self, ProcessGuard};
use archdesk::types::CategoryRequest;
use archdesk::{logging, sanity};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let command = cli.command();

    // only a provisioning run gets a log file
    let log_dir = matches!(command, Commands::Run).then_some(cli.log_dir.as_path());
    logging::init(log_dir);
    debug!("CLI arguments parsed: {:?}", cli);

    match command {
        Commands::Validate { config } => run_validate(&config),
        Commands::Classify { names } => {
            for name in &names {
                println!("{}\t{}", name, classify(name));
            }
            Ok(())
        }
        Commands::Plan => {
            let config = load_config(&cli)?;
            print_plan(&config);
            Ok(())
        }
        Commands::Run => run(&cli),
    }
}

/// Load the config named on the command line, or the built-in one.
fn load_config(cli: &Cli) -> Result<ResolverConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from: {:?}", path);
            let config = ResolverConfig::load_from_file(path)?;
            config
                .validate()
                .with_context(|| format!("Invalid configuration in {:?}", path))?;
            config
        }
        None => ResolverConfig::default(),
    };

    if let Some(helper) = cli.helper {
        config.aur_helper = helper;
    }
    Ok(config)
}

fn run_validate(path: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", path);
    let config = match ResolverConfig::load_from_file(path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration file: {:#}", e);
            eprintln!("✗ Failed to load configuration file: {:#}", e);
            std::process::exit(1);
        }
    };

    match config.validate() {
        Ok(()) => {
            let candidates: usize = config.categories.iter().map(|c| c.candidates.len()).sum();
            println!(
                "✓ Configuration file is valid: {} categories, {} candidates",
                config.categories.len(),
                candidates
            );
            Ok(())
        }
        Err(e) => {
            error!("Configuration validation failed: {}", e);
            eprintln!("✗ Configuration validation failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_plan(config: &ResolverConfig) {
    let policy = config.retry_policy();
    println!(
        "AUR helper: {}  |  attempts: {}  |  backoff: {}",
        config.aur_helper,
        policy.attempts(),
        policy.strategy
    );
    for request in config.requests() {
        println!("{}", request.category);
        if request.candidates.is_empty() {
            println!("  (no candidates)");
        }
        for (i, candidate) in request.candidates.iter().enumerate() {
            println!("  {}. {}", i + 1, candidate);
        }
    }
}

/// Ask `question` on the terminal. EOF counts as no.
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(is_affirmative(&answer))
}

fn run(cli: &Cli) -> Result<()> {
    info!("archdesk starting up");

    // Terminates running pacman/helper processes on SIGINT/SIGTERM/SIGHUP
    if let Err(e) = process_guard::init_signal_handlers() {
        warn!("Failed to initialize signal handlers: {}", e);
    }
    let _guard = ProcessGuard::new();

    let config = load_config(cli)?;
    let env = sanity::run_preflight_checks();
    let platform = PlatformInfo::detect(env.is_root);
    let requests = config.requests();

    if !cli.yes && !cli.dry_run {
        let question = format!("Provision {} categories?", requests.len());
        if !confirm(&question)? {
            println!("Aborted, nothing was installed.");
            return Ok(());
        }
    }

    let backend = SystemBackend::new(config.aur_helper, env.is_root);
    let report = if cli.dry_run {
        provision(
            DryRunBackend::new(backend),
            RetryPolicy::immediate(),
            platform,
            &requests,
            true,
        )
    } else {
        provision(backend, config.retry_policy(), platform, &requests, false)
    };

    println!("{}", report.summary());
    Ok(())
}

fn provision<B: PackageBackend>(
    backend: B,
    policy: RetryPolicy,
    platform: PlatformInfo,
    requests: &[CategoryRequest],
    dry_run: bool,
) -> RunReport {
    let mut ctx = RunContext::new(platform, total_steps(requests), dry_run);
    let mut resolver = Resolver::new(Installer::new(backend, ThreadSleeper, policy));
    run_provision(&mut ctx, &mut resolver, requests)
}
