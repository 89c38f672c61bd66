use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use emacs_mac_builder::config::{self, BuilderConfig, Overrides};
use emacs_mac_builder::receipt;
use emacs_mac_builder::{install, plan, EmacsMac, Formula, InstallOptions, SystemRunner};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "emacs-mac-builder")]
#[command(about = "Build and install the Emacs Mac port from a source checkout", long_about = None)]
struct Cli {
    /// Config file (default: <config_dir>/emacs-mac-builder/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Installation prefix
    #[arg(long, global = true)]
    prefix: Option<PathBuf>,

    /// Host-wide shared prefix (overrides HOMEBREW_PREFIX)
    #[arg(long, global = true)]
    homebrew_prefix: Option<PathBuf>,

    /// Info documentation base directory
    #[arg(long, global = true)]
    info_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the configure arguments, one per line
    Args,

    /// Configure, build and install from a source checkout
    Install {
        /// Source checkout containing ./configure
        #[arg(long)]
        source_dir: Option<PathBuf>,

        /// Print the stage commands instead of running them
        #[arg(long)]
        dry_run: bool,

        /// Skip host tool and source tree checks
        #[arg(long)]
        skip_preflight: bool,

        /// Parallel make jobs (passed as MAKEFLAGS=-jN)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Print post-install notes
    Caveats,

    /// Print formula metadata as JSON
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let formula = EmacsMac;
    let mut overrides = Overrides {
        homebrew_prefix: cli.homebrew_prefix,
        prefix: cli.prefix,
        info_dir: cli.info_dir,
        ..Default::default()
    };
    if let Commands::Install {
        source_dir, jobs, ..
    } = &cli.command
    {
        overrides.source_dir = source_dir.clone();
        overrides.jobs = *jobs;
    }

    let file = config::load_config_file(cli.config.as_deref())?;
    let cfg = config::resolve(
        formula.name(),
        file,
        config::homebrew_prefix_from_env(),
        overrides,
    )?;

    match cli.command {
        Commands::Args => {
            for arg in formula.configure_args(&cfg.env) {
                println!("{arg}");
            }
            Ok(())
        }
        Commands::Install {
            dry_run,
            skip_preflight,
            ..
        } => run_install(&formula, &cfg, dry_run, skip_preflight),
        Commands::Caveats => {
            print!("{}", formula.caveats(&cfg.env));
            Ok(())
        }
        Commands::Info => print_info(&formula, &cfg),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_install(
    formula: &dyn Formula,
    cfg: &BuilderConfig,
    dry_run: bool,
    skip_preflight: bool,
) -> Result<()> {
    let cwd = std::env::current_dir().context("resolving current directory")?;
    let source_dir = config::resolve_source_dir(cfg.source_dir.as_deref(), &cwd)?;
    let tag = formula.name();

    if dry_run {
        println!("[{tag}] dry run in {}", source_dir.display());
        for cmd in plan(formula, &cfg.env) {
            println!("[{tag}:{}] {}", cmd.stage, cmd.command_line());
        }
        return Ok(());
    }

    println!(
        "[{tag}] installing to {} from {}",
        cfg.env.prefix,
        source_dir.display()
    );

    let mut runner = SystemRunner::new().with_jobs(cfg.jobs);
    let receipt = install(
        &mut runner,
        formula,
        &cfg.env,
        &source_dir,
        InstallOptions { skip_preflight },
    )?;

    println!(
        "[{tag}] installed at {} ({})",
        receipt.prefix.display(),
        receipt.installed_at_utc
    );
    print!("{}", formula.caveats(&cfg.env));
    Ok(())
}

fn print_info(formula: &dyn Formula, cfg: &BuilderConfig) -> Result<()> {
    let legacy = formula.legacy_source().map(|source| {
        serde_json::json!({
            "url": source.url,
            "md5": source.md5,
        })
    });
    let receipt = receipt::find_receipt(cfg.env.prefix_path())?;
    let info = serde_json::json!({
        "name": formula.name(),
        "homepage": formula.homepage(),
        "head": formula.head(),
        "legacy_source": legacy,
        "prefix": cfg.env.prefix,
        "homebrew_prefix": cfg.env.shared_prefix,
        "info_dir": cfg.env.info_dir,
        "source_dir": cfg.source_dir,
        "configure_args": formula.configure_args(&cfg.env),
        "installed": receipt,
    });
    let text = serde_json::to_string_pretty(&info).context("serializing formula info")?;
    println!("{text}");
    Ok(())
}
