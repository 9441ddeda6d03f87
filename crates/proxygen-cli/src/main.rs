//! Proxygen command-line tool
//!
//! Generates boundary-safe proxy classes from a JSON type catalog and
//! optionally compiles them.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "proxygen")]
#[command(about = "Boundary-safe proxy generator for interface-based host APIs", long_about = None)]
#[command(version)]
struct Cli {
    /// When to use colors: auto, always, never
    #[arg(long, global = true, value_name = "WHEN")]
    color: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate proxy source files
    Generate {
        /// Type catalog (JSON)
        catalog: PathBuf,
        /// Interfaces to wrap, by full or simple name (default: all)
        #[arg(short, long = "interface", value_name = "NAME")]
        interfaces: Vec<String>,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Host profile (default: ./proxygen.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print source to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
    },

    /// Compile one proxy
    Compile {
        /// Type catalog (JSON)
        catalog: PathBuf,
        /// Interface to wrap
        #[arg(short, long = "interface", value_name = "NAME")]
        interface: String,
        /// Assembly references
        #[arg(short, long = "reference", value_name = "REF")]
        references: Vec<String>,
        /// Compiler executable
        #[arg(long, default_value = "csc")]
        compiler: String,
        /// Output image (default: <Class>.dll)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Run the built-in checks only
        #[arg(long)]
        check_only: bool,
        /// Host profile (default: ./proxygen.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List registries discovered from the catalog's host root
    Registries {
        /// Type catalog (JSON)
        catalog: PathBuf,
        /// Host profile (default: ./proxygen.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default host profile
    InitConfig {
        /// Destination
        #[arg(default_value = "proxygen.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let color = output::resolve_color_choice(cli.color.as_deref());

    match cli.command {
        Commands::Generate {
            catalog,
            interfaces,
            out_dir,
            config,
            stdout,
        } => commands::generate::execute(
            &catalog,
            &interfaces,
            &out_dir,
            config.as_deref(),
            stdout,
            color,
        ),

        Commands::Compile {
            catalog,
            interface,
            references,
            compiler,
            out,
            check_only,
            config,
        } => commands::compile::execute(
            commands::compile::CompileOptions {
                catalog,
                interface,
                references,
                compiler,
                out,
                check_only,
                config,
            },
            color,
        ),

        Commands::Registries {
            catalog,
            config,
            json,
        } => commands::registries::execute(&catalog, config.as_deref(), json, color),

        Commands::InitConfig { path, force } => commands::init_config::execute(&path, force, color),
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default = match verbose {
        0 => "warn",
        1 => "proxygen_engine=debug,info",
        _ => "proxygen_engine=trace,debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
