//! symdex command line
//!
//! Builds the cross-module symbol index of a corpus of module trees and
//! inspects it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod ambiguities;
mod build;
mod lookup;
mod session;
mod stats;

#[derive(Parser)]
#[command(name = "symdex")]
#[command(about = "Cross-module symbol index builder", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug details
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a corpus and write the payload files
    Build {
        /// Directory holding one module tree per file
        ast_dir: PathBuf,

        /// Directory receiving the payload files
        out_dir: PathBuf,

        /// Package grouping file (TOML)
        #[arg(long)]
        packages: Option<PathBuf>,

        /// Configuration file (defaults to symdex.toml in the AST directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Distinct consumers a target needs to be listed
        #[arg(long)]
        min_consumers: Option<usize>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print usage statistics without writing anything
    Stats {
        /// Directory holding one module tree per file
        ast_dir: PathBuf,

        /// Package grouping file (TOML)
        #[arg(long)]
        packages: Option<PathBuf>,

        /// Configuration file (defaults to symdex.toml in the AST directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Distinct consumers a target needs to be listed
        #[arg(long)]
        min_consumers: Option<usize>,

        /// Longest list printed
        #[arg(long)]
        limit: Option<usize>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List symbols exported by more than one module
    Ambiguities {
        /// Directory holding one module tree per file
        ast_dir: PathBuf,

        /// Configuration file (defaults to symdex.toml in the AST directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show the owners of a symbol, or its origin inside one module
    Lookup {
        /// Directory holding one module tree per file
        ast_dir: PathBuf,

        /// Symbol name (any case)
        symbol: String,

        /// Module whose view of the symbol is wanted
        #[arg(long)]
        module: Option<String>,

        /// Configuration file (defaults to symdex.toml in the AST directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Build {
            ast_dir,
            out_dir,
            packages,
            config,
            min_consumers,
            format,
        } => {
            let session = session::Session::open(&ast_dir, config.as_deref(), packages.as_deref())?
                .with_min_consumers(min_consumers);
            build::run_build(&session, &out_dir, &format)?;
        }
        Commands::Stats {
            ast_dir,
            packages,
            config,
            min_consumers,
            limit,
            format,
        } => {
            let session = session::Session::open(&ast_dir, config.as_deref(), packages.as_deref())?
                .with_min_consumers(min_consumers)
                .with_limit(limit);
            stats::print_stats(&session, &format)?;
        }
        Commands::Ambiguities {
            ast_dir,
            config,
            format,
        } => {
            let session = session::Session::open(&ast_dir, config.as_deref(), None)?;
            ambiguities::print_ambiguities(&session, &format)?;
        }
        Commands::Lookup {
            ast_dir,
            symbol,
            module,
            config,
        } => {
            let session = session::Session::open(&ast_dir, config.as_deref(), None)?;
            lookup::lookup_symbol(&session, &symbol, module.as_deref())?;
        }
    }

    Ok(())
}
