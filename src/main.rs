use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dsmscope::analysis::Analyzer;
use dsmscope::export::{self, ExportFormat};
use dsmscope::matrix::{DependencyMatrix, MatrixOrdering};
use dsmscope::parser;

#[derive(Parser)]
#[command(name = "dsmscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version = "0.1.0")]
#[command(about = "Dependency Structure Matrix viewer for dependency graphs", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dependency matrix of a graph description
    Matrix {
        /// Graph description file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Row ordering: instability or natural
        #[arg(short, long, default_value = "instability")]
        ordering: MatrixOrdering,

        /// Output format: text, json, csv or markdown
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,
    },
    /// List the dependency cycles of a graph description
    Cycles {
        /// Graph description file (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Show version information
    Version,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_matrix(input: &Path, ordering: MatrixOrdering) -> Result<DependencyMatrix> {
    let file = parser::parse_file(input)
        .with_context(|| format!("Failed to load graph from {}", input.display()))?;
    let graph = parser::build_graph(&file);
    let analysis = Analyzer::new()
        .with_rules(parser::rules(&file))
        .analyze(&graph);
    Ok(DependencyMatrix::new(graph, analysis, ordering))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::Matrix {
            input,
            ordering,
            format,
        }) => {
            let matrix = load_matrix(input, *ordering)?;
            export::export(*format, &matrix, &mut io::stdout().lock())
                .context("Failed to write matrix")?;
        }
        Some(Commands::Cycles { input }) => {
            let matrix = load_matrix(input, MatrixOrdering::default())?;
            let mut cycles: Vec<_> = matrix.dependency_cycles().iter().collect();
            cycles.sort();
            if cycles.is_empty() {
                println!("No dependency cycles found");
            }
            for cycle in cycles {
                println!("{}", cycle.cycle_path());
            }
        }
        Some(Commands::Version) => {
            println!("dsmscope v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("dsmscope - Dependency Structure Matrix viewer");
            println!("Run 'dsmscope matrix --input graph.json' to print a matrix");
            println!("Run 'dsmscope --help' for more information");
        }
    }

    Ok(())
}
