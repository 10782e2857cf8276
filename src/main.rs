use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use botnet_core_viz::{run_analyze, run_render, Config};

#[derive(Parser, Debug)]
#[clap(
    name = "botnet-core-viz",
    about = "Filter k-core annotated host graphs and render them as interactive HTML"
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Verbose logging
    #[clap(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter the node and edge tables and write the HTML graph
    Render(RenderArgs),

    /// Compute k-core values from a NetFlow capture and export the tables
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// JSON config file; flags below override its values
    #[clap(long)]
    config: Option<PathBuf>,

    /// Path to the node table
    #[clap(long)]
    nodes: Option<PathBuf>,

    /// Path to the edge table
    #[clap(long)]
    edges: Option<PathBuf>,

    /// Output HTML file
    #[clap(long)]
    output: Option<PathBuf>,

    /// Keep nodes with k_core strictly above this value
    #[clap(long)]
    threshold: Option<f64>,

    /// Keep nodes whose category contains this tag
    #[clap(long)]
    tag: Option<String>,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Path to the bidirectional NetFlow CSV
    #[clap(long)]
    input: PathBuf,

    /// Output directory for nodes.csv, edges.csv and core_summary.json
    #[clap(long, default_value = ".")]
    output_dir: PathBuf,

    /// Labels containing this tag take precedence for a host
    #[clap(long, default_value = "Botnet")]
    tag: String,

    /// Number of highest-core hosts to report
    #[clap(long, default_value = "20")]
    top: usize,
}

impl RenderArgs {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(nodes) = self.nodes {
            config.nodes_path = nodes;
        }
        if let Some(edges) = self.edges {
            config.edges_path = edges;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(tag) = self.tag {
            config.category_tag = tag;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    match args.command {
        Command::Render(render) => {
            let config = render.into_config()?;
            log::info!("Nodes: {}", config.nodes_path.display());
            log::info!("Edges: {}", config.edges_path.display());

            let summary = run_render(&config).context("rendering graph")?;
            log::info!(
                "Rendered {} nodes and {} edges to {}",
                summary.node_count,
                summary.edge_count,
                summary.path.display()
            );
        }
        Command::Analyze(analyze) => {
            log::info!("Input: {}", analyze.input.display());
            log::info!("Output: {}", analyze.output_dir.display());

            let (summary, paths) =
                run_analyze(&analyze.input, &analyze.output_dir, &analyze.tag, analyze.top)
                    .context("analyzing flows")?;
            log::info!(
                "Analysis complete: {} hosts, {} edges, max core {}. Tables saved to {} and {}",
                summary.node_count,
                summary.edge_count,
                summary.max_core,
                paths.nodes.display(),
                paths.edges.display()
            );
        }
    }

    Ok(())
}
