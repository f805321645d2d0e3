use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use soc_incident_engine::{
    config::Config,
    enrichment::ThreatIntelCatalog,
    ingestion::AlertNormalizer,
    metrics::{gather_metrics, init_metrics},
    processing::{render_report, TriagePipeline},
    response::all_actions,
    severity::SeverityPolicy,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "soc-incident-engine")]
#[command(version, about = "Correlate classified security alerts into incidents and recommend responses", long_about = None)]
struct Cli {
    /// Configuration file layered over the built-in defaults
    #[arg(short, long, global = true, env = "SOC_ENGINE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Report,
}

#[derive(Subcommand)]
enum Commands {
    /// Correlate an alert batch and print incidents with recommended actions
    Analyze {
        /// JSON array of classified alerts
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_enum, default_value = "report")]
        format: OutputFormat,

        /// Print Prometheus metrics after the analysis
        #[arg(long)]
        metrics: bool,
    },

    /// List the response action table
    Actions,

    /// Show threat intelligence for a label
    Intel {
        #[arg(value_name = "LABEL")]
        label: String,
    },

    /// Print the effective configuration
    Config,
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("soc_incident_engine={}", config.observability.log_level).into());

    // Logs go to stderr so stdout stays machine-readable
    if config.observability.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config);

    match cli.command {
        Commands::Analyze {
            input,
            format,
            metrics,
        } => {
            if config.observability.metrics_enabled {
                if let Err(e) = init_metrics() {
                    tracing::warn!("Failed to initialize metrics: {}", e);
                }
            }

            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read alerts from {}", input.display()))?;

            let normalizer = AlertNormalizer::new(SeverityPolicy::from_config(&config.severity));
            let ingested = normalizer
                .parse_json(&raw)
                .context("Alert file is not a JSON array")?;
            if !ingested.rejected.is_empty() {
                tracing::warn!(
                    rejected = ingested.rejected.len(),
                    "Some alerts were rejected at ingestion"
                );
            }

            let pipeline = TriagePipeline::from_config(&config).context("Failed to build pipeline")?;
            let report = pipeline
                .analyze(&ingested.alerts)
                .await
                .context("Correlation failed")?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Report => print!("{}", render_report(&report)),
            }

            if metrics && config.observability.metrics_enabled {
                println!("{}", gather_metrics());
            }
        }

        Commands::Actions => {
            println!("{:<16} {:<9} {:<15} {:<60} Tools", "Action", "Priority", "Automation", "Description");
            println!("{}", "-".repeat(120));
            for action in all_actions() {
                println!(
                    "{:<16} {:<9} {:<15} {:<60} {}",
                    action.name,
                    action.priority,
                    action.automation.to_string(),
                    action.description,
                    action.tools.join(", ")
                );
            }
        }

        Commands::Intel { label } => {
            let intel = ThreatIntelCatalog::builtin().lookup(&label.trim().to_lowercase());
            println!("{}", serde_json::to_string_pretty(&intel)?);
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
