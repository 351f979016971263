use anyhow::{Context, Result};
use apigw_monitoring::config::{ConfigLoader, LogFormat};
use apigw_monitoring::logging::init_logging;
use apigw_monitoring::monitoring::{ApiGatewayMonitoring, MonitoringTemplate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Synthesize CloudWatch alarms and a dashboard for an API Gateway stage"
)]
struct Cli {
    /// Log level or filter directive (overrides the config file)
    #[arg(long, global = true, env = "APIGW_MONITORING_LOG")]
    log_level: Option<String>,

    /// Log output format (overrides the config file)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the monitoring resources as a template
    Synth {
        /// Configuration file (TOML, YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load the configuration and check every alarm declaration
    Validate {
        /// Configuration file (TOML, YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Compact => LogFormat::Compact,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("❌ {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match &cli.command {
        Command::Synth { config, .. } | Command::Validate { config } => config.clone(),
    };

    let mut config = ConfigLoader::new()
        .load_from_file(Some(&config_path))
        .load_from_env()
        .build()
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format.into();
    }
    init_logging(&config.logging)?;

    info!("🚀 apigw-monitoring v{}", env!("CARGO_PKG_VERSION"));
    info!("📂 設定ファイル: {}", config_path.display());

    let monitoring = ApiGatewayMonitoring::new(config);

    match cli.command {
        Command::Validate { .. } => {
            let planned = monitoring.plan()?;
            info!("✅ {} alarms valid", planned.len());
            for alarm in &planned {
                println!("{}", alarm.logical_id);
            }
        }
        Command::Synth { format, output, .. } => {
            let mut template = MonitoringTemplate::new();
            let summary = monitoring.build(&mut template)?;

            let rendered = match format {
                OutputFormat::Json => template.to_json()?,
                OutputFormat::Yaml => template.to_yaml()?,
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(
                        "📄 {} alarms written to {}",
                        summary.total_alarms(),
                        path.display()
                    );
                }
                None => println!("{rendered}"),
            }
        }
    }

    Ok(())
}
