/// Lull - sleep-playlist calmness analyzer
use anyhow::Context;
use clap::{Parser, Subcommand};
use lull_analysis::AnalysisWorker;
use lull_cli::{config::LullConfig, decode, report, simulate};
use lull_core::{ChannelSelection, ProcessingPreset};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lull")]
#[command(about = "Score audio for calmness and tune adaptive noise masking", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./lull.toml if present)
    #[arg(short, long, global = true, env = "LULL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an audio file
    Analyze {
        /// Audio file to analyze
        file: PathBuf,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
        /// Number of non-calm sections to show
        #[arg(long)]
        top: Option<usize>,
        /// Average all channels instead of using the first
        #[arg(long)]
        mix: bool,
    },
    /// Run the masking controller over a synthetic loudness ramp
    Simulate {
        /// Starting level in dB
        #[arg(long, allow_hyphen_values = true, default_value_t = -30.0)]
        from: f32,
        /// Final level in dB
        #[arg(long, allow_hyphen_values = true, default_value_t = -55.0)]
        to: f32,
        /// Number of ticks
        #[arg(long, default_value_t = 10)]
        ticks: usize,
        /// Noise volume in percent
        #[arg(long)]
        volume: Option<f32>,
        /// Print ticks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show processing preset parameters
    Presets {
        /// Preset name (gentle, moderate, aggressive, custom)
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lull=info,lull_analysis=info,lull_masking=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = LullConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Analyze {
            file,
            json,
            top,
            mix,
        } => {
            analyze(&config, &file, json, top, mix).await?;
        }
        Commands::Simulate {
            from,
            to,
            ticks,
            volume,
            json,
        } => {
            run_simulation(&config, from, to, ticks, volume, json)?;
        }
        Commands::Presets { name } => {
            let preset = name
                .map(|n| n.parse::<ProcessingPreset>())
                .transpose()?;
            print!("{}", report::render_presets(preset));
        }
    }

    Ok(())
}

async fn analyze(
    config: &LullConfig,
    file: &Path,
    json: bool,
    top: Option<usize>,
    mix: bool,
) -> anyhow::Result<()> {
    let channel = if mix {
        ChannelSelection::Mix
    } else {
        config.analysis.channel
    };

    tracing::info!("Decoding {}", file.display());
    let path = file.to_path_buf();
    let audio = tokio::task::spawn_blocking(move || decode::decode_file(&path))
        .await
        .context("decoder task failed")??;
    let buffer = audio.into_sample_buffer(channel)?;

    let mut worker = AnalysisWorker::current()?;
    let result = worker
        .submit(buffer)
        .wait()
        .await
        .with_context(|| format!("analysis of {} failed", file.display()))?;

    let name = file.display().to_string();
    if json {
        println!("{}", report::render_json(&name, &result)?);
    } else {
        let top = top.unwrap_or(config.analysis.report_sections);
        print!("{}", report::render_text(&name, &result, top));
    }

    Ok(())
}

fn run_simulation(
    config: &LullConfig,
    from: f32,
    to: f32,
    ticks: usize,
    volume: Option<f32>,
    json: bool,
) -> anyhow::Result<()> {
    let mut settings = config.masking;
    if let Some(volume) = volume {
        settings.volume = volume;
    }

    let ticks = simulate::simulate_ramp(settings, from, to, ticks)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&ticks)?);
    } else {
        print!("{}", simulate::render_ticks(&ticks, &settings));
    }

    Ok(())
}
