use anyhow::Context;
use clap::Parser;
use extractor::{ExtractorConfig, TravelExtractor};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "extract")]
#[command(about = "Extrai linhas de diárias de um texto administrativo", long_about = None)]
#[command(version)]
struct Cli {
    /// Text file to read; stdin when omitted
    file: Option<PathBuf>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL")]
    model: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("extract={},extractor={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let text = match &cli.file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };

    let mut config = ExtractorConfig::from_env()
        .context("Invalid extractor configuration")?
        .with_api_key(cli.api_key);
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }

    let extractor = TravelExtractor::gemini(config).context("Failed to create HTTP client")?;

    match extractor.extract(&text).await {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
