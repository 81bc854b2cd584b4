use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use truthline::pipeline::{DuckDuckGoBackend, OpenAiModel, Pipeline};
use truthline::Settings;

#[derive(Parser)]
#[command(name = "truthline", version, about = "Assess free text for misinformation")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze text given as an argument, or read from stdin
    Analyze {
        text: Option<String>,

        /// Model to use instead of OPENAI_MODEL
        #[arg(long)]
        model: Option<String>,

        /// Also print the unparsed document-level model output
        #[arg(long)]
        raw: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::from_env()?;

    match cli.command {
        Command::Analyze { text, model, raw } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read text from stdin")?;
                    buf
                }
            };

            let api_key = settings.require_api_key()?;
            let model_name = model.unwrap_or_else(|| settings.model.clone());
            let model = Arc::new(OpenAiModel::new(
                api_key,
                &model_name,
                settings.api_base.as_deref(),
                settings.llm_timeout,
            ));
            let backend = Arc::new(DuckDuckGoBackend::new(settings.search_timeout)?);
            let pipeline =
                Pipeline::new(model, backend).with_verify_concurrency(settings.verify_concurrency);

            let report = pipeline.run_report(&text).await?;
            if raw {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&report.analysis)?);
            }
        }
    }

    Ok(())
}
