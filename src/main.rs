use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use clinscribe::{
    AgentState, GatewayConfig, ModelGateway, StepInfo, process_and_evaluate_detailed,
    read_transcript, render_comparison, render_sequential, render_state, run_multi_agent,
    run_sequential_pipeline, write_json,
};

#[derive(Parser)]
#[command(name = "clinscribe")]
#[command(author, version, about = "Healthcare call documentation pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Run both pipelines and evaluate the two notes against each other.
    Compare,
    /// Run only the multi-agent pipeline.
    Multi,
    /// Run only the sequential baseline pipeline.
    Sequential,
}

#[derive(clap::Args, Debug, Clone)]
struct ProviderArgs {
    /// Provider protocol (ollama or openai); defaults to the environment.
    #[arg(long)]
    provider: Option<String>,

    /// Base URL of the provider endpoint.
    #[arg(long)]
    base_url: Option<String>,

    /// Model identifier.
    #[arg(long)]
    model: Option<String>,

    /// Bearer credential for the hosted provider.
    #[arg(long)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a call transcript into structured documentation
    Process {
        /// Input transcript file (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the machine-readable result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for the human-readable report (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Which pipeline(s) to run
        #[arg(long, value_enum, default_value_t = Mode::Compare)]
        mode: Mode,

        #[command(flatten)]
        provider: ProviderArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check provider availability and model readiness
    Probe {
        #[command(flatten)]
        provider: ProviderArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            human_readable,
            mode,
            provider,
            verbose,
        } => {
            setup_logging(verbose);
            process_call(input, output, human_readable, mode, provider).await
        }
        Commands::Probe { provider, verbose } => {
            setup_logging(verbose);
            probe(provider).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Start from the environment config and apply CLI overrides.
fn resolve_config(args: &ProviderArgs) -> Result<GatewayConfig> {
    let mut config = GatewayConfig::from_env()?;
    if let Some(provider) = &args.provider {
        let provider = provider.parse::<clinscribe::Provider>()?;
        // Switching provider moves to its default endpoint unless one was
        // given explicitly.
        if args.base_url.is_none() && std::env::var("CLINSCRIBE_BASE_URL").is_err() {
            config.base_url = provider.default_base_url().to_string();
        }
        config.provider = provider;
    }
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(api_key) = &args.api_key {
        config.api_key = Some(api_key.clone());
    }
    if config.provider == clinscribe::Provider::OpenAi && config.api_key.is_none() {
        anyhow::bail!("The openai provider requires an API key (--api-key or CLINSCRIBE_API_KEY)");
    }
    Ok(config)
}

async fn process_call(
    input: PathBuf,
    output: Option<PathBuf>,
    human_readable: Option<PathBuf>,
    mode: Mode,
    provider: ProviderArgs,
) -> Result<()> {
    let config = resolve_config(&provider)?;
    info!(
        provider = config.provider.as_str(),
        model = %config.model,
        "loading transcript from {:?}",
        input
    );
    let transcript = read_transcript(&input).context("Failed to load input transcript")?;
    let gateway = ModelGateway::new(config);

    let log_progress = |_state: &AgentState, step: &StepInfo| {
        info!(
            "[{}/{}] {} done{}",
            step.step,
            step.total,
            step.agent,
            step.output_summary
                .as_deref()
                .map(|s| format!(": {s}"))
                .unwrap_or_default()
        );
    };

    let (report, json): (String, serde_json::Value) = match mode {
        Mode::Compare => {
            let run =
                process_and_evaluate_detailed(&gateway, &transcript, Some(&log_progress)).await?;
            (render_comparison(&run), serde_json::to_value(&run)?)
        }
        Mode::Multi => {
            let state = run_multi_agent(&gateway, &transcript, Some(&log_progress)).await?;
            (render_state(&state), serde_json::to_value(&state)?)
        }
        Mode::Sequential => {
            let result = run_sequential_pipeline(&gateway, &transcript).await?;
            (render_sequential(&result), serde_json::to_value(&result)?)
        }
    };

    if let Some(path) = &output {
        write_json(&json, path)?;
        info!("Machine-readable result written to {:?}", path);
    }
    if let Some(path) = &human_readable {
        std::fs::write(path, &report)
            .with_context(|| format!("Failed to write report: {:?}", path))?;
        info!("Report written to {:?}", path);
    }
    if output.is_none() && human_readable.is_none() {
        println!("{report}");
    }

    Ok(())
}

async fn probe(provider: ProviderArgs) -> Result<()> {
    let config = resolve_config(&provider)?;
    let model = config.model.clone();
    let gateway = ModelGateway::new(config);

    println!("Provider Status");
    println!("===============");
    println!("Provider: {}", gateway.config().provider.as_str());
    println!("Endpoint: {}", gateway.config().base_url);

    let available = gateway.check_availability().await;
    println!(
        "Availability: {}",
        if available { "reachable" } else { "unreachable" }
    );

    if available {
        let ready = gateway.check_model_ready(&model).await;
        println!(
            "Model '{}': {}",
            model,
            if ready { "ready" } else { "not responding" }
        );
    }

    Ok(())
}
