use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use llm::{LLMClient, ModelCatalog, OllamaClient};
use promptgen::config::parse_secs;
use promptgen::{
    apply_style, declare_inputs, init_logging, Emphasis, GenerateRequest, Position,
    PromptGenerator, Settings, StyleLibrary, OUTPUT_NAME,
};

#[derive(Parser)]
#[command(author, version, about = "Expand short descriptions into detailed image prompts")]
struct Cli {
    /// Base URL of the Ollama server [env: OLLAMA_URL]
    #[arg(long, global = true)]
    ollama_url: Option<String>,
    /// YAML file with style templates [env: PROMPTGEN_TEMPLATES]
    #[arg(long, global = true)]
    templates: Option<PathBuf>,
    /// Seconds to wait for each streamed chunk [env: PROMPTGEN_CHUNK_TIMEOUT]
    #[arg(long, global = true, value_parser = secs_arg)]
    chunk_timeout: Option<Duration>,
    /// Seconds allowed for the whole generation [env: PROMPTGEN_TOTAL_TIMEOUT]
    #[arg(long, global = true, value_parser = secs_arg)]
    total_timeout: Option<Duration>,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a detailed prompt with the language model
    Generate(GenerateArgs),
    /// List available models, fine-tuned ones first
    Models,
    /// List style templates
    Styles,
    /// Append keyword presets to a prompt without calling the model
    ApplyStyle(ApplyStyleArgs),
    /// Print the effective settings and declared inputs as JSON
    Describe,
}

#[derive(Args)]
struct GenerateArgs {
    /// Brief description of the image
    description: String,
    #[arg(long, default_value = promptgen::styles::DEFAULT_STYLE)]
    style: String,
    /// Aspect to focus on, e.g. lighting
    #[arg(long)]
    emphasis: Option<String>,
    /// Mood or atmosphere
    #[arg(long)]
    mood: Option<String>,
    #[arg(long, default_value_t = promptgen::generator::DEFAULT_TEMPERATURE)]
    temperature: f32,
    #[arg(long, default_value_t = promptgen::generator::DEFAULT_TOP_P)]
    top_p: f32,
    /// Model name; defaults to OLLAMA_MODEL or the first listed model
    #[arg(long)]
    model: Option<String>,
    /// Keep the model's reasoning in the output
    #[arg(long)]
    include_reasoning: bool,
}

#[derive(Args)]
struct ApplyStyleArgs {
    /// Base prompt
    #[arg(default_value = "")]
    prompt: String,
    #[arg(long, default_value = "cinematic")]
    style: String,
    #[arg(long, value_enum, default_value_t = Position::Suffix)]
    position: Position,
    #[arg(long, value_enum, default_value_t = Emphasis::Medium)]
    emphasis: Emphasis,
    /// Leave out camera and lens keywords
    #[arg(long)]
    no_technical: bool,
    /// Print both outputs as JSON
    #[arg(long)]
    json: bool,
}

fn secs_arg(value: &str) -> Result<Duration, String> {
    parse_secs(value).ok_or_else(|| format!("expected a positive number of seconds, got '{value}'"))
}

impl Cli {
    fn settings(&self) -> Settings {
        let mut settings = Settings::from_env();
        if let Some(url) = &self.ollama_url {
            settings.ollama_url = url.clone();
        }
        if let Some(path) = &self.templates {
            settings.templates_path = path.clone();
        }
        if let Some(d) = self.chunk_timeout {
            settings.chunk_timeout = d;
        }
        if let Some(d) = self.total_timeout {
            settings.total_timeout = d;
        }
        settings
    }
}

/// Model listing shares the per-chunk deadline so a silent server cannot
/// stall startup.
fn catalog(client: Arc<dyn LLMClient>, settings: &Settings) -> ModelCatalog {
    ModelCatalog::new(client, settings.cache_ttl).with_list_timeout(settings.chunk_timeout)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let settings = cli.settings();

    match cli.command {
        Command::ApplyStyle(args) => {
            let out = apply_style(
                &args.prompt,
                &args.style,
                args.position,
                args.emphasis,
                !args.no_technical,
            );
            if args.json {
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", out.styled_prompt);
            }
        }
        Command::Styles => {
            let styles = StyleLibrary::load(&settings.templates_path);
            for (key, style) in styles.iter() {
                println!("{key:<16} {}", style.description);
            }
        }
        Command::Models => {
            let client: Arc<dyn LLMClient> = Arc::new(OllamaClient::new(&settings.ollama_url)?);
            for model in catalog(client, &settings).models().await {
                println!("{model}");
            }
        }
        Command::Describe => {
            let client: Arc<dyn LLMClient> = Arc::new(OllamaClient::new(&settings.ollama_url)?);
            let styles = StyleLibrary::load(&settings.templates_path);
            let models = catalog(client, &settings).models().await;
            let description = serde_json::json!({
                "settings": settings,
                "inputs": declare_inputs(&styles, &models),
                "outputs": [{ "name": OUTPUT_NAME, "type": "string" }],
            });
            println!("{}", serde_json::to_string_pretty(&description)?);
        }
        Command::Generate(args) => {
            let client: Arc<dyn LLMClient> = Arc::new(OllamaClient::new(&settings.ollama_url)?);
            let model = match args.model.or_else(|| settings.model.clone()) {
                Some(m) => m,
                None => catalog(client.clone(), &settings).default_model().await,
            };
            let styles = StyleLibrary::load(&settings.templates_path);
            let generator = PromptGenerator::new(client, styles, settings.timeout_policy());

            let mut req = GenerateRequest::new(args.description)
                .style(args.style)
                .temperature(args.temperature)
                .top_p(args.top_p)
                .include_reasoning(args.include_reasoning)
                .model(model);
            req.emphasis = args.emphasis;
            req.mood = args.mood;

            match generator.try_generate(&req).await {
                Ok(prompt) => println!("{prompt}"),
                Err(e) => {
                    println!("{e}");
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}
