use std::env;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use breedrag_core::config::Config;
use breedrag_core::query::validate_question;
use breedrag_corpus::{source_from_config, BreedCatalog};
use breedrag_embed::VocabularyEmbedder;
use breedrag_index::DocumentIndex;
use breedrag_llm::GenerationClient;
use breedrag_rag::RagOrchestrator;

const USAGE: &str = "Usage: breedrag <query|stats|corpus|breeds|images|random> [args...]";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { eprintln!("{USAGE}"); std::process::exit(1); }
    let cmd = args.remove(0);
    (cmd, args)
}

fn orchestrator(config: &Config) -> anyhow::Result<RagOrchestrator> {
    let app = config.app()?;
    let embedder = Arc::new(VocabularyEmbedder::from_config(&app.embedding));
    let index = DocumentIndex::new(embedder).with_source(source_from_config(config)?);
    let generator = GenerationClient::from_app_config(&app)?;
    Ok(RagOrchestrator::new(Arc::new(index), Arc::new(generator), app.rag))
}

fn catalog(config: &Config) -> anyhow::Result<BreedCatalog> {
    Ok(BreedCatalog::new(config.app()?.corpus.catalog_url)?)
}

fn breed_arg(args: &[String], usage: &str) -> String {
    args.first().cloned().unwrap_or_else(|| { eprintln!("{usage}"); std::process::exit(1) })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {e}"); e })?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "query" => {
            let question = args.join(" ");
            let question = validate_question(&question)?;
            let rag = orchestrator(&config)?;
            let answer = rag.process_query(question).await?;
            println!("{}", serde_json::to_string_pretty(&answer)?);
        }
        "stats" => {
            let rag = orchestrator(&config)?;
            if args.first().map(String::as_str) == Some("--build") {
                let count = rag.index().rebuild().await?;
                info!(documents = count, "index rebuilt");
            }
            println!("{}", serde_json::to_string_pretty(&rag.get_stats().await)?);
        }
        "corpus" => {
            let rag = orchestrator(&config)?;
            rag.index().ensure_ready().await?;
            for doc in rag.index().documents() {
                println!("{:<28} {}", doc.id, doc.text.trim());
            }
        }
        "breeds" => {
            println!("{}", serde_json::to_string_pretty(&catalog(&config)?.list_breeds().await?)?);
        }
        "images" => {
            let breed = breed_arg(&args, "Usage: breedrag images <breed> [count]");
            let count = args.get(1).and_then(|c| c.parse().ok()).unwrap_or(5);
            for url in catalog(&config)?.breed_images(&breed, count).await? {
                println!("{url}");
            }
        }
        "random" => {
            let breed = breed_arg(&args, "Usage: breedrag random <breed>");
            println!("{}", catalog(&config)?.random_breed_image(&breed).await?);
        }
        _ => { eprintln!("Unknown command: {cmd}\n{USAGE}"); std::process::exit(1); }
    }
    Ok(())
}
