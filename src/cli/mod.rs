use std::sync::Arc;

use clap::{Arg, ArgAction, Command};
use tracing::{error, info};

use crate::{
    CompletionModel, InMemoryStore, IntentClassifier, LlmClient, ModificationOrchestrator,
    MutationEngine, OfflineModel, Outcome, PlacesSearchTool, StaticPlaceResolver, ToolRegistry,
};

/// CLI entry point for the tripcraft tool
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = Command::new("tripcraft")
        .version("0.1.0")
        .about("Apply conversational modifications to a travel itinerary")
        .arg(
            Arg::new("message")
                .help("The user message to classify and apply")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("itinerary")
                .short('f')
                .long("itinerary")
                .value_name("FILE")
                .help("JSON itinerary file to modify"),
        )
        .arg(
            Arg::new("places")
                .short('p')
                .long("places")
                .value_name("FILE")
                .help("JSON file of place candidates for the offline resolver"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("The model to use for classification")
                .default_value("openai/gpt-4.1-mini"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("API key (or set OPENAI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("API base URL (or set OPENAI_BASE_URL / OPENROUTER_BASE_URL env vars)"),
        )
        .arg(
            Arg::new("offline")
                .long("offline")
                .action(ArgAction::SetTrue)
                .help("Skip the model entirely and use the keyword fallback classifier"),
        )
        .arg(
            Arg::new("write")
                .short('w')
                .long("write")
                .action(ArgAction::SetTrue)
                .help("Write the updated itinerary back to the itinerary file"),
        )
        .get_matches();

    let offline = matches.get_flag("offline");
    let api_key = matches
        .get_one::<String>("api-key")
        .cloned()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok());

    let model: Arc<dyn CompletionModel> = match (offline, api_key) {
        (true, _) | (false, None) => {
            info!("running offline, using the keyword fallback classifier");
            Arc::new(OfflineModel)
        }
        (false, Some(key)) => {
            let mut client =
                LlmClient::new(key).with_model(matches.get_one::<String>("model").unwrap());
            if let Some(base_url) = matches
                .get_one::<String>("base-url")
                .cloned()
                .or_else(|| std::env::var("OPENAI_BASE_URL").ok())
                .or_else(|| std::env::var("OPENROUTER_BASE_URL").ok())
            {
                client = client.with_base_url(base_url);
            }
            Arc::new(client)
        }
    };

    let resolver = Arc::new(match matches.get_one::<String>("places") {
        Some(path) => StaticPlaceResolver::from_json(&std::fs::read_to_string(path)?)?,
        None => StaticPlaceResolver::default(),
    });

    let store = Arc::new(InMemoryStore::new());
    let itinerary_path = matches.get_one::<String>("itinerary");
    if let Some(path) = itinerary_path {
        let itinerary = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        store.seed("cli", itinerary).await;
    }

    let mut tools = ToolRegistry::new();
    tools.register(PlacesSearchTool::new(resolver.clone()));

    let orchestrator = ModificationOrchestrator::new(
        IntentClassifier::new(model.clone()),
        MutationEngine::new(resolver),
        model,
        store.clone(),
        Arc::new(tools),
    );

    let message = matches.get_one::<String>("message").unwrap();
    info!("handling message: {}", message);

    match orchestrator.handle("cli", message, &[]).await {
        Ok(Outcome::Applied(response)) => {
            println!("\n{}", response.message);
            if let Some(err) = &response.error {
                println!("Error: {}", err);
            }
            if let Some(suggestion) = &response.suggestion {
                println!("Suggestion: {}", suggestion);
            }
            if let (Some(path), Some(updated), true) = (
                itinerary_path,
                response.itinerary.as_ref(),
                matches.get_flag("write"),
            ) {
                std::fs::write(path, serde_json::to_string_pretty(updated)?)?;
                info!("updated itinerary written to {}", path);
            }
        }
        Ok(Outcome::Delegated { intent, tool_results }) => {
            println!("\nDetected intent: {}", intent.primary_intent.tag());
            println!("Confidence: {:.2}", intent.confidence);
            if !intent.categories.is_empty() {
                println!("Categories: {}", intent.categories.join(", "));
            }
            for result in tool_results {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
        Err(e) => {
            error!("failed to handle message: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
