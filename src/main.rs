use anyhow::{bail, Result};
use pragyadhara_i18n::config::Config;
use pragyadhara_i18n::coordinator::Coordinator;
use pragyadhara_i18n::events::LanguageBus;
use pragyadhara_i18n::i18n::LanguageRegistry;
use pragyadhara_i18n::resolver::Resolver;
use pragyadhara_i18n::storage::FileStore;
use pragyadhara_i18n::translation::HttpTranslator;
use std::sync::Arc;
use tracing::info;

const USAGE: &str = "Usage: pragyadhara-i18n <command>

Commands:
  languages              List supported languages
  current                Show the selected language
  set-language <code>    Select and persist a language
  translate <text>...    Translate text into the selected language";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pragyadhara_i18n=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    if command == "languages" {
        for language in LanguageRegistry::get().list_all() {
            println!("{}  {}", language, language.name);
        }
        return Ok(());
    }

    let config = Config::from_env()?;
    let translator = HttpTranslator::from_config(&config)?;
    let resolver = Arc::new(Resolver::from_config(Arc::new(translator), &config));
    let store = Arc::new(FileStore::new(&config.preferences_path));
    let coordinator = Coordinator::activate(resolver, store, LanguageBus::new()).await;

    match command.as_str() {
        "current" => println!("{}", coordinator.current_language()),
        "set-language" => {
            let Some(code) = args.get(1) else {
                bail!("set-language requires a language code\n\n{}", USAGE);
            };
            coordinator.change_language_by_code(code).await?;
            println!("Language set to {}", coordinator.current_language());
        }
        "translate" => {
            if args.len() < 2 {
                bail!("translate requires at least one text\n\n{}", USAGE);
            }
            let translated = coordinator.translate_all(&args[1..]).await;
            for line in translated {
                println!("{}", line);
            }

            let report = coordinator.resolver().metrics().report();
            info!("Translation metrics: {}", serde_json::to_string(&report)?);
        }
        other => bail!("Unknown command '{}'\n\n{}", other, USAGE),
    }

    coordinator.shutdown();
    Ok(())
}
