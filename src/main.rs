use anyhow::{Context, Result};
use tracing::info;

use civic_data::compile::Compiler;
use civic_data::config::Config;
use civic_data::schema::FieldSchemaRegistry;
use civic_data::source;

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("civic_data=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    // Step 1: Field configuration
    let schemas = match &config.fields_path {
        Some(path) => {
            info!("Reading field configuration from {}", path.display());
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            FieldSchemaRegistry::from_yaml_str(&text)?
        }
        None => FieldSchemaRegistry::builtin()?,
    };

    // Step 2: Raw objects
    info!("Loading objects from {}", config.data_dir.display());
    let raw = source::load_raw_collections(&config.data_dir)?;

    // Step 3: Compile
    info!("Default language: {} ('{}')", config.language.name(), config.language.code());
    let compilation = Compiler::new(&schemas)
        .strict_attributes(config.strict_attributes)
        .language(config.language)
        .compile(&raw)?;

    // Step 4: Write JSON
    let json = if config.pretty_json {
        serde_json::to_string_pretty(&compilation.graph)?
    } else {
        serde_json::to_string(&compilation.graph)?
    };
    if let Some(parent) = config.output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    info!("Writing to {}", config.output_path.display());
    std::fs::write(&config.output_path, json)
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;

    info!(
        "Done: {} objects compiled",
        compilation.metrics.total_objects
    );
    Ok(())
}
