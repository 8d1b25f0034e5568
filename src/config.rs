use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::i18n::Language;

#[derive(Debug, Clone)]
pub struct Config {
    // Input
    pub data_dir: PathBuf,
    pub fields_path: Option<PathBuf>,

    // Output
    pub output_path: PathBuf,
    pub pretty_json: bool,

    // Compilation
    pub strict_attributes: bool,
    pub language: Language,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Input
            data_dir: std::env::var("DATA_DIR")
                .unwrap_or_else(|_| "pre_data/objects".to_string())
                .into(),
            fields_path: std::env::var("FIELDS_PATH").ok().map(PathBuf::from),

            // Output
            output_path: std::env::var("OUTPUT_PATH")
                .unwrap_or_else(|_| "_build/data.json".to_string())
                .into(),
            pretty_json: parse_bool("PRETTY_JSON", true)?,

            // Compilation
            strict_attributes: parse_bool("STRICT_ATTRIBUTES", false)?,
            language: match std::env::var("DEFAULT_LANGUAGE") {
                Ok(code) => Language::from_code(code.trim())
                    .with_context(|| format!("Invalid DEFAULT_LANGUAGE '{}'", code))?,
                Err(_) => Language::canonical(),
            },
        })
    }
}

fn parse_bool(name: &str, default: bool) -> Result<bool> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .to_ascii_lowercase()
            .parse::<bool>()
            .with_context(|| format!("{} must be true or false, got '{}'", name, value)),
        Err(_) => Ok(default),
    }
}
