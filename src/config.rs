use clap::Parser;

use crate::error::GatewayError;

pub const DEFAULT_GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

// value shipped in sample .env files, never a real key
const PLACEHOLDER_API_KEY: &str = "YOUR_GEMINI_API_KEY_HERE";

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "puzzle-gateway")]
#[command(about = "Caching proxy that generates crossword and word search puzzles with Gemini")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // SQLite database holding the puzzle cache
    // Example: "puzzles.db" or ":memory:"
    #[arg(short, long, env = "DATABASE_URL")]
    pub database_url: String,

    // Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    // Gemini generateContent endpoint
    #[arg(long, env = "GEMINI_API_URL", default_value = DEFAULT_GEMINI_URL)]
    pub gemini_url: String,
}

impl Args {
    pub fn validate(&self) -> Result<(), GatewayError> {
        validate_api_key(&self.gemini_api_key)
    }
}

pub fn validate_api_key(key: &str) -> Result<(), GatewayError> {
    if key.trim().is_empty() || key == PLACEHOLDER_API_KEY {
        return Err(GatewayError::Config(
            "GEMINI_API_KEY is not set or still holds the placeholder value".to_string(),
        ));
    }
    Ok(())
}
