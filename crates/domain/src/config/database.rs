use serde::{Deserialize, Serialize};

/// SQLite backend of record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file (default: "./ferrous-watchlist.db")
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum pooled connections (default: 8)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite://{}", self.path)
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_db_path() -> String {
    "./ferrous-watchlist.db".to_string()
}

fn default_max_connections() -> u32 {
    8
}
