use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// CSV file with `movie_id,title,genres` rows
    #[serde(default = "default_movies_file")]
    pub movies_file: String,

    /// CSV file with `user_id,movie_id,rating` rows
    #[serde(default = "default_ratings_file")]
    pub ratings_file: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Recommendation count used when a request does not give `n`
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,
}

fn default_movies_file() -> String {
    "data/movies_data.csv".to_string()
}

fn default_ratings_file() -> String {
    "data/user_ratings.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_recommendations() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
