use clap::Parser;

use ruleta_core::{EntropySource, RandomSource, SeededSource};

#[derive(Debug, Clone, Parser)]
#[command(name = "ruleta-server", about = "HTTP server for the ruleta game")]
pub struct ServerConfig {
    /// Database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://ruleta.db")]
    pub database_url: String,

    /// Listen address
    #[arg(long, env = "BIND", default_value = "127.0.0.1:5000")]
    pub bind: String,

    /// Secret seed for reproducible draws; OS entropy when absent
    #[arg(long, env = "RULETA_SEED")]
    pub seed: Option<String>,

    /// Keep the ledger in memory instead of the database
    #[arg(long, default_value_t = false)]
    pub ephemeral: bool,
}

impl ServerConfig {
    pub fn random_source(&self) -> Box<dyn RandomSource> {
        match &self.seed {
            Some(seed) => Box::new(SeededSource::new(seed.clone())),
            None => Box::new(EntropySource::new()),
        }
    }
}
