use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use oboeru_lib::flashcards::CardStore;
use oboeru_lib::Config;

/// Shared state for CLI commands
pub struct App {
    pub config: Config,
    /// Write `<deck><suffix>` files instead of overwriting decks
    pub debug: bool,
    pub seed: Option<u64>,
}

impl App {
    pub fn new(config_path: Option<&Path>, debug: bool, seed: Option<u64>) -> Result<Self> {
        let config = Config::load(config_path).context("Failed to load config")?;

        Ok(Self {
            config,
            debug,
            seed,
        })
    }

    /// Load all decks; the order given is the deck order
    pub fn load_store(&self, decks: &[PathBuf]) -> Result<CardStore> {
        CardStore::load(decks, &self.config.time_format).context("Failed to load decks")
    }

    /// Write every deck back, honoring debug mode
    pub fn save_store(&self, store: &CardStore) -> Result<()> {
        let suffix = self.debug.then_some(self.config.debug_suffix.as_str());
        store
            .save(&self.config.time_format, suffix)
            .context("Failed to save decks")?;
        Ok(())
    }

    pub fn now(&self) -> i64 {
        Utc::now().timestamp()
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
