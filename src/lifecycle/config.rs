//! Shop and simulation settings.
//!
//! [`ShopConfig`] sizes the shop itself. [`SimulationConfig`] is the demo
//! binary's command line: every flag can also come from a `COFFEE_*`
//! environment variable, and the command line wins when both are given.

use std::path::PathBuf;

use clap::{Args, Parser};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::barista::AdmissionPolicy;
use crate::error::ShopError;
use crate::model::Menu;

/// Orders the shared queue holds per barista when no explicit size is given.
pub const QUEUE_SLOTS_PER_BARISTA: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ShopConfig {
    /// Ordering kiosks available to customers. Zero is allowed; kiosks can be added later.
    #[arg(long = "kiosk-count", env = "COFFEE_KIOSKS", default_value_t = 1)]
    pub kiosks: usize,
    /// Barista workers.
    #[arg(long = "barista-count", env = "COFFEE_BARISTAS", default_value_t = 1)]
    pub baristas: usize,
    /// Orders each barista works on at once.
    #[arg(long = "barista-order-count", env = "COFFEE_BARISTA_CAPACITY", default_value_t = 5)]
    pub barista_capacity: usize,
    /// Size of the shared order queue, `QUEUE_SLOTS_PER_BARISTA * baristas` when unset.
    #[arg(long = "queue-capacity", env = "COFFEE_QUEUE_CAPACITY")]
    pub queue_capacity: Option<usize>,
    /// What the barista order count means.
    #[arg(long, env = "COFFEE_ADMISSION", value_enum, default_value_t = AdmissionPolicy::Capped)]
    pub admission: AdmissionPolicy,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            kiosks: 1,
            baristas: 1,
            barista_capacity: 5,
            queue_capacity: None,
            admission: AdmissionPolicy::default(),
        }
    }
}

impl ShopConfig {
    pub fn validate(&self) -> Result<(), ShopError> {
        if self.baristas == 0 {
            return Err(ShopError::InvalidConfig("at least one barista is required".into()));
        }
        if self.barista_capacity == 0 {
            return Err(ShopError::InvalidConfig("barista capacity must be at least 1".into()));
        }
        if self.queue_capacity == Some(0) {
            return Err(ShopError::InvalidConfig("order queue capacity must be at least 1".into()));
        }
        Ok(())
    }

    pub fn order_queue_capacity(&self) -> usize {
        self.queue_capacity
            .unwrap_or(QUEUE_SLOTS_PER_BARISTA * self.baristas)
            .max(1)
    }
}

/// Model a coffee shop: customers order at kiosks, baristas share grinders and brewers.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "coffee-shop", version)]
pub struct SimulationConfig {
    #[command(flatten)]
    pub shop: ShopConfig,
    /// Grinders in the shop.
    #[arg(long = "grinder-count", env = "COFFEE_GRINDERS", default_value_t = 1)]
    pub grinders: usize,
    /// Brewers in the shop.
    #[arg(long = "brewer-count", env = "COFFEE_BREWERS", default_value_t = 1)]
    pub brewers: usize,
    /// Customers ordering at the same time.
    #[arg(long = "customer-count", env = "COFFEE_CUSTOMERS", default_value_t = 1)]
    pub customers: usize,
    /// Upper bound for each grinder's speed in grams per second.
    #[arg(long, env = "COFFEE_MAX_GRINDER_RATE", default_value_t = 100)]
    pub max_grinder_rate: u32,
    /// Upper bound for each brewer's speed in ounces per second.
    #[arg(long, env = "COFFEE_MAX_BREWER_RATE", default_value_t = 40)]
    pub max_brewer_rate: u32,
    /// Seed for equipment speeds and drink choices; random when unset.
    #[arg(long, env = "COFFEE_SEED")]
    pub seed: Option<u64>,
    /// JSON file with the menu, a list of `{name, size, coffee_ratio}`.
    #[arg(long, env = "COFFEE_MENU")]
    pub menu: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            shop: ShopConfig::default(),
            grinders: 1,
            brewers: 1,
            customers: 1,
            max_grinder_rate: 100,
            max_brewer_rate: 40,
            seed: None,
            menu: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ShopError> {
        self.shop.validate()?;
        if self.grinders == 0 || self.brewers == 0 {
            return Err(ShopError::InvalidConfig(
                "the shop needs at least one grinder and one brewer".into(),
            ));
        }
        if self.shop.kiosks == 0 && self.customers > 0 {
            return Err(ShopError::InvalidConfig("customers need at least one kiosk".into()));
        }
        Ok(())
    }

    /// The menu file if one was given, otherwise the default menu.
    pub fn load_menu(&self) -> Result<Menu, ShopError> {
        let Some(path) = &self.menu else {
            return Ok(Menu::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| {
            ShopError::InvalidConfig(format!("cannot read menu {}: {e}", path.display()))
        })?;
        Menu::from_json(&json)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
