//! Seed data loading from config.toml
//!
//! The plans and sample agencies defined here are inserted on first run, when
//! the corresponding tables are still empty. A missing file falls back to the
//! built-in defaults.

use crate::entities::BillingPeriod;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// Plans to create when no plan exists
    #[serde(default)]
    pub plans: Vec<PlanSeed>,
    /// Agencies to create when no agency exists
    #[serde(default)]
    pub agencies: Vec<AgencySeed>,
}

/// Configuration for a single plan
#[derive(Debug, Deserialize, Clone)]
pub struct PlanSeed {
    /// Unique plan name
    pub name: String,
    /// Price per period
    pub price: f64,
    /// Billing period, monthly when omitted
    #[serde(default = "default_period")]
    pub billing_period: BillingPeriod,
    /// Feature list
    pub description: Option<String>,
}

/// Configuration for a single sample agency
#[derive(Debug, Deserialize, Clone)]
pub struct AgencySeed {
    /// Agency name
    pub name: String,
    /// City
    pub city: String,
    /// Website URL
    pub website: String,
    /// Presentation text
    pub description: Option<String>,
    /// Name of the plan to attach, resolved at seeding time
    pub plan: Option<String>,
    /// Explicit display position
    pub sort_order: i32,
}

const fn default_period() -> BillingPeriod {
    BillingPeriod::Monthly
}

impl Default for SeedConfig {
    fn default() -> Self {
        let agency = |name: &str,
                      city: &str,
                      website: &str,
                      description: &str,
                      plan: &str,
                      sort_order| AgencySeed {
            name: name.to_string(),
            city: city.to_string(),
            website: website.to_string(),
            description: Some(description.to_string()),
            plan: Some(plan.to_string()),
            sort_order,
        };

        Self {
            plans: vec![
                PlanSeed {
                    name: "Basic".to_string(),
                    price: 9.0,
                    billing_period: BillingPeriod::Monthly,
                    description: Some(
                        "Fiche agence standard\nLien vers votre site\nSupport email".to_string(),
                    ),
                },
                PlanSeed {
                    name: "Premium".to_string(),
                    price: 19.0,
                    billing_period: BillingPeriod::Monthly,
                    description: Some(
                        "Fiche agence mise en avant\nLogo et images personnalisés\nSupport prioritaire\nStatistiques de visite"
                            .to_string(),
                    ),
                },
            ],
            agencies: vec![
                agency(
                    "Immobilier Marseille Centre",
                    "Marseille",
                    "https://example-agency1.com",
                    "Spécialiste de l'immobilier dans le centre de Marseille",
                    "Premium",
                    1,
                ),
                agency(
                    "Agence du Vieux Port",
                    "Marseille",
                    "https://example-agency2.com",
                    "Votre partenaire immobilier près du Vieux Port",
                    "Basic",
                    2,
                ),
                agency(
                    "Provence Immobilier",
                    "Aix-en-Provence",
                    "https://example-agency3.com",
                    "Immobilier de prestige en Provence",
                    "Premium",
                    3,
                ),
                agency(
                    "Côte Bleue Immobilier",
                    "Martigues",
                    "https://example-agency4.com",
                    "Spécialiste de la Côte Bleue",
                    "Basic",
                    4,
                ),
            ],
        }
    }
}

/// Loads seed configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read seed file {}: {e}", path.as_ref().display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Loads the seed file when it exists, otherwise returns the built-in defaults.
///
/// # Errors
/// Returns an error only when the file exists but cannot be parsed.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let path = path.as_ref();
    if path.exists() {
        info!("Loading seed data from {}", path.display());
        load_config(path)
    } else {
        warn!(
            "Seed file {} not found, using built-in defaults",
            path.display()
        );
        Ok(SeedConfig::default())
    }
}
