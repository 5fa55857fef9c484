//! # Reaction Model
//!
//! Immutable description of a single reversible elementary reaction
//! `Σ νi·Ai <=> Σ νj·Bj`: stoichiometry, base rate constants at the reference
//! temperature, activation energies of both directions and standard enthalpy/entropy
//! of reaction.
//!
//! A `ReactionModel` is constructed once (from the static catalog or from a JSON file)
//! and never mutated afterwards, so several engines may share one instance behind an
//! `Arc`.
//!
//! ## Units
//! | Field | Units |
//! |---|---|
//! | `k_forward`, `k_reverse` | depend on reaction order (s⁻¹, M⁻¹s⁻¹, ...) |
//! | `ea_forward`, `ea_reverse` | kJ/mol |
//! | `delta_h` | kJ/mol |
//! | `delta_s` | J/(mol·K) |
//! | recommended temperature / pressure / volume | K / atm / L |
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// errors found while building or loading reaction data
#[derive(Debug, Error)]
pub enum ReactionError {
    #[error("species '{0}' appears more than once in reaction")]
    DuplicateSpecies(String),
    #[error("reaction '{0}' must have at least one reactant and one product")]
    EmptySide(String),
    #[error("species '{formula}' has invalid stoichiometric coefficient {coefficient}")]
    InvalidCoefficient { formula: String, coefficient: u32 },
    #[error("species '{formula}' has invalid initial concentration {value}")]
    InvalidConcentration { formula: String, value: f64 },
    #[error("parameter '{name}' must be positive and finite, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },
    #[error("parameter '{name}' must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// chemical species taking part in reaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    /// unique key of the species within a reaction
    pub formula: String,
    /// stoichiometric coefficient, also the order of the species in the rate law
    pub coefficient: u32,
    /// mol/L
    #[serde(rename = "initialConc", alias = "initial_concentration")]
    pub initial_concentration: f64,
    /// opaque tag for the presentation layer (e.g. "#64748b")
    #[serde(rename = "color", alias = "display_color")]
    pub display_color: String,
}

impl Species {
    pub fn new(formula: &str, coefficient: u32, initial_concentration: f64, display_color: &str) -> Self {
        Self {
            formula: formula.to_string(),
            coefficient,
            initial_concentration,
            display_color: display_color.to_string(),
        }
    }
    /// "2NO₂" for coefficient 2, "NO₂" for coefficient 1
    pub fn term(&self) -> String {
        if self.coefficient == 1 {
            self.formula.clone()
        } else {
            format!("{}{}", self.coefficient, self.formula)
        }
    }
}

/// recommended operating conditions; also the conditions an engine starts from and resets to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendedConditions {
    /// K
    pub temperature: f64,
    /// atm
    pub pressure: f64,
    /// L
    pub volume: f64,
}

impl Default for RecommendedConditions {
    fn default() -> Self {
        Self {
            temperature: 298.0,
            pressure: 1.0,
            volume: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{}", s)
    }
}

/// immutable parameters of a reversible elementary reaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionModel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub reactants: Vec<Species>,
    pub products: Vec<Species>,
    /// base forward rate constant at the recommended temperature
    pub k_forward: f64,
    /// base reverse rate constant at the recommended temperature
    pub k_reverse: f64,
    /// kJ/mol
    #[serde(rename = "Ea_forward", alias = "eaForward")]
    pub ea_forward: f64,
    /// kJ/mol
    #[serde(rename = "Ea_reverse", alias = "eaReverse")]
    pub ea_reverse: f64,
    /// kJ/mol
    #[serde(rename = "deltaH")]
    pub delta_h: f64,
    /// J/(mol·K)
    #[serde(rename = "deltaS")]
    pub delta_s: f64,
    #[serde(default)]
    pub recommended: RecommendedConditions,
    /// id in the catalyst library, "none" when no catalyst is needed
    #[serde(default = "no_catalyst_id")]
    pub recommended_catalyst: String,
    #[serde(default)]
    pub catalyst_reason: String,
    #[serde(default)]
    pub catalyst_alternative: String,
}

fn no_catalyst_id() -> String {
    "none".to_string()
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ReactionError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ReactionError::NonPositiveParameter { name, value })
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ReactionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ReactionError::NonFiniteParameter { name, value })
    }
}

impl ReactionModel {
    /// builds and validates a reaction with default descriptive fields and conditions
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        reactants: Vec<Species>,
        products: Vec<Species>,
        k_forward: f64,
        k_reverse: f64,
        ea_forward: f64,
        ea_reverse: f64,
        delta_h: f64,
        delta_s: f64,
        recommended: RecommendedConditions,
    ) -> Result<Self, ReactionError> {
        let model = Self {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            difficulty: Difficulty::default(),
            reactants,
            products,
            k_forward,
            k_reverse,
            ea_forward,
            ea_reverse,
            delta_h,
            delta_s,
            recommended,
            recommended_catalyst: no_catalyst_id(),
            catalyst_reason: String::new(),
            catalyst_alternative: String::new(),
        };
        model.validate()?;
        Ok(model)
    }

    /// checks all invariants of reaction data
    pub fn validate(&self) -> Result<(), ReactionError> {
        if self.reactants.is_empty() || self.products.is_empty() {
            return Err(ReactionError::EmptySide(self.id.clone()));
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for species in self.all_species() {
            if !seen.insert(species.formula.as_str()) {
                return Err(ReactionError::DuplicateSpecies(species.formula.clone()));
            }
            if species.coefficient == 0 {
                return Err(ReactionError::InvalidCoefficient {
                    formula: species.formula.clone(),
                    coefficient: species.coefficient,
                });
            }
            let c0 = species.initial_concentration;
            if !(c0.is_finite() && c0 >= 0.0) {
                return Err(ReactionError::InvalidConcentration {
                    formula: species.formula.clone(),
                    value: c0,
                });
            }
        }
        check_positive("kForward", self.k_forward)?;
        check_positive("kReverse", self.k_reverse)?;
        check_positive("Ea_forward", self.ea_forward)?;
        check_positive("Ea_reverse", self.ea_reverse)?;
        check_finite("deltaH", self.delta_h)?;
        check_finite("deltaS", self.delta_s)?;
        check_positive("recommended.temperature", self.recommended.temperature)?;
        check_positive("recommended.pressure", self.recommended.pressure)?;
        check_positive("recommended.volume", self.recommended.volume)?;
        Ok(())
    }

    /// reactants followed by products, in declaration order
    pub fn all_species(&self) -> impl Iterator<Item = &Species> {
        self.reactants.iter().chain(self.products.iter())
    }

    /// formulas of reactants followed by products
    pub fn formulas(&self) -> Vec<String> {
        self.all_species().map(|s| s.formula.clone()).collect()
    }

    pub fn find_species(&self, formula: &str) -> Option<&Species> {
        self.all_species().find(|s| s.formula == formula)
    }

    /// display equation, e.g. "N₂ + 3H₂ ⇌ 2NH₃"
    pub fn equation(&self) -> String {
        let side = |species: &[Species]| {
            species
                .iter()
                .map(|s| s.term())
                .collect::<Vec<_>>()
                .join(" + ")
        };
        format!("{} ⇌ {}", side(&self.reactants), side(&self.products))
    }

    /// change of the number of moles in the reaction, Σν(products) - Σν(reactants)
    pub fn delta_n(&self) -> i64 {
        let sum = |species: &[Species]| species.iter().map(|s| s.coefficient as i64).sum::<i64>();
        sum(&self.products) - sum(&self.reactants)
    }
}
