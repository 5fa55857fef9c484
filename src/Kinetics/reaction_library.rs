//! # Reaction Library
//!
//! Catalog of pre-configured reversible reactions. Rate constants are scaled to
//! pedagogically useful time scales and kr is tuned so that kf/kr matches the
//! thermodynamic Kc at the recommended temperature; activation energies and
//! dH/dS are literature values.
//!
//! | id | equation | T, K |
//! |---|---|---|
//! | `n2o4_no2` | N₂O₄ ⇌ 2NO₂ | 298 |
//! | `h2_i2_hi` | H₂ + I₂ ⇌ 2HI | 700 |
//! | `pcl5_pcl3` | PCl₅ ⇌ PCl₃ + Cl₂ | 473 |
//! | `fe_scn` | Fe³⁺ + SCN⁻ ⇌ FeSCN²⁺ | 298 |
//! | `co_cocl2` | CO + Cl₂ ⇌ COCl₂ | 373 |
//! | `haber_bosch` | N₂ + 3H₂ ⇌ 2NH₃ | 700 |
//!
//! The phosgene entry carries kr ≈ 6.57e-13: with fixed step Euler integration it
//! behaves as practically irreversible. That is a limit of the model, the constant is
//! kept as documented.
//!
//! Besides the built-in catalog, a user catalog can be read from a JSON file holding
//! an array of reactions in the same field naming (`kForward`, `Ea_forward`,
//! `deltaH`, `initialConc`, ...); every entry is validated.
use crate::Kinetics::reaction_model::{
    Difficulty, ReactionError, ReactionModel, RecommendedConditions, Species,
};
use log::{info, warn};
use std::fs;
use std::path::Path;

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    name: &str,
    description: &str,
    difficulty: Difficulty,
    reactants: Vec<Species>,
    products: Vec<Species>,
    kinetics: [f64; 4],
    thermo: [f64; 2],
    recommended: RecommendedConditions,
    catalyst: [&str; 3],
) -> ReactionModel {
    let [k_forward, k_reverse, ea_forward, ea_reverse] = kinetics;
    let [delta_h, delta_s] = thermo;
    let [recommended_catalyst, catalyst_reason, catalyst_alternative] = catalyst;
    ReactionModel {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        difficulty,
        reactants,
        products,
        k_forward,
        k_reverse,
        ea_forward,
        ea_reverse,
        delta_h,
        delta_s,
        recommended,
        recommended_catalyst: recommended_catalyst.to_string(),
        catalyst_reason: catalyst_reason.to_string(),
        catalyst_alternative: catalyst_alternative.to_string(),
    }
}

fn conditions(temperature: f64, pressure: f64, volume: f64) -> RecommendedConditions {
    RecommendedConditions {
        temperature,
        pressure,
        volume,
    }
}

/// all built-in reactions in catalog order
pub fn get_all_reactions() -> Vec<ReactionModel> {
    vec![
        entry(
            "n2o4_no2",
            "Dinitrogen tetroxide dissociation",
            "Gas phase equilibrium with a visible color change (colorless <-> brown)",
            Difficulty::Easy,
            vec![Species::new("N₂O₄", 1, 2.0, "#64748b")],
            vec![Species::new("NO₂", 2, 0.1, "#d97706")],
            // Kc(298 K) ≈ 0.147 => kr = 0.48/0.147
            [0.48, 3.27, 54.0, 33.0],
            [57.2, 176.0],
            conditions(298.0, 1.0, 10.0),
            [
                "none",
                "The reaction is naturally fast in the gas phase; equilibrium is observable within minutes without a catalyst.",
                "None needed: the reaction is spontaneous and fast",
            ],
        ),
        entry(
            "h2_i2_hi",
            "Hydrogen iodide synthesis",
            "Classic equilibrium reaction studied by Bodenstein (1899)",
            Difficulty::Easy,
            vec![
                Species::new("H₂", 1, 1.0, "#a5b4fc"),
                Species::new("I₂", 1, 1.0, "#7c3aed"),
            ],
            vec![Species::new("HI", 2, 0.0, "#fbbf24")],
            // Kc(700 K) ≈ 69.2
            [0.00234, 0.0000338, 165.0, 185.0],
            [-9.4, 21.8],
            conditions(700.0, 1.0, 10.0),
            [
                "platinum",
                "Platinum efficiently breaks H-H and I-I bonds, lowering Ea by ~35 kJ/mol. It is the standard hydrogenation catalyst.",
                "Palladium also works, but Pt is more stable at high temperature",
            ],
        ),
        entry(
            "pcl5_pcl3",
            "Phosphorus pentachloride decomposition",
            "Equilibrium with a strong pressure dependence (Le Chatelier's principle)",
            Difficulty::Medium,
            vec![Species::new("PCl₅", 1, 1.5, "#fde047")],
            vec![
                Species::new("PCl₃", 1, 0.0, "#84cc16"),
                Species::new("Cl₂", 1, 0.0, "#10b981"),
            ],
            // Kc(473 K) ≈ 0.0016
            [0.00086, 0.538, 210.0, 175.0],
            [92.5, 142.0],
            conditions(473.0, 1.0, 10.0),
            [
                "palladium",
                "Palladium is effective for P-Cl bond breaking catalysis, lowering Ea by ~30 kJ/mol. Preferred over Pt for cost and activity.",
                "Platinum also works, but Pd is cheaper and more selective",
            ],
        ),
        entry(
            "fe_scn",
            "Iron(III) thiocyanate formation",
            "Instant ionic reaction with an intense blood-red color",
            Difficulty::Medium,
            vec![
                Species::new("Fe³⁺", 1, 0.5, "#f59e0b"),
                Species::new("SCN⁻", 1, 0.5, "#c7d2fe"),
            ],
            vec![Species::new("FeSCN²⁺", 1, 0.0, "#dc2626")],
            // Kc(298 K) ≈ 239
            [18.0, 0.075, 18.0, 42.0],
            [-24.0, -35.0],
            conditions(298.0, 1.0, 10.0),
            [
                "none",
                "Ionic reaction in aqueous solution, essentially instantaneous (k ~ 1e8 M⁻¹s⁻¹). No catalyst required.",
                "None: accelerating an instantaneous reaction has no practical meaning",
            ],
        ),
        entry(
            "co_cocl2",
            "Phosgene synthesis",
            "Industrial production of phosgene (toxic gas used in synthesis)",
            Difficulty::Hard,
            vec![
                Species::new("CO", 1, 1.5, "#9ca3af"),
                Species::new("Cl₂", 1, 2.5, "#22c55e"),
            ],
            vec![Species::new("COCl₂", 1, 0.0, "#ef4444")],
            // Kc(373 K) ≈ 2.13e8 => kr nearly vanishes
            [0.00014, 6.57e-13, 98.0, 112.0],
            [-107.6, -129.0],
            conditions(373.0, 1.0, 10.0),
            [
                "platinum",
                "The industrial process uses activated carbon with Pt/Pd. Platinum lowers Ea by ~35 kJ/mol and withstands corrosive Cl₂ better than Pd.",
                "Activated carbon alone (less effective but cheaper)",
            ],
        ),
        entry(
            "haber_bosch",
            "Haber-Bosch process (ammonia synthesis)",
            "Extremely strong N≡N triple bond. Without a catalyst equilibrium takes ~50,000 years",
            Difficulty::Hard,
            vec![
                Species::new("N₂", 1, 1.0, "#3b82f6"),
                Species::new("H₂", 3, 3.0, "#a5b4fc"),
            ],
            vec![Species::new("NH₃", 2, 0.0, "#8b5cf6")],
            // Kc(700 K) ≈ 3.56e-4
            [8.2e-8, 0.00023, 335.0, 290.0],
            [-92.4, -198.0],
            conditions(700.0, 200.0, 10.0),
            [
                "iron",
                "Industrial Haber-Bosch: promoted Fe (K₂O, Al₂O₃, CaO) lowers Ea from 335 to 155 kJ/mol, from 50,000 years to minutes.",
                "Nitrogenase enzymes (more efficient, Ea ~65 kJ/mol, but not industrial)",
            ],
        ),
    ]
}

/// reaction by id; `None` if the catalog has no such reaction
pub fn get_reaction_by_id(id: &str) -> Option<ReactionModel> {
    get_all_reactions().into_iter().find(|r| r.id == id)
}

/// ids of all built-in reactions in catalog order
pub fn reaction_ids() -> Vec<String> {
    get_all_reactions().into_iter().map(|r| r.id).collect()
}

/// parses and validates a JSON array of reactions
pub fn parse_reactions_json(content: &str) -> Result<Vec<ReactionModel>, ReactionError> {
    let reactions: Vec<ReactionModel> = serde_json::from_str(content)?;
    if reactions.is_empty() {
        warn!("reaction catalog contains no reactions");
    }
    for reaction in &reactions {
        reaction.validate()?;
    }
    Ok(reactions)
}

/// loads a user reaction catalog from a JSON file
pub fn load_reactions_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<ReactionModel>, ReactionError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let reactions = parse_reactions_json(&content)?;
    info!(
        "loaded {} reactions from '{}'",
        reactions.len(),
        path.display()
    );
    Ok(reactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::catalyst_library::get_catalyst_by_id;
    use crate::Thermodynamics::equilibrium_thermo::equilibrium_constant;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_catalog_is_valid() {
        let all = get_all_reactions();
        assert_eq!(all.len(), 6);
        for reaction in &all {
            reaction.validate().unwrap();
            // every recommended catalyst must exist in the catalyst library
            let cat = get_catalyst_by_id(&reaction.recommended_catalyst);
            assert_eq!(cat.id, reaction.recommended_catalyst);
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let r = get_reaction_by_id("haber_bosch").unwrap();
        assert_eq!(r.equation(), "N₂ + 3H₂ ⇌ 2NH₃");
        assert_eq!(r.recommended.pressure, 200.0);
        assert!(get_reaction_by_id("cold_fusion").is_none());
        assert_eq!(reaction_ids()[0], "n2o4_no2");
    }

    #[test]
    fn test_rate_constants_tuned_to_thermodynamics() {
        // kf/kr reproduces Kc at the recommended temperature within a few percent
        for r in get_all_reactions() {
            let kc = equilibrium_constant(r.delta_h, r.delta_s, r.recommended.temperature);
            assert_relative_eq!(r.k_forward / r.k_reverse, kc, max_relative = 0.1);
        }
    }

    #[test]
    fn test_load_user_catalog_from_file() {
        let json = r##"[
          {
            "id": "a_b",
            "name": "A to B",
            "reactants": [{"formula": "A", "coefficient": 1, "color": "#fff", "initialConc": 1.0}],
            "products": [{"formula": "B", "coefficient": 1, "color": "#000", "initialConc": 0.0}],
            "kForward": 0.5,
            "kReverse": 0.25,
            "Ea_forward": 50.0,
            "Ea_reverse": 60.0,
            "deltaH": -10.0,
            "deltaS": -5.0,
            "recommended": {"temperature": 300.0, "pressure": 1.0, "volume": 5.0}
          }
        ]"##;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let reactions = load_reactions_from_file(file.path()).unwrap();
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions[0].equation(), "A ⇌ B");
        assert_eq!(reactions[0].recommended_catalyst, "none");
        assert_eq!(reactions[0].recommended.volume, 5.0);
    }

    #[test]
    fn test_invalid_user_catalog_is_rejected() {
        let json = r##"[
          {
            "id": "bad",
            "name": "bad",
            "reactants": [{"formula": "A", "coefficient": 1, "color": "#fff", "initialConc": 1.0}],
            "products": [{"formula": "A", "coefficient": 1, "color": "#000", "initialConc": 0.0}],
            "kForward": 0.5, "kReverse": 0.25, "Ea_forward": 50.0, "Ea_reverse": 60.0,
            "deltaH": -10.0, "deltaS": -5.0
          }
        ]"##;
        assert!(matches!(
            parse_reactions_json(json),
            Err(ReactionError::DuplicateSpecies(_))
        ));
        assert!(matches!(
            parse_reactions_json("{ not json"),
            Err(ReactionError::Json(_))
        ));
        assert!(matches!(
            load_reactions_from_file("/definitely/not/here.json"),
            Err(ReactionError::Io(_))
        ));
    }
}
