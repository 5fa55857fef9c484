//! # Catalyst Library
//!
//! Reference data for the catalysts the simulator offers. A catalyst is modelled only
//! by the amount `ΔEa` (kJ/mol) by which it lowers the activation energy of *both*
//! directions of a reaction. Lowering both barriers by the same amount multiplies kf
//! and kr by the same factor
//!
//! ```text
//! factor = exp(ΔEa/(R*T)),   R = 8.314e-3 kJ/(mol·K)
//! ```
//!
//! so kf/kr and Kc are unchanged. [`acceleration_factor`] is the single place this
//! formula lives.
//!
//! Lookup by id never fails: an unknown id resolves to the `none` catalyst, because a
//! miss in a reference table is not an exceptional condition for the simulator.
use crate::Thermodynamics::equilibrium_thermo::R_KJ;
use serde::{Deserialize, Serialize};

pub const NO_CATALYST_ID: &str = "none";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalyst {
    pub id: String,
    pub name: String,
    /// kJ/mol
    pub ea_reduction: f64,
    pub description: String,
    #[serde(default)]
    pub applications: String,
}

impl Catalyst {
    fn new(id: &str, name: &str, ea_reduction: f64, description: &str, applications: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ea_reduction,
            description: description.to_string(),
            applications: applications.to_string(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.id == NO_CATALYST_ID
    }

    /// acceleration of both directions produced by this catalyst at temperature `t`
    pub fn acceleration_factor(&self, t: f64) -> f64 {
        acceleration_factor(self.ea_reduction, t)
    }
}

/// exp(ΔEa/(R*T)); 1.0 when there is no reduction
pub fn acceleration_factor(ea_reduction: f64, temperature: f64) -> f64 {
    if ea_reduction <= 0.0 {
        return 1.0;
    }
    f64::exp(ea_reduction / (R_KJ * temperature))
}

/// all catalysts, "none" first
pub fn get_all_catalysts() -> Vec<Catalyst> {
    vec![
        Catalyst::new(NO_CATALYST_ID, "No catalyst", 0.0, "No catalytic effect", ""),
        Catalyst::new(
            "platinum",
            "Platinum (Pt)",
            35.0,
            "Noble metal used in hydrogenation and oxidation. Lowers Ea by ~35 kJ/mol",
            "Alkene hydrogenation, automotive catalytic converters",
        ),
        Catalyst::new(
            "palladium",
            "Palladium (Pd)",
            30.0,
            "Catalyst for C-C couplings (Suzuki, Heck). Lowers Ea by ~30 kJ/mol",
            "Organic synthesis, cross-coupling, hydrogenation",
        ),
        Catalyst::new(
            "vanadium",
            "Vanadium pentoxide (V₂O₅)",
            40.0,
            "Contact process catalyst (H₂SO₄). Lowers Ea by ~40 kJ/mol",
            "Sulfuric acid production (SO₂ → SO₃)",
        ),
        Catalyst::new(
            "enzyme",
            "Biological enzyme",
            55.0,
            "Highly efficient biocatalysts. Lowers Ea by ~55 kJ/mol",
            "Biological reactions, digestion, fermentation",
        ),
        Catalyst::new(
            "iron",
            "Promoted iron (Fe)",
            45.0,
            "Haber-Bosch process catalyst. Lowers Ea by ~45 kJ/mol",
            "Ammonia synthesis (N₂ + 3H₂ → 2NH₃)",
        ),
    ]
}

/// catalyst by id; unknown ids resolve to the "none" catalyst
pub fn get_catalyst_by_id(id: &str) -> Catalyst {
    let mut all = get_all_catalysts();
    match all.iter().position(|c| c.id == id) {
        Some(i) => all.swap_remove(i),
        None => {
            log::debug!("unknown catalyst id '{}', using '{}'", id, NO_CATALYST_ID);
            all.swap_remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_acceleration_factor_without_reduction() {
        assert_eq!(acceleration_factor(0.0, 298.0), 1.0);
        assert_eq!(acceleration_factor(-5.0, 298.0), 1.0);
    }

    #[test]
    fn test_acceleration_factor_value() {
        let f = acceleration_factor(35.0, 700.0);
        assert_relative_eq!(f, f64::exp(35.0 / (8.314e-3 * 700.0)), epsilon = 1e-9);
        // hotter => smaller relative gain
        assert!(acceleration_factor(35.0, 300.0) > acceleration_factor(35.0, 700.0));
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let pt = get_catalyst_by_id("platinum");
        assert_eq!(pt.ea_reduction, 35.0);
        assert!(!pt.is_none());
        let fallback = get_catalyst_by_id("unobtainium");
        assert!(fallback.is_none());
        assert_eq!(fallback.ea_reduction, 0.0);
        assert_eq!(fallback.acceleration_factor(298.0), 1.0);
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let all = get_all_catalysts();
        let mut ids: Vec<_> = all.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), all.len());
        assert_eq!(all[0].id, NO_CATALYST_ID);
    }
}
