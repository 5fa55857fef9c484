//! # Equilibrium Thermodynamics
//!
//! Pure functions relating the standard thermodynamic data of a single reversible
//! reaction to its equilibrium constant and to the driving force at arbitrary
//! composition.
//!
//! ```text
//! dG0 = dH - T*dS                       (J/mol)
//! Kc  = exp(-dG0/(R*T))
//! Q   = П[products]^nu / П[reactants]^nu
//! dG  = dG0 + R*T*ln(Q)                 (kJ/mol)
//! ```
//!
//! Kc computed here is the thermodynamic reference for the whole crate; it is never
//! derived from the ratio of kinetic rate constants.

/// Universal gas constant, J/(mol·K)
pub const R: f64 = 8.314;
/// Universal gas constant, kJ/(mol·K)
pub const R_KJ: f64 = R / 1000.0;
/// floor applied to concentrations before they enter Q (and hence ln(Q))
pub const Q_CONCENTRATION_FLOOR: f64 = 1e-10;

/// Standard Gibbs energy of reaction in J/mol.
/// `delta_h` in kJ/mol, `delta_s` in J/(mol·K), `t` in K.
pub fn standard_gibbs_energy_j(delta_h: f64, delta_s: f64, t: f64) -> f64 {
    delta_h * 1000.0 - t * delta_s
}

/// Standard Gibbs energy of reaction in kJ/mol.
pub fn standard_gibbs_energy_kj(delta_h: f64, delta_s: f64, t: f64) -> f64 {
    delta_h - t * delta_s / 1000.0
}

/// Kc = exp(-dG0/(R*T))
pub fn equilibrium_constant(delta_h: f64, delta_s: f64, t: f64) -> f64 {
    let dG0 = standard_gibbs_energy_j(delta_h, delta_s, t);
    f64::exp(-dG0 / (R * t))
}

/// Reaction quotient for (concentration, stoichiometric coefficient) pairs of both sides.
/// Every concentration is floored at [`Q_CONCENTRATION_FLOOR`] before exponentiation.
pub fn reaction_quotient<I, J>(reactants: I, products: J) -> f64
where
    I: IntoIterator<Item = (f64, u32)>,
    J: IntoIterator<Item = (f64, u32)>,
{
    let numerator = floored_product(products);
    let denominator = floored_product(reactants);
    numerator / denominator
}

fn floored_product<I>(side: I) -> f64
where
    I: IntoIterator<Item = (f64, u32)>,
{
    side.into_iter().fold(1.0, |acc, (conc, nu)| {
        acc * conc.max(Q_CONCENTRATION_FLOOR).powi(nu as i32)
    })
}

/// dG = dG0 + R*T*ln(Q), kJ/mol
pub fn gibbs_energy(delta_h: f64, delta_s: f64, t: f64, q: f64) -> f64 {
    standard_gibbs_energy_kj(delta_h, delta_s, t) + R_KJ * t * f64::ln(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_standard_gibbs_energy_units_agree() {
        let (dh, ds, t) = (57.2, 176.0, 298.0);
        let j = standard_gibbs_energy_j(dh, ds, t);
        let kj = standard_gibbs_energy_kj(dh, ds, t);
        assert_relative_eq!(j / 1000.0, kj, epsilon = 1e-12);
        assert_relative_eq!(j, 57200.0 - 298.0 * 176.0, epsilon = 1e-9);
    }

    #[test]
    fn test_equilibrium_constant_n2o4() {
        // dG0 = 57200 - 298*176 = 4752 J/mol
        let k = equilibrium_constant(57.2, 176.0, 298.0);
        let expected = f64::exp(-4752.0 / (R * 298.0));
        assert_relative_eq!(k, expected, epsilon = 1e-12);
        assert!(k > 0.14 && k < 0.16);
    }

    #[test]
    fn test_equilibrium_constant_is_one_when_dg0_vanishes() {
        // dH = T*dS  => dG0 = 0
        let k = equilibrium_constant(29.8, 100.0, 298.0);
        assert_relative_eq!(k, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reaction_quotient_with_coefficients() {
        // N2O4 <=> 2NO2 : Q = [NO2]^2/[N2O4]
        let q = reaction_quotient(vec![(2.0, 1)], vec![(0.1, 2)]);
        assert_relative_eq!(q, 0.01 / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_reaction_quotient_floors_zero_concentrations() {
        let q = reaction_quotient(vec![(1.0, 1), (1.0, 1)], vec![(0.0, 2)]);
        assert_relative_eq!(q, 1e-20, epsilon = 1e-30);
        let q = reaction_quotient(vec![(0.0, 1)], vec![(1.0, 1)]);
        assert_relative_eq!(q, 1e10, max_relative = 1e-12);
        assert!(q.is_finite());
    }

    #[test]
    fn test_gibbs_energy_vanishes_at_q_equal_kc() {
        let (dh, ds, t) = (-24.0, -35.0, 298.0);
        let kc = equilibrium_constant(dh, ds, t);
        assert_relative_eq!(gibbs_energy(dh, ds, t, kc), 0.0, epsilon = 1e-9);
        assert!(gibbs_energy(dh, ds, t, kc / 10.0) < 0.0);
        assert!(gibbs_energy(dh, ds, t, kc * 10.0) > 0.0);
    }
}
