//! # Equilibrium Engine
//!
//! Owns the mutable state of one simulation session of a reversible elementary
//! reaction and advances it in time.
//!
//! ## Model
//! ```text
//! r_f = kf_eff * П[reactants]^nu      r_r = kr_eff * П[products]^nu
//! d[Ai]/dt = -nu_i*(r_f - r_r)          d[Bj]/dt = +nu_j*(r_f - r_r)
//! kf_eff = kf_T * exp(ΔEa/(R*T))        kr_eff = kr_T * exp(ΔEa/(R*T))
//! ```
//! where `kf_T`, `kr_T` are the rate constants at the current temperature and `ΔEa` is
//! the catalytic reduction of activation energy (identical for both directions).
//!
//! ## Temperature
//! `kf_T`, `kr_T` are rolling caches. Each [`EquilibriumEngine::set_temperature`] call
//! rescales the *previous* cached value (the base constant before the first change)
//! with the ratio form of the Arrhenius equation
//! ```text
//! k_new = k_old * exp[(Ea/R)*(1/T_old - 1/T_new)]
//! ```
//! so successive changes compose, and going back to the original temperature restores
//! the original constants.
//!
//! ## Thermodynamics
//! Kc is computed from dH and dS only (see `Thermodynamics::equilibrium_thermo`).
//! Rate constants never feed into Kc, so the catalyst can not shift the equilibrium.
//!
//! ## Integration
//! Single explicit Euler step per [`EquilibriumEngine::step`] call, concentrations
//! clamped at zero. There is no step size control: the caller picks `dt` small
//! compared to the fastest rate constant.
//!
//! ## Permissive inputs
//! Nothing here returns an error. Unknown species are ignored on write and read as 0.0;
//! non-finite or non-positive temperature, pressure, volume and time step are ignored
//! with a warning so that T, P, V stay positive and time never runs backwards.
use crate::Kinetics::catalyst_library::acceleration_factor;
use crate::Kinetics::reaction_model::{ReactionModel, Species};
use crate::Kinetics::simulation_history::{HistoryRecord, SimulationHistory};
use crate::Thermodynamics::equilibrium_thermo::{
    R, equilibrium_constant, gibbs_energy, reaction_quotient,
};
use log::{debug, info, warn};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// default relative tolerance |Q - Kc|/Kc for the equilibrium test
pub const EQUILIBRIUM_TOLERANCE: f64 = 0.05;
/// lowest activation energy reported after catalytic reduction, kJ/mol
pub const MIN_ACTIVATION_ENERGY: f64 = 5.0;

/// concentrations keyed by species formula; key set and order are fixed when created
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Concentrations {
    entries: Vec<(String, f64)>,
}

impl Concentrations {
    /// initial concentrations of a reaction, reactants first
    pub fn initial(reaction: &ReactionModel) -> Self {
        Self {
            entries: reaction
                .all_species()
                .map(|s| (s.formula.clone(), s.initial_concentration))
                .collect(),
        }
    }

    pub fn get(&self, formula: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(f, _)| f == formula)
            .map(|(_, c)| *c)
    }

    pub fn contains(&self, formula: &str) -> bool {
        self.entries.iter().any(|(f, _)| f == formula)
    }

    /// sets an existing key, returns false (and changes nothing) for an unknown one
    fn set(&mut self, formula: &str, value: f64) -> bool {
        match self.entries.iter_mut().find(|(f, _)| f == formula) {
            Some((_, c)) => {
                *c = value;
                true
            }
            None => false,
        }
    }

    fn scale(&mut self, factor: f64) {
        for (_, c) in self.entries.iter_mut() {
            *c *= factor;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(f, c)| (f.as_str(), *c))
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, c)| *c).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }
}

impl Serialize for Concentrations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (formula, c) in &self.entries {
            map.serialize_entry(formula, c)?;
        }
        map.end()
    }
}

struct ConcentrationsVisitor;

impl<'de> Visitor<'de> for ConcentrationsVisitor {
    type Value = Concentrations;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map from species formula to concentration")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((formula, c)) = access.next_entry::<String, f64>()? {
            entries.push((formula, c));
        }
        Ok(Concentrations { entries })
    }
}

impl<'de> Deserialize<'de> for Concentrations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ConcentrationsVisitor)
    }
}

/// which way the net reaction currently runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionDirection {
    Equilibrium,
    /// Q < Kc, towards products
    Forward,
    /// Q > Kc, towards reactants
    Reverse,
}

impl fmt::Display for ReactionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReactionDirection::Equilibrium => "equilibrium",
            ReactionDirection::Forward => "forward",
            ReactionDirection::Reverse => "reverse",
        };
        write!(f, "{}", s)
    }
}

/// activation energies before and after catalytic reduction, kJ/mol
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationEnergies {
    pub ea_forward_original: f64,
    pub ea_reverse_original: f64,
    pub ea_forward_reduced: f64,
    pub ea_reverse_reduced: f64,
    pub reduction: f64,
}

/// snapshot of everything the presentation layer shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub temperature: f64,
    pub pressure: f64,
    pub volume: f64,
    pub time: f64,
    pub concentrations: Concentrations,
    #[serde(rename = "Kc")]
    pub kc: f64,
    #[serde(rename = "Q")]
    pub q: f64,
    pub delta_g: f64,
    pub direction: ReactionDirection,
    pub at_equilibrium: bool,
    pub forward_rate: f64,
    pub reverse_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumEngine {
    reaction: Arc<ReactionModel>,
    concentrations: Concentrations,
    /// K
    temperature: f64,
    /// atm, informational only
    pressure: f64,
    /// L
    volume: f64,
    /// catalytic reduction of Ea, kJ/mol, >= 0
    ea_reduction: f64,
    /// s
    time: f64,
    /// kf at the current temperature, None until the first temperature change
    adjusted_kf: Option<f64>,
    /// kr at the current temperature, None until the first temperature change
    adjusted_kr: Option<f64>,
    history: SimulationHistory,
}

fn side_terms<'a>(
    species: &'a [Species],
    concentrations: &'a Concentrations,
) -> impl Iterator<Item = (f64, u32)> + 'a {
    species.iter().map(move |s| {
        (
            concentrations.get(&s.formula).unwrap_or(0.0),
            s.coefficient,
        )
    })
}

fn mass_action(k: f64, species: &[Species], concentrations: &Concentrations) -> f64 {
    side_terms(species, concentrations).fold(k, |rate, (c, nu)| rate * c.max(0.0).powi(nu as i32))
}

fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

impl EquilibriumEngine {
    /// engine at the recommended conditions of the reaction with its initial concentrations
    pub fn new(reaction: Arc<ReactionModel>) -> Self {
        let conditions = reaction.recommended;
        let concentrations = Concentrations::initial(&reaction);
        let history = SimulationHistory::new(&reaction);
        Self {
            reaction,
            concentrations,
            temperature: conditions.temperature,
            pressure: conditions.pressure,
            volume: conditions.volume,
            ea_reduction: 0.0,
            time: 0.0,
            adjusted_kf: None,
            adjusted_kr: None,
            history,
        }
    }

    pub fn from_model(reaction: ReactionModel) -> Self {
        Self::new(Arc::new(reaction))
    }

    /////////////////////////////////ACCESSORS///////////////////////////////////////////
    pub fn reaction(&self) -> &Arc<ReactionModel> {
        &self.reaction
    }

    pub fn concentrations(&self) -> &Concentrations {
        &self.concentrations
    }

    /// concentration of a species, 0.0 for a formula outside the reaction
    pub fn concentration(&self, formula: &str) -> f64 {
        self.concentrations.get(formula).unwrap_or(0.0)
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn catalyst_reduction(&self) -> f64 {
        self.ea_reduction
    }

    pub fn elapsed_time(&self) -> f64 {
        self.time
    }

    /// rolling temperature-adjusted (kf, kr), None before any temperature change
    pub fn adjusted_rate_constants(&self) -> (Option<f64>, Option<f64>) {
        (self.adjusted_kf, self.adjusted_kr)
    }

    pub fn history(&self) -> &SimulationHistory {
        &self.history
    }

    /// total amount of substance in the reactor, mol
    pub fn total_moles(&self) -> f64 {
        self.concentrations.sum() * self.volume
    }

    /////////////////////////////////CONDITIONS///////////////////////////////////////////
    /// Rescales both rolling rate constants from the previous temperature to `t_new`
    /// with each direction's own activation energy, then stores the new temperature.
    pub fn set_temperature(&mut self, t_new: f64) {
        if !is_positive(t_new) {
            warn!("ignoring invalid temperature {} K", t_new);
            return;
        }
        let t_old = self.temperature;
        let kf_old = self.adjusted_kf.unwrap_or(self.reaction.k_forward);
        let kr_old = self.adjusted_kr.unwrap_or(self.reaction.k_reverse);
        let inv_dt = 1.0 / t_old - 1.0 / t_new;
        let factor_forward = f64::exp((self.reaction.ea_forward * 1000.0 / R) * inv_dt);
        let factor_reverse = f64::exp((self.reaction.ea_reverse * 1000.0 / R) * inv_dt);
        self.adjusted_kf = Some(kf_old * factor_forward);
        self.adjusted_kr = Some(kr_old * factor_reverse);
        self.temperature = t_new;
        debug!(
            "T {} -> {} K: kf {:e} -> {:e}, kr {:e} -> {:e}",
            t_old,
            t_new,
            kf_old,
            kf_old * factor_forward,
            kr_old,
            kr_old * factor_reverse
        );
    }

    /// stored for display; pressure does not enter any rate or equilibrium expression
    pub fn set_pressure(&mut self, pressure: f64) {
        if !is_positive(pressure) {
            warn!("ignoring invalid pressure {} atm", pressure);
            return;
        }
        self.pressure = pressure;
    }

    /// changes reactor volume at constant amount of substance: c *= V_old/V_new
    pub fn set_volume(&mut self, volume: f64) {
        if !is_positive(volume) {
            warn!("ignoring invalid volume {} L", volume);
            return;
        }
        self.concentrations.scale(self.volume / volume);
        self.volume = volume;
    }

    /// catalytic Ea reduction (kJ/mol) applied to both directions; negative input means 0
    pub fn set_catalyst(&mut self, ea_reduction: f64) {
        self.ea_reduction = ea_reduction.max(0.0);
    }

    /// sets max(value, 0); a formula outside the reaction is silently ignored
    pub fn set_concentration(&mut self, formula: &str, value: f64) {
        if !self.concentrations.set(formula, value.max(0.0)) {
            debug!("set_concentration: '{}' is not part of the reaction", formula);
        }
    }

    /////////////////////////////////KINETICS///////////////////////////////////////////
    pub fn catalyst_acceleration_factor(&self) -> f64 {
        acceleration_factor(self.ea_reduction, self.temperature)
    }

    /// kf at the current temperature times the catalyst factor
    pub fn forward_rate_constant(&self) -> f64 {
        self.adjusted_kf.unwrap_or(self.reaction.k_forward) * self.catalyst_acceleration_factor()
    }

    /// kr at the current temperature times the same catalyst factor as kf
    pub fn reverse_rate_constant(&self) -> f64 {
        self.adjusted_kr.unwrap_or(self.reaction.k_reverse) * self.catalyst_acceleration_factor()
    }

    pub fn effective_activation_energies(&self) -> ActivationEnergies {
        let r = &self.reaction;
        ActivationEnergies {
            ea_forward_original: r.ea_forward,
            ea_reverse_original: r.ea_reverse,
            ea_forward_reduced: (r.ea_forward - self.ea_reduction).max(MIN_ACTIVATION_ENERGY),
            ea_reverse_reduced: (r.ea_reverse - self.ea_reduction).max(MIN_ACTIVATION_ENERGY),
            reduction: self.ea_reduction,
        }
    }

    /// kf_eff * П[reactant]^nu, concentrations floored at 0
    pub fn forward_rate(&self) -> f64 {
        mass_action(
            self.forward_rate_constant(),
            &self.reaction.reactants,
            &self.concentrations,
        )
    }

    /// kr_eff * П[product]^nu, concentrations floored at 0
    pub fn reverse_rate(&self) -> f64 {
        mass_action(
            self.reverse_rate_constant(),
            &self.reaction.products,
            &self.concentrations,
        )
    }

    /////////////////////////////////THERMODYNAMICS///////////////////////////////////////////
    /// Kc = exp(-(dH - T*dS)/(R*T)) at the current temperature
    pub fn equilibrium_constant(&self) -> f64 {
        equilibrium_constant(self.reaction.delta_h, self.reaction.delta_s, self.temperature)
    }

    pub fn reaction_quotient(&self) -> f64 {
        reaction_quotient(
            side_terms(&self.reaction.reactants, &self.concentrations),
            side_terms(&self.reaction.products, &self.concentrations),
        )
    }

    /// dG = dG0 + R*T*ln(Q), kJ/mol
    pub fn delta_g(&self) -> f64 {
        gibbs_energy(
            self.reaction.delta_h,
            self.reaction.delta_s,
            self.temperature,
            self.reaction_quotient(),
        )
    }

    fn relative_deviation(&self) -> f64 {
        let kc = self.equilibrium_constant();
        (self.reaction_quotient() - kc).abs() / kc
    }

    /// |Q - Kc|/Kc < EQUILIBRIUM_TOLERANCE
    pub fn is_at_equilibrium(&self) -> bool {
        self.is_at_equilibrium_within(EQUILIBRIUM_TOLERANCE)
    }

    pub fn is_at_equilibrium_within(&self, tolerance: f64) -> bool {
        self.relative_deviation() < tolerance
    }

    pub fn reaction_direction(&self) -> ReactionDirection {
        self.reaction_direction_within(EQUILIBRIUM_TOLERANCE)
    }

    /// net direction, with `tolerance` deciding when Q counts as equal to Kc
    pub fn reaction_direction_within(&self, tolerance: f64) -> ReactionDirection {
        if self.is_at_equilibrium_within(tolerance) {
            ReactionDirection::Equilibrium
        } else if self.reaction_quotient() < self.equilibrium_constant() {
            ReactionDirection::Forward
        } else {
            ReactionDirection::Reverse
        }
    }

    /////////////////////////////////TIME INTEGRATION///////////////////////////////////////////
    /// one explicit Euler step of length `dt` seconds
    pub fn step(&mut self, dt: f64) {
        if !is_positive(dt) {
            warn!("ignoring invalid time step {}", dt);
            return;
        }
        let rate_forward = self.forward_rate();
        let rate_reverse = self.reverse_rate();
        let net_rate = rate_forward - rate_reverse;

        let reaction = Arc::clone(&self.reaction);
        for species in &reaction.reactants {
            let c = self.concentration(&species.formula);
            let change = -net_rate * species.coefficient as f64 * dt;
            self.concentrations
                .set(&species.formula, (c + change).max(0.0));
        }
        for species in &reaction.products {
            let c = self.concentration(&species.formula);
            let change = net_rate * species.coefficient as f64 * dt;
            self.concentrations
                .set(&species.formula, (c + change).max(0.0));
        }
        self.time += dt;
        self.record_history(rate_forward, rate_reverse);
    }

    /// `n_steps` steps of length `dt`; returns how many were performed
    pub fn run(&mut self, dt: f64, n_steps: usize) -> usize {
        if !is_positive(dt) {
            warn!("ignoring run with invalid time step {}", dt);
            return 0;
        }
        for _ in 0..n_steps {
            self.step(dt);
        }
        n_steps
    }

    fn record_history(&mut self, rate_forward: f64, rate_reverse: f64) {
        let record = HistoryRecord {
            time: self.time,
            concentrations: self.concentrations.values(),
            forward_rate: rate_forward,
            reverse_rate: rate_reverse,
            q: self.reaction_quotient(),
            delta_g: self.delta_g(),
        };
        self.history.push(record);
    }

    /// back to the freshly constructed state of the same reaction
    pub fn reset(&mut self) {
        *self = Self::new(Arc::clone(&self.reaction));
        info!("simulation of '{}' reset", self.reaction.id);
    }

    pub fn system_info(&self) -> SystemInfo {
        self.system_info_within(EQUILIBRIUM_TOLERANCE)
    }

    /// snapshot whose direction and equilibrium flag use `tolerance`
    pub fn system_info_within(&self, tolerance: f64) -> SystemInfo {
        SystemInfo {
            temperature: self.temperature,
            pressure: self.pressure,
            volume: self.volume,
            time: self.time,
            concentrations: self.concentrations.clone(),
            kc: self.equilibrium_constant(),
            q: self.reaction_quotient(),
            delta_g: self.delta_g(),
            direction: self.reaction_direction_within(tolerance),
            at_equilibrium: self.is_at_equilibrium_within(tolerance),
            forward_rate: self.forward_rate(),
            reverse_rate: self.reverse_rate(),
        }
    }
}
