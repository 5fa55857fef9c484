//! Terminal front end of one simulation session: holds the engine, the reaction
//! catalog and the settings, and plays the role of the animation loop by running
//! batches of `steps_per_run` steps of the effective time step.
use super::cli_main::{get_user_input, prompt, prompt_parse};
use crate::Kinetics::catalyst_library::{get_all_catalysts, get_catalyst_by_id};
use crate::Kinetics::equilibrium_engine::{EquilibriumEngine, ReactionDirection, SystemInfo};
use crate::Kinetics::reaction_library::{get_all_reactions, load_reactions_from_file};
use crate::Kinetics::reaction_model::ReactionModel;
use crate::Utils::export::{
    ExportError, SessionConfig, catalysts_table, state_table, technical_data_table, write_csv,
};
use crate::settings::SettingsManager;
use log::{error, info, warn};
use std::io::{self, Write};
use std::sync::Arc;

pub struct SimulationSession {
    catalog: Vec<Arc<ReactionModel>>,
    engine: EquilibriumEngine,
    settings: SettingsManager,
}

impl SimulationSession {
    /// built-in catalog plus the user catalog named in the settings, first reaction selected
    pub fn new(settings: SettingsManager) -> Self {
        let mut reactions = get_all_reactions();
        if let Some(path) = settings.settings().user_catalog.clone() {
            match load_reactions_from_file(&path) {
                Ok(user) => reactions.extend(user),
                Err(e) => warn!("user catalog '{}' skipped: {}", path, e),
            }
        }
        let catalog: Vec<Arc<ReactionModel>> = reactions.into_iter().map(Arc::new).collect();
        let engine = EquilibriumEngine::new(Arc::clone(&catalog[0]));
        Self {
            catalog,
            engine,
            settings,
        }
    }

    pub fn catalog(&self) -> Vec<ReactionModel> {
        self.catalog.iter().map(|r| r.as_ref().clone()).collect()
    }

    pub fn engine(&self) -> &EquilibriumEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EquilibriumEngine {
        &mut self.engine
    }

    pub fn settings(&self) -> &SettingsManager {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsManager {
        &mut self.settings
    }

    /// starts a fresh engine on catalog entry `index`
    pub fn select_reaction(&mut self, index: usize) -> Result<(), String> {
        let reaction = self
            .catalog
            .get(index)
            .ok_or_else(|| format!("no reaction number {}", index + 1))?;
        self.engine = EquilibriumEngine::new(Arc::clone(reaction));
        info!("reaction '{}' selected", reaction.id);
        Ok(())
    }

    /// one batch of `steps_per_run` steps of the effective dt
    pub fn run_batch(&mut self) -> usize {
        let s = self.settings.settings();
        let (dt, steps) = (s.effective_dt(), s.steps_per_run);
        self.engine.run(dt, steps)
    }

    fn tolerance(&self) -> f64 {
        self.settings.settings().equilibrium_tolerance
    }

    /// equilibrium test with the tolerance from the settings
    pub fn at_equilibrium(&self) -> bool {
        self.engine.is_at_equilibrium_within(self.tolerance())
    }

    /// engine snapshot whose direction agrees with [`Self::at_equilibrium`]
    pub fn system_info(&self) -> SystemInfo {
        self.engine.system_info_within(self.tolerance())
    }

    /// sets one species by formula; formulas outside the current reaction are refused
    pub fn set_concentration(&mut self, formula: &str, value: f64) -> Result<(), String> {
        let reaction = Arc::clone(self.engine.reaction());
        let species = reaction
            .find_species(formula)
            .ok_or_else(|| format!("'{}' is not part of {}", formula, reaction.equation()))?;
        if !value.is_finite() {
            return Err(format!("invalid concentration {}", value));
        }
        self.engine.set_concentration(&species.formula, value);
        info!(
            "[{}] = {:.4} mol/L (coefficient {})",
            species.formula,
            self.engine.concentration(&species.formula),
            species.coefficient
        );
        Ok(())
    }

    /// replaces the engine by one restored from a session config; built-in or user catalog
    pub fn load_config(&mut self, config: &SessionConfig) -> Result<(), ExportError> {
        let reaction = self
            .catalog
            .iter()
            .find(|r| r.id == config.reaction)
            .ok_or_else(|| ExportError::UnknownReaction(config.reaction.clone()))?;
        let mut engine = EquilibriumEngine::new(Arc::clone(reaction));
        config.apply_to(&mut engine)?;
        self.engine = engine;
        Ok(())
    }
}

pub fn simulation_menu(session: &mut SimulationSession) {
    loop {
        println!("\n=== Simulation: {} ===", session.engine().reaction().equation());
        println!("1. Show state");
        println!("2. Run {} steps", session.settings().settings().steps_per_run);
        println!("3. Set temperature");
        println!("4. Set pressure");
        println!("5. Set volume");
        println!("6. Set concentration");
        println!("7. Choose catalyst");
        println!("8. Technical data");
        println!("9. Export CSV");
        println!("10. Export config");
        println!("11. Load config");
        println!("12. Reset");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        io::stdout().flush().ok();

        let choice = get_user_input();
        match choice.trim() {
            "1" => {
                let tolerance = session.settings().settings().equilibrium_tolerance;
                state_table(session.engine(), tolerance).printstd();
            }
            "2" => run_and_report(session),
            "3" => {
                if let Some(t) = prompt_parse::<f64>("Temperature, K: ") {
                    session.engine_mut().set_temperature(t);
                }
            }
            "4" => {
                if let Some(p) = prompt_parse::<f64>("Pressure, atm: ") {
                    session.engine_mut().set_pressure(p);
                }
            }
            "5" => {
                if let Some(v) = prompt_parse::<f64>("Volume, L: ") {
                    session.engine_mut().set_volume(v);
                }
            }
            "6" => set_concentration(session),
            "7" => choose_catalyst(session),
            "8" => {
                technical_data_table(session.engine()).printstd();
            }
            "9" => {
                let path = prompt("CSV file [simulation_data.csv]: ");
                let path = if path.is_empty() { "simulation_data.csv".to_string() } else { path };
                if let Err(e) = write_csv(session.engine().history(), &path) {
                    error!("{}", e);
                }
            }
            "10" => {
                let path = prompt("Config file [config.json]: ");
                let path = if path.is_empty() { "config.json".to_string() } else { path };
                if let Err(e) = SessionConfig::from_engine(session.engine()).save(&path) {
                    error!("{}", e);
                }
            }
            "11" => {
                let path = prompt("Config file: ");
                let result = SessionConfig::load(&path).and_then(|c| session.load_config(&c));
                match result {
                    Ok(()) => println!("Loaded {}", session.engine().reaction().name),
                    Err(e) => error!("{}", e),
                }
            }
            "12" => session.engine_mut().reset(),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn run_and_report(session: &mut SimulationSession) {
    let was_at_equilibrium = session.at_equilibrium();
    let done = session.run_batch();
    let info = session.system_info();
    println!(
        "{} steps, t = {:.2} s, Q = {:.4e}, Kc = {:.4e}, ΔG = {:.2} kJ/mol",
        done, info.time, info.q, info.kc, info.delta_g
    );
    match (was_at_equilibrium, info.direction) {
        (false, ReactionDirection::Equilibrium) => {
            println!("\x1b[32mEquilibrium reached\x1b[0m")
        }
        (_, ReactionDirection::Equilibrium) => println!("At equilibrium"),
        (_, ReactionDirection::Forward) => println!("Net reaction runs forward (Q < Kc)"),
        (_, ReactionDirection::Reverse) => println!("Net reaction runs in reverse (Q > Kc)"),
    }
}

fn set_concentration(session: &mut SimulationSession) {
    let formulas = session.engine().reaction().formulas();
    for (i, f) in formulas.iter().enumerate() {
        println!("{}. {} ({:.4} mol/L)", i + 1, f, session.engine().concentration(f));
    }
    let Some(i) = prompt_parse::<usize>("Species number: ") else {
        return;
    };
    let Some(formula) = i.checked_sub(1).and_then(|i| formulas.get(i)) else {
        println!("Invalid number.");
        return;
    };
    if let Some(c) = prompt_parse::<f64>("Concentration, mol/L: ") {
        if let Err(e) = session.set_concentration(formula, c) {
            println!("{}", e);
        }
    }
}

fn choose_catalyst(session: &mut SimulationSession) {
    let reaction = Arc::clone(session.engine().reaction());
    let catalysts = get_all_catalysts();
    catalysts_table(&catalysts).printstd();
    let recommended = get_catalyst_by_id(&reaction.recommended_catalyst);
    println!("Recommended: {}. {}", recommended.name, reaction.catalyst_reason);
    if !reaction.catalyst_alternative.is_empty() {
        println!("Alternative: {}", reaction.catalyst_alternative);
    }
    let Some(i) = prompt_parse::<usize>("Catalyst number: ") else {
        return;
    };
    match i.checked_sub(1).and_then(|i| catalysts.get(i)) {
        Some(catalyst) => {
            session.engine_mut().set_catalyst(catalyst.ea_reduction);
            println!(
                "{}: rates x{:.2}",
                catalyst.name,
                session.engine().catalyst_acceleration_factor()
            );
        }
        None => println!("Invalid number."),
    }
}
