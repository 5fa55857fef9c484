//! # Export
//!
//! Everything that leaves the engine as a file or as a table on the terminal:
//! - CSV of the recorded history
//!   (`Time(s),<formula>(mol/L)...,Forward Rate,Reverse Rate,Q,DeltaG(kJ/mol)`,
//!   time with 3 decimals, every other column with 6)
//! - JSON session config `{reaction, temperature, pressure, volume, concentrations}`
//!   that can be read back and applied to an engine
//! - prettytable summaries of the engine state, rate constants and catalogs
use crate::Kinetics::catalyst_library::{Catalyst, get_catalyst_by_id};
use crate::Kinetics::equilibrium_engine::{Concentrations, EquilibriumEngine};
use crate::Kinetics::reaction_library::get_reaction_by_id;
use crate::Kinetics::reaction_model::ReactionModel;
use crate::Kinetics::simulation_history::SimulationHistory;
use log::{info, warn};
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown reaction '{0}'")]
    UnknownReaction(String),
    #[error("config is for reaction '{config}', engine runs '{engine}'")]
    ReactionMismatch { config: String, engine: String },
}

/////////////////////////////////CSV///////////////////////////////////////////
pub fn csv_header(history: &SimulationHistory) -> String {
    let mut header = String::from("Time(s)");
    for formula in history.species() {
        header.push_str(&format!(",{}(mol/L)", formula));
    }
    header.push_str(",Forward Rate,Reverse Rate,Q,DeltaG(kJ/mol)");
    header
}

/// whole history as CSV text, one line per record, newline terminated
pub fn history_to_csv(history: &SimulationHistory) -> String {
    let mut csv = csv_header(history);
    csv.push('\n');
    for record in history.records() {
        csv.push_str(&format!("{:.3}", record.time));
        for i in 0..history.species().len() {
            csv.push_str(&format!(",{:.6}", record.concentration(i)));
        }
        csv.push_str(&format!(
            ",{:.6},{:.6},{:.6},{:.6}\n",
            record.forward_rate, record.reverse_rate, record.q, record.delta_g
        ));
    }
    csv
}

pub fn write_csv<P: AsRef<Path>>(history: &SimulationHistory, path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    if history.is_empty() {
        warn!("history is empty, '{}' will contain only the header", path.display());
    }
    fs::write(path, history_to_csv(history))?;
    info!("{} history records written to '{}'", history.len(), path.display());
    Ok(())
}

/////////////////////////////////SESSION CONFIG///////////////////////////////////////////
/// conditions and composition of a session, enough to continue it later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// reaction id in the built-in catalog
    pub reaction: String,
    pub temperature: f64,
    pub pressure: f64,
    pub volume: f64,
    pub concentrations: Concentrations,
    /// catalytic Ea reduction, kJ/mol; absent in older files
    #[serde(default)]
    pub catalyst: f64,
}

impl SessionConfig {
    pub fn from_engine(engine: &EquilibriumEngine) -> Self {
        Self {
            reaction: engine.reaction().id.clone(),
            temperature: engine.temperature(),
            pressure: engine.pressure(),
            volume: engine.volume(),
            concentrations: engine.concentrations().clone(),
            catalyst: engine.catalyst_reduction(),
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        fs::write(path.as_ref(), self.to_json()?)?;
        info!("session config saved to '{}'", path.as_ref().display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Sets conditions and composition on an engine running the same reaction.
    /// Temperature goes through the Arrhenius rescaling; concentrations are written
    /// after the volume so the stored values are restored exactly.
    pub fn apply_to(&self, engine: &mut EquilibriumEngine) -> Result<(), ExportError> {
        if engine.reaction().id != self.reaction {
            return Err(ExportError::ReactionMismatch {
                config: self.reaction.clone(),
                engine: engine.reaction().id.clone(),
            });
        }
        engine.set_temperature(self.temperature);
        engine.set_pressure(self.pressure);
        engine.set_volume(self.volume);
        engine.set_catalyst(self.catalyst);
        for (formula, c) in self.concentrations.iter() {
            engine.set_concentration(formula, c);
        }
        Ok(())
    }

    /// fresh engine for the configured built-in reaction with the config applied
    pub fn restore_engine(&self) -> Result<EquilibriumEngine, ExportError> {
        let reaction = get_reaction_by_id(&self.reaction)
            .ok_or_else(|| ExportError::UnknownReaction(self.reaction.clone()))?;
        let mut engine = EquilibriumEngine::from_model(reaction);
        self.apply_to(&mut engine)?;
        Ok(engine)
    }
}

/////////////////////////////////TABLES///////////////////////////////////////////
/// base and effective rate constants, activation energies and catalyst factor
pub fn technical_data_table(engine: &EquilibriumEngine) -> Table {
    let reaction = engine.reaction();
    let ea = engine.effective_activation_energies();
    let mut table = Table::new();
    table.add_row(row!["Parameter", "Value", "Units"]);
    table.add_row(row!["kf (base)", format!("{:.4e}", reaction.k_forward), "-"]);
    table.add_row(row!["kr (base)", format!("{:.4e}", reaction.k_reverse), "-"]);
    table.add_row(row!["kf (effective)", format!("{:.4e}", engine.forward_rate_constant()), "-"]);
    table.add_row(row!["kr (effective)", format!("{:.4e}", engine.reverse_rate_constant()), "-"]);
    table.add_row(row!["Ea forward", format!("{:.1}", ea.ea_forward_original), "kJ/mol"]);
    table.add_row(row!["Ea reverse", format!("{:.1}", ea.ea_reverse_original), "kJ/mol"]);
    table.add_row(row!["Ea forward (catalysed)", format!("{:.1}", ea.ea_forward_reduced), "kJ/mol"]);
    table.add_row(row!["Ea reverse (catalysed)", format!("{:.1}", ea.ea_reverse_reduced), "kJ/mol"]);
    table.add_row(row![
        "Catalyst factor",
        format!("{:.2}x", engine.catalyst_acceleration_factor()),
        "-"
    ]);
    table
}

/// conditions, concentrations and equilibrium diagnostics; `tolerance` decides
/// when the direction reads "equilibrium"
pub fn state_table(engine: &EquilibriumEngine, tolerance: f64) -> Table {
    let info = engine.system_info_within(tolerance);
    let mut table = Table::new();
    table.add_row(row!["Quantity", "Value", "Units"]);
    table.add_row(row!["Time", format!("{:.2}", info.time), "s"]);
    table.add_row(row!["Temperature", format!("{:.1}", info.temperature), "K"]);
    table.add_row(row!["Pressure", format!("{:.1}", info.pressure), "atm"]);
    table.add_row(row!["Volume", format!("{:.2}", info.volume), "L"]);
    for (formula, c) in info.concentrations.iter() {
        table.add_row(row![format!("[{}]", formula), format!("{:.6}", c), "mol/L"]);
    }
    table.add_row(row!["Kc", format!("{:.4e}", info.kc), "-"]);
    table.add_row(row!["Q", format!("{:.4e}", info.q), "-"]);
    table.add_row(row!["ΔG", format!("{:.2}", info.delta_g), "kJ/mol"]);
    table.add_row(row!["Forward rate", format!("{:.6e}", info.forward_rate), "mol/(L·s)"]);
    table.add_row(row!["Reverse rate", format!("{:.6e}", info.reverse_rate), "mol/(L·s)"]);
    table.add_row(row!["Direction", info.direction, "-"]);
    table
}

/// what the reaction is, its thermodynamics and the catalyst to try with it
pub fn reaction_info_table(reaction: &ReactionModel) -> Table {
    let catalyst = get_catalyst_by_id(&reaction.recommended_catalyst);
    let mut table = Table::new();
    table.add_row(row!["Parameter", "Value", "Units"]);
    table.add_row(row!["Name", reaction.name, "-"]);
    table.add_row(row!["Equation", reaction.equation(), "-"]);
    table.add_row(row!["Description", reaction.description, "-"]);
    table.add_row(row!["Difficulty", reaction.difficulty, "-"]);
    table.add_row(row!["ΔH°", format!("{:.1}", reaction.delta_h), "kJ/mol"]);
    table.add_row(row!["ΔS°", format!("{:.1}", reaction.delta_s), "J/(mol·K)"]);
    table.add_row(row!["Ea forward", format!("{:.1}", reaction.ea_forward), "kJ/mol"]);
    table.add_row(row!["Ea reverse", format!("{:.1}", reaction.ea_reverse), "kJ/mol"]);
    table.add_row(row!["Δn", reaction.delta_n(), "mol"]);
    table.add_row(row!["Recommended catalyst", catalyst.name, "-"]);
    table.add_row(row!["Why", reaction.catalyst_reason, "-"]);
    if !reaction.catalyst_alternative.is_empty() {
        table.add_row(row!["Alternative", reaction.catalyst_alternative, "-"]);
    }
    table
}

pub fn reactions_table(reactions: &[ReactionModel]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["#", "Id", "Equation", "Name", "T, K"]);
    for (i, r) in reactions.iter().enumerate() {
        table.add_row(row![
            i + 1,
            r.id,
            r.equation(),
            r.name,
            format!("{:.0}", r.recommended.temperature)
        ]);
    }
    table
}

pub fn catalysts_table(catalysts: &[Catalyst]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["#", "Id", "Name", "ΔEa, kJ/mol", "Description", "Applications"]);
    for (i, c) in catalysts.iter().enumerate() {
        table.add_row(row![
            i + 1,
            c.id,
            c.name,
            format!("{:.0}", c.ea_reduction),
            c.description,
            c.applications
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::catalyst_library::get_all_catalysts;
    use crate::Kinetics::equilibrium_engine::EQUILIBRIUM_TOLERANCE;
    use crate::Kinetics::reaction_library::get_all_reactions;
    use approx::assert_relative_eq;
    use tempfile::NamedTempFile;

    fn n2o4_engine() -> EquilibriumEngine {
        EquilibriumEngine::from_model(get_reaction_by_id("n2o4_no2").unwrap())
    }

    #[test]
    fn test_csv_layout() {
        let mut engine = n2o4_engine();
        engine.run(0.01, 3);
        let csv = history_to_csv(engine.history());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Time(s),N₂O₄(mol/L),NO₂(mol/L),Forward Rate,Reverse Rate,Q,DeltaG(kJ/mol)"
        );
        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[0], "0.010");
        assert!(fields[1..].iter().all(|f| f.split('.').nth(1).map(str::len) == Some(6)));
        let last: Vec<&str> = lines[3].split(',').collect();
        assert_eq!(last[0], "0.030");
        assert!(csv.ends_with('\n'));
    }

    #[test]
    fn test_csv_empty_history_has_only_header() {
        let engine = n2o4_engine();
        let csv = history_to_csv(engine.history());
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_write_csv_to_file() {
        let mut engine = n2o4_engine();
        engine.run(0.01, 10);
        let file = NamedTempFile::new().unwrap();
        write_csv(engine.history(), file.path()).unwrap();
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content.lines().count(), 11);
    }

    #[test]
    fn test_session_config_json_keys() {
        let mut engine = n2o4_engine();
        engine.set_volume(5.0);
        let value: serde_json::Value =
            serde_json::from_str(&SessionConfig::from_engine(&engine).to_json().unwrap()).unwrap();
        assert_eq!(value["reaction"], "n2o4_no2");
        assert_eq!(value["volume"], 5.0);
        assert_eq!(value["temperature"], 298.0);
        assert_relative_eq!(value["concentrations"]["N₂O₄"].as_f64().unwrap(), 4.0);
    }

    #[test]
    fn test_session_config_file_restores_engine() {
        let mut engine = EquilibriumEngine::from_model(get_reaction_by_id("pcl5_pcl3").unwrap());
        engine.set_temperature(500.0);
        engine.set_pressure(2.0);
        engine.set_volume(4.0);
        engine.set_catalyst(5.0);
        engine.run(0.01, 40);

        let file = NamedTempFile::new().unwrap();
        SessionConfig::from_engine(&engine).save(file.path()).unwrap();
        let restored = SessionConfig::load(file.path()).unwrap().restore_engine().unwrap();

        assert_eq!(restored.temperature(), 500.0);
        assert_eq!(restored.pressure(), 2.0);
        assert_eq!(restored.volume(), 4.0);
        assert_eq!(restored.catalyst_reduction(), 5.0);
        for ((f1, c1), (f2, c2)) in engine.concentrations().iter().zip(restored.concentrations().iter()) {
            assert_eq!(f1, f2);
            assert_relative_eq!(c1, c2, max_relative = 1e-12);
        }
        assert_relative_eq!(
            restored.forward_rate_constant(),
            engine.forward_rate_constant(),
            max_relative = 1e-9
        );
        // time and history are not part of the config
        assert_eq!(restored.elapsed_time(), 0.0);
        assert!(restored.history().is_empty());
    }

    #[test]
    fn test_session_config_errors() {
        let json = r#"{"reaction": "perpetuum_mobile", "temperature": 300.0, "pressure": 1.0,
                       "volume": 1.0, "concentrations": {"A": 1.0}}"#;
        let config = SessionConfig::from_json(json).unwrap();
        assert_eq!(config.catalyst, 0.0);
        assert!(matches!(config.restore_engine(), Err(ExportError::UnknownReaction(_))));

        let mut engine = n2o4_engine();
        assert!(matches!(
            config.apply_to(&mut engine),
            Err(ExportError::ReactionMismatch { .. })
        ));
        assert!(matches!(SessionConfig::from_json("[1, 2"), Err(ExportError::Json(_))));
        assert!(matches!(
            SessionConfig::load("/no/such/dir/config.json"),
            Err(ExportError::Io(_))
        ));
    }

    #[test]
    fn test_tables() {
        let mut engine = n2o4_engine();
        engine.set_catalyst(35.0);
        let technical = technical_data_table(&engine);
        assert_eq!(technical.len(), 10);
        assert!(technical.to_string().contains("kJ/mol"));
        // header + T, P, V, time + 2 species + Kc, Q, dG, two rates, direction
        assert_eq!(state_table(&engine, EQUILIBRIUM_TOLERANCE).len(), 13);
        assert_eq!(reactions_table(&get_all_reactions()).len(), 7);
        let catalysts = catalysts_table(&get_all_catalysts()).to_string();
        assert_eq!(catalysts_table(&get_all_catalysts()).len(), 7);
        assert!(catalysts.contains("Haber-Bosch process catalyst"));
        assert!(catalysts.contains("Ammonia synthesis"));
    }

    #[test]
    fn test_state_table_direction_follows_tolerance() {
        let mut engine = n2o4_engine();
        let kc = engine.equilibrium_constant();
        engine.set_concentration("N₂O₄", 1.0);
        engine.set_concentration("NO₂", (1.08 * kc).sqrt());
        let strict = state_table(&engine, EQUILIBRIUM_TOLERANCE).to_string();
        let loose = state_table(&engine, 0.1).to_string();
        assert!(strict.contains("reverse"));
        assert!(!strict.contains("equilibrium"));
        assert!(loose.contains("equilibrium"));
        assert!(!loose.contains("reverse"));
    }

    #[test]
    fn test_reaction_info_table() {
        let haber = get_reaction_by_id("haber_bosch").unwrap();
        let table = reaction_info_table(&haber);
        // header + name, equation, description, difficulty, dH, dS, two Ea, dn,
        // catalyst, reason, alternative
        assert_eq!(table.len(), 13);
        let text = table.to_string();
        assert!(text.contains(&haber.description));
        assert!(text.contains("hard"));
        assert!(text.contains("Promoted iron (Fe)"));
        assert!(text.contains("Nitrogenase"));
        assert!(text.contains("J/(mol·K)"));

        // N2O4 <=> 2NO2 gains one mole of gas
        let n2o4 = get_reaction_by_id("n2o4_no2").unwrap();
        assert_eq!(n2o4.delta_n(), 1);
        assert!(reaction_info_table(&n2o4).to_string().contains(&n2o4.name));

        for reaction in get_all_reactions() {
            let rows = reaction_info_table(&reaction).len();
            let expected = if reaction.catalyst_alternative.is_empty() { 12 } else { 13 };
            assert_eq!(rows, expected, "{}", reaction.id);
        }
    }
}
