//! # Simulation History
//!
//! Append-only time series written by the engine, one record per completed step, in
//! time order. Consumers (charts, CSV export) read it through a shared reference or a
//! cloned snapshot and never iterate it while the engine is stepping.
//!
//! Concentration vectors inside each record follow the species order of the reaction
//! (reactants first, then products), which is also the column order of exports.
use crate::Kinetics::reaction_model::ReactionModel;
use serde::{Deserialize, Serialize};

/// one completed integration step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// elapsed time after the step, s
    pub time: f64,
    /// concentrations after the step, mol/L, in species order
    pub concentrations: Vec<f64>,
    /// forward rate before the update, mol/(L·s)
    pub forward_rate: f64,
    /// reverse rate before the update, mol/(L·s)
    pub reverse_rate: f64,
    /// reaction quotient after the update
    #[serde(rename = "Q")]
    pub q: f64,
    /// Gibbs energy of reaction after the update, kJ/mol
    pub delta_g: f64,
}

impl HistoryRecord {
    /// concentration in column `i`; NaN when the record has no such column
    pub fn concentration(&self, i: usize) -> f64 {
        self.concentrations.get(i).copied().unwrap_or(f64::NAN)
    }
}

/// which quantity a chart shows against time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Concentration,
    Rate,
    Energy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub color: String,
    pub values: Vec<f64>,
}

/// data needed to draw one chart: shared time axis plus one or more series
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub x_label: String,
    pub y_label: String,
    pub time: Vec<f64>,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationHistory {
    species: Vec<String>,
    colors: Vec<String>,
    records: Vec<HistoryRecord>,
}

impl SimulationHistory {
    pub fn new(reaction: &ReactionModel) -> Self {
        Self {
            species: reaction.formulas(),
            colors: reaction
                .all_species()
                .map(|s| s.display_color.clone())
                .collect(),
            records: Vec::new(),
        }
    }

    /// appends a step; records come from the engine only
    pub(crate) fn push(&mut self, record: HistoryRecord) {
        debug_assert_eq!(record.concentrations.len(), self.species.len());
        debug_assert!(
            self.records.last().is_none_or(|last| last.time <= record.time),
            "history must stay ordered in time"
        );
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// species formulas, the column order of every record
    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }

    /// owned copy for readers that must not hold a borrow on the engine
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn times(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.time).collect()
    }

    /// concentration series of one species; `None` for a formula outside the reaction
    pub fn concentration_series(&self, formula: &str) -> Option<Vec<f64>> {
        let i = self.species.iter().position(|s| s == formula)?;
        Some(self.records.iter().map(|r| r.concentration(i)).collect())
    }

    pub fn forward_rates(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.forward_rate).collect()
    }

    pub fn reverse_rates(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.reverse_rate).collect()
    }

    pub fn quotients(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.q).collect()
    }

    pub fn delta_g(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.delta_g).collect()
    }

    /// series for concentration-vs-time, rate-vs-time or dG-vs-time charts
    pub fn chart(&self, kind: ChartKind) -> ChartData {
        let series = match kind {
            ChartKind::Concentration => self
                .species
                .iter()
                .zip(self.colors.iter())
                .enumerate()
                .map(|(i, (formula, color))| ChartSeries {
                    label: formula.clone(),
                    color: color.clone(),
                    values: self.records.iter().map(|r| r.concentration(i)).collect(),
                })
                .collect(),
            ChartKind::Rate => vec![
                ChartSeries {
                    label: "Forward rate".to_string(),
                    color: "#06b6d4".to_string(),
                    values: self.forward_rates(),
                },
                ChartSeries {
                    label: "Reverse rate".to_string(),
                    color: "#f59e0b".to_string(),
                    values: self.reverse_rates(),
                },
            ],
            ChartKind::Energy => vec![ChartSeries {
                label: "ΔG (kJ/mol)".to_string(),
                color: "#8b5cf6".to_string(),
                values: self.delta_g(),
            }],
        };
        let y_label = match kind {
            ChartKind::Concentration => "Concentration (mol/L)",
            ChartKind::Rate => "Rate (mol/L·s)",
            ChartKind::Energy => "ΔG (kJ/mol)",
        };
        ChartData {
            x_label: "Time (s)".to_string(),
            y_label: y_label.to_string(),
            time: self.times(),
            series,
        }
    }
}
