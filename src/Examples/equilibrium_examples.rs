use crate::Kinetics::equilibrium_engine::{EQUILIBRIUM_TOLERANCE, EquilibriumEngine};
use crate::Kinetics::reaction_library::get_reaction_by_id;
use crate::Utils::export::{SessionConfig, state_table, technical_data_table, write_csv};
use log::error;

fn engine_for(id: &str) -> Option<EquilibriumEngine> {
    let engine = get_reaction_by_id(id).map(EquilibriumEngine::from_model);
    if engine.is_none() {
        error!("reaction '{}' is not in the catalog", id);
    }
    engine
}

/// runs until |Q - Kc|/Kc < 5% or `max_steps`; returns the number of steps taken
fn run_to_equilibrium(engine: &mut EquilibriumEngine, dt: f64, max_steps: usize) -> usize {
    for i in 0..max_steps {
        if engine.is_at_equilibrium() {
            return i;
        }
        engine.step(dt);
    }
    max_steps
}

pub fn equilibrium_examples(task: usize) {
    match task {
        0 => {
            // N2O4 <=> 2NO2 starting far from equilibrium
            let Some(mut engine) = engine_for("n2o4_no2") else {
                return;
            };
            println!("{}", engine.reaction().equation());
            state_table(&engine, EQUILIBRIUM_TOLERANCE).printstd();
            let steps = run_to_equilibrium(&mut engine, 0.01, 2000);
            println!("equilibrium after {} steps ({:.2} s)", steps, engine.elapsed_time());
            state_table(&engine, EQUILIBRIUM_TOLERANCE).printstd();
            let kinetic_kc = engine.forward_rate_constant() / engine.reverse_rate_constant();
            println!(
                "kf/kr = {:.4}, thermodynamic Kc = {:.4}",
                kinetic_kc,
                engine.equilibrium_constant()
            );
        }
        1 => {
            // endothermic dissociation: heating shifts towards NO2
            let Some(mut engine) = engine_for("n2o4_no2") else {
                return;
            };
            run_to_equilibrium(&mut engine, 0.01, 2000);
            let no2_cold = engine.concentration("NO₂");
            let kc_cold = engine.equilibrium_constant();
            engine.set_temperature(330.0);
            println!(
                "T 298 -> 330 K: Kc {:.4} -> {:.4}, direction now {}",
                kc_cold,
                engine.equilibrium_constant(),
                engine.reaction_direction()
            );
            run_to_equilibrium(&mut engine, 0.002, 5000);
            println!(
                "[NO₂] {:.4} -> {:.4} mol/L",
                no2_cold,
                engine.concentration("NO₂")
            );
        }
        2 => {
            // PCl5 <=> PCl3 + Cl2: halving the volume favours fewer moles (PCl5)
            let Some(mut engine) = engine_for("pcl5_pcl3") else {
                return;
            };
            println!(
                "{}: Δn = {}, compression favours the side with fewer moles",
                engine.reaction().equation(),
                engine.reaction().delta_n()
            );
            engine.set_catalyst(30.0);
            run_to_equilibrium(&mut engine, 0.002, 10000);
            let moles = engine.total_moles();
            println!("Q = {:.4e}, Kc = {:.4e}", engine.reaction_quotient(), engine.equilibrium_constant());
            engine.set_volume(engine.volume() / 2.0);
            println!(
                "V halved: total moles {:.4} -> {:.4}, Q = {:.4e}, direction {}",
                moles,
                engine.total_moles(),
                engine.reaction_quotient(),
                engine.reaction_direction()
            );
            run_to_equilibrium(&mut engine, 0.002, 10000);
            state_table(&engine, EQUILIBRIUM_TOLERANCE).printstd();
        }
        3 => {
            // same conditions, same Kc, very different speed
            let Some(mut plain) = engine_for("haber_bosch") else {
                return;
            };
            let mut catalysed = plain.clone();
            catalysed.set_catalyst(45.0);
            technical_data_table(&catalysed).printstd();
            plain.run(1.0, 3000);
            catalysed.run(1.0, 3000);
            println!(
                "after 3000 s: [NH₃] without catalyst {:.3e}, with iron {:.3e} mol/L",
                plain.concentration("NH₃"),
                catalysed.concentration("NH₃")
            );
            println!(
                "Kc without {:.4e}, with {:.4e}",
                plain.equilibrium_constant(),
                catalysed.equilibrium_constant()
            );
        }
        4 => {
            // Fe3+ + SCN- <=> FeSCN2+: extra product pushes the reaction back
            let Some(mut engine) = engine_for("fe_scn") else {
                return;
            };
            run_to_equilibrium(&mut engine, 0.001, 20000);
            let fe_before = engine.concentration("Fe³⁺");
            engine.set_concentration("FeSCN²⁺", engine.concentration("FeSCN²⁺") + 0.2);
            println!("after adding FeSCN²⁺: direction {}", engine.reaction_direction());
            run_to_equilibrium(&mut engine, 0.001, 20000);
            println!(
                "[Fe³⁺] {:.4} -> {:.4} mol/L",
                fe_before,
                engine.concentration("Fe³⁺")
            );
        }
        5 => {
            // history as CSV, conditions as JSON
            let Some(mut engine) = engine_for("h2_i2_hi") else {
                return;
            };
            engine.set_catalyst(35.0);
            engine.run(0.05, 200);
            let dir = std::env::temp_dir();
            let csv = dir.join("simulation_data.csv");
            let config = dir.join("config.json");
            if let Err(e) = write_csv(engine.history(), &csv) {
                error!("{}", e);
                return;
            }
            if let Err(e) = SessionConfig::from_engine(&engine).save(&config) {
                error!("{}", e);
                return;
            }
            println!("written {} and {}", csv.display(), config.display());
            match SessionConfig::load(&config).and_then(|c| c.restore_engine()) {
                Ok(restored) => {
                    state_table(&restored, EQUILIBRIUM_TOLERANCE).printstd();
                }
                Err(e) => error!("{}", e),
            }
        }
        _ => {
            println!("no such example");
        }
    }
}
