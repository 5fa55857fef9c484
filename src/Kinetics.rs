/// Immutable description of one reversible elementary reaction: stoichiometry, rate
/// constants, activation energies, dH and dS. Validated on construction.
pub mod reaction_model;
/// Built-in catalog of six textbook equilibria and loading of user catalogs from JSON
///
///  # Examples
/// ```
/// use ChemEqStudio::Kinetics::reaction_library::get_reaction_by_id;
/// let reaction = get_reaction_by_id("n2o4_no2").unwrap();
/// assert_eq!(reaction.equation(), "N₂O₄ ⇌ 2NO₂");
/// ```
pub mod reaction_library;
/// catalysts as a reduction of activation energy shared by both directions
pub mod catalyst_library;
/// Session state of one reaction: conditions, concentrations, Arrhenius-adjusted rate
/// constants, explicit Euler time stepping and equilibrium diagnostics.
///
///  # Examples
/// ```
/// use ChemEqStudio::Kinetics::equilibrium_engine::EquilibriumEngine;
/// use ChemEqStudio::Kinetics::reaction_library::get_reaction_by_id;
/// let mut engine = EquilibriumEngine::from_model(get_reaction_by_id("n2o4_no2").unwrap());
/// engine.set_temperature(320.0);
/// engine.set_catalyst(10.0);
/// engine.run(0.01, 500);
/// let info = engine.system_info();
/// println!("Q = {:e}, Kc = {:e}, direction: {}", info.q, info.kc, info.direction);
/// ```
pub mod equilibrium_engine;
/// time series recorded by the engine and chart series extraction
pub mod simulation_history;
