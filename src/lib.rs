//! ChemEqStudio: simulation of reversible elementary reactions approaching chemical
//! equilibrium under changing temperature, volume, composition and catalysis.
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Kinetics;
#[allow(non_snake_case)]
pub mod Thermodynamics;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod settings;
