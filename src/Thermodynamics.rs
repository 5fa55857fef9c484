/// standard Gibbs energy, equilibrium constant, reaction quotient and Gibbs energy of
/// reaction for a single reversible reaction
pub mod equilibrium_thermo;
