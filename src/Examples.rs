/// runnable demonstration scenarios for the equilibrium engine
pub mod equilibrium_examples;
