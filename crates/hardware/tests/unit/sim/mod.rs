
/// Script runs through the simulator.
pub mod simulator;
