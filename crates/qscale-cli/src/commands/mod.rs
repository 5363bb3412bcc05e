pub mod devices;
pub mod energy;
