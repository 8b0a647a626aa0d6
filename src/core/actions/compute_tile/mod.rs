pub mod compute_tile;
pub mod ports;
