pub mod colourise;
pub mod compute_tile;
pub mod generate_tiles;
pub mod resample;
