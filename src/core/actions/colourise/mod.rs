pub mod colourise;
pub mod ports;
