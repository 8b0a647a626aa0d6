pub mod compositor;
pub mod data;
pub mod errors;
pub mod ports;
