pub mod cli;
pub mod compositor;
pub mod ports;
pub mod worker;
