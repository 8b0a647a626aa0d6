pub mod capture;
pub mod file;
