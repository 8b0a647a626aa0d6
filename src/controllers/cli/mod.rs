pub mod still;
