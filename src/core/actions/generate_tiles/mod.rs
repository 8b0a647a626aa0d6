pub mod generate_tiles;
