mod sea_generator;

pub use sea_generator::SeaGenerator;
