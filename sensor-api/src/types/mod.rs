pub mod document;
pub mod params;
pub mod sample;
