pub mod documents;
pub mod index;
pub mod params;
