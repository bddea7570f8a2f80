mod ambient;
mod decoration;
mod river;
mod terrain;

pub use ambient::AmbientLayer;
pub use decoration::DecorationLayer;
pub use river::RiverLayer;
pub use terrain::TerrainLayer;
