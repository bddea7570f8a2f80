pub mod advice;
pub mod chat;
pub mod config;
pub mod dataset;
pub mod palette;
pub mod region;
pub mod rng;
pub mod scene;
pub mod season;
pub mod state;
pub mod web;

pub use config::SiteConfig;
pub use dataset::{DatasetLoader, RegionDataset};
pub use region::{Region, RegionId, RegionRegistry, SeasonData};
pub use season::SeasonType;
pub use state::{reduce, Action, VizState};
