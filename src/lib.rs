pub mod config;
pub mod flickr;
pub mod harvest;
pub mod logging;

pub use flickr::{
    Client, Error, LicenseFilter, Photo, PhotoPage, Result, SearchPage, SearchQuery, Size,
};
pub use harvest::{HarvestOptions, Harvester, Stats};
