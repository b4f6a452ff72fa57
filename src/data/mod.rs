//! Data module - CSV loading, caching and damage decoding

mod cache;
mod loader;
mod magnitude;
mod processor;

pub use cache::DatasetCache;
pub use loader::{
    date_from_epoch_days, DataLoader, LoaderError, BGN_DATE, EVTYPE, FATALITIES, INJURIES,
};
pub use magnitude::{decode, MagnitudeSuffix};
pub use processor::{
    DamageKind, DataProcessor, ProcessorError, SuffixCount, CROP_DAMAGE, PROPERTY_DAMAGE,
};
