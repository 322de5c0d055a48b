//! Transformation module.
//!
//! - Shorthand / asset IDs: composite identifiers for asset rows
//! - Extract: per-domain record builders
//! - Merge: template stitching
//! - Crossref: system asset id mapping
//! - Pipeline: upload in, [`Outcome`] out

pub mod asset_id;
pub mod crossref;
pub mod extract;
pub mod merge;
pub mod pipeline;
pub mod shorthand;

pub use asset_id::{generate_asset_id, generate_asset_ids, AssetCounter, ASSET_ID_COLUMN};
pub use crossref::{map_system_assets, CrossReference};
pub use extract::{
    extract_equipment, extract_facility, extract_location, extract_space, Extraction,
    TemplateSource,
};
pub use merge::merge;
pub use pipeline::*;
pub use shorthand::shorten;
