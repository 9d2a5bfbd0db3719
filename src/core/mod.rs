pub mod engine;
pub mod filter;
pub mod harvest;
pub mod output;
pub mod pacing;
pub mod profile;
pub mod sanitize;
pub mod songlist;
pub mod timeshift;
pub mod title;

pub use crate::domain::model::{HarvestRecord, HarvestResult, ListingItem, ListingPage, OwnerProfile};
pub use crate::domain::ports::{ContentListingService, Pacer, RawPageSink, Storage};
pub use crate::utils::error::Result;
