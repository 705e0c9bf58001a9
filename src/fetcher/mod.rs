pub mod client;
pub mod decode;
pub mod download;
pub mod errors;
pub mod pipeline;
pub mod profile;
pub mod types;

pub use client::fetch_page;
pub use download::fetch_image;
pub use errors::FetchError;
pub use profile::{DOWNLOAD_PROFILES, RequestProfile, TierFailure};
pub use types::{Charset, FetchedImage, PageResponse, Tier};
