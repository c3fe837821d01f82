pub mod file;
pub mod http;
pub mod traits;

pub use file::FileListingSource;
pub use http::HttpListingSource;
pub use traits::ListingSource;
