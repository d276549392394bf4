pub mod url;

pub use url::join_url;
