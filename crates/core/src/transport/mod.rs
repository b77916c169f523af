pub mod fetch;
pub mod http;
pub mod traits;

pub use fetch::fetch_json;
pub use http::HttpTransport;
pub use traits::{ApiRequest, Method, RawResponse, Transport};
