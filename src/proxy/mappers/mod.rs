// Mapper module
// Responsible for rewriting upstream responses before they reach the client

pub mod headers;
pub mod response;

pub use headers::{apply_response_headers, relay_upstream_headers};
pub use response::transform_response;
