//! HTTP side of the Unibot client.
//!
//! [`RequestPipeline`] is the single chokepoint every API call passes
//! through; [`UnibotApi`] maps the backend endpoints onto it.

pub mod api_client;
pub mod pipeline;

pub use api_client::UnibotApi;
pub use pipeline::RequestPipeline;
