pub mod comprehend_client;

pub use comprehend_client::ComprehendClient;
