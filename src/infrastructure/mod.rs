pub mod api_client;
pub mod mock;
pub mod ml;
pub mod observability;

pub use api_client::ApiClient;
pub use mock::MockClassifier;
