pub mod backend;
pub use backend::BackendClient;
pub mod account_api;
pub use account_api::AccountApi;
pub mod admin_api;
pub use admin_api::AdminApi;
pub mod customer_api;
pub use customer_api::CustomerApi;
pub mod staff_api;
pub use staff_api::StaffApi;
