pub mod account;
pub mod dashboard;
pub mod invoice;
pub mod ticket;
pub mod wire;
pub mod work_request;
