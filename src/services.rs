pub mod account_service;
pub mod flash;
pub mod invoice_service;
pub mod request_service;
pub mod stats_service;
pub mod ticket_service;
