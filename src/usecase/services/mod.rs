pub mod export_service;
pub mod fetch_service;
pub mod report_session;
pub mod request_guard;
