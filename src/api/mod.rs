pub mod announcement;
pub mod attendance;
pub mod auth;
pub mod client;
pub mod holiday;
pub mod leave_request;
pub mod payment_request;
pub mod user;
pub mod wfh;

pub use client::ApiClient;
