pub mod enumerate;
pub mod error;
pub mod orchestrator;
pub mod request;
