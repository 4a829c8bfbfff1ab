//! Shared firmware state and hardware ownership
pub mod capture;
pub mod indicator;
pub mod resources;
