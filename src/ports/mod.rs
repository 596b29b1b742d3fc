//! Port traits separating the domain from external collaborators.

pub mod data_port;
pub mod config_port;
pub mod chart_port;
