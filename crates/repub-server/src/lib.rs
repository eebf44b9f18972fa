//! REST API server and periodic trigger for the republisher.

pub mod dto;
pub mod error;
pub mod routes;
pub mod scheduler;
pub mod state;
