/// Basic application code
pub mod app;
/// REST clients for outside services
pub mod client;
/// Controllers for REST endpoints
pub mod controller;
/// Domain objects and submission validation
pub mod domain;
/// REST error envelope
pub mod error;
/// Booking intake pipeline
pub mod intake;
/// Stored records
pub mod model;
/// Staff notification formatting and dispatch
pub mod notify;
/// Repositories
pub mod repo;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
