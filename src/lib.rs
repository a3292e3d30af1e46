/// Basic application code
pub mod app;
/// Bearer-token authentication
pub mod auth;
/// REST clients for outside services
pub mod client;
/// Controllers for REST endpoints
pub mod controller;
/// Cryptography-related objects
pub mod crypto;
/// Database handle shared by the controllers
pub mod database;
/// Domain objects
pub mod domain;
/// Error types returned by the REST endpoints
pub mod error;
/// AI-generated financial insights
pub mod insights;
/// Serializable records and request bodies
pub mod model;
/// Repositories
pub mod repo;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
