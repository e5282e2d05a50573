// Waypoint domain model and update classification
pub mod model;

// Read-only destination and offer catalogs
pub mod catalog;

// Asynchronous persistence boundary and mock backend
pub mod persist;

// Observable waypoint store
pub mod store;

// View tree and lifecycle primitives
pub mod view;

// Per-waypoint presenter state machine
pub mod presenter;

// List controller and re-render policy
pub mod board;

// Sample data generation
pub mod mock;

// Configuration loading
pub mod config;
