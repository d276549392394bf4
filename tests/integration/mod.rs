//! Integration helpers backed by a mock HTTP server

pub mod mock_server;
