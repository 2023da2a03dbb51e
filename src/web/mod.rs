//! Web server for browser-based classification.
//!
//! This module provides a small web interface using Axum. Users describe a
//! shipment in a form and get back the classification and duty estimate.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! hs-classifier serve
//!
//! # Custom port and auto-open browser
//! hs-classifier serve --port 3000 --open
//!
//! # Bind to all interfaces
//! hs-classifier serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /` - Main page with the description form
//! - `POST /api/classify` - Classify `{"description": ..., "invoice_value": ...}`
//! - `GET /api/catalog` - List all entries in the catalog

pub mod server;
