//! HTTP API handlers for invio-web

pub mod health;
pub mod records;
pub mod ui;
pub mod workflow;

pub use health::health_routes;
pub use records::record_routes;
pub use ui::ui_routes;
pub use workflow::workflow_routes;
