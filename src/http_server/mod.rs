pub mod app;
pub mod error;
pub mod flash;
pub mod forms;
pub mod http_routes;
pub mod state;
pub mod views;
