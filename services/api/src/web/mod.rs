pub mod rest;
pub mod state;

// Re-export the router builder and handler to make them easily accessible
// to the binary that will build the web server.
pub use rest::{api_router, generate_handler};
