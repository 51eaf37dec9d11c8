pub mod routes;

pub use routes::{node_routes, AppState};
