pub mod handlers;
pub mod middleware;
pub mod movies;
pub mod routes;
pub mod trending;
pub mod ws;

pub use routes::{create_router, create_router_with_static};
