pub mod connection;
pub mod schema;

pub use connection::make_pool;
pub use schema::{fetch_client_tracts, fetch_production_tracts};
