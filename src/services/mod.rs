pub mod categories;
pub mod clients;
pub mod co_clients;
pub mod commands;
pub mod photos;
pub mod products;
pub mod stats;
pub mod users;
