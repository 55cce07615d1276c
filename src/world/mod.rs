mod crud;
mod types;

pub use crud::{create_world, delete_world, fetch_world, fetch_worlds, update_world};
pub use types::{CreateWorldOptions, UpdateWorldOptions, World};
