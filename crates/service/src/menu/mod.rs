//! Menu item collection.

pub mod repository;
pub mod schema;
pub mod store;

pub use repository::MenuRepository;
pub use store::{MenuItem, MenuStore};
