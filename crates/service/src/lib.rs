//! Service layer: document storage and the menu collection.
//! - `storage` persists ordered JSON documents.
//! - `menu` owns the menu item schema and exposes it through `MenuRepository`.

pub mod errors;
pub mod menu;
pub mod storage;
