//! Shared grocery list.

mod repository;

pub use repository::{GroceryItem, GroceryRepository};
