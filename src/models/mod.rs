mod item;

pub use item::{Item, NewItem, StoredItem};
