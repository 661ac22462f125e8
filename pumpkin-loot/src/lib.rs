pub mod inventory;
pub mod item;
pub mod level;
pub mod loot;
