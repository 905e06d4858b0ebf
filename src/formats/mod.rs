pub mod manager;
pub mod schematic;
