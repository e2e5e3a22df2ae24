pub mod header;
pub mod help_overlay;
pub mod plant_list;
