pub mod forms;
pub mod location;
pub mod menu;
