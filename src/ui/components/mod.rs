pub mod analyze;
pub mod help;
pub mod sidebar;
pub mod status_bar;
