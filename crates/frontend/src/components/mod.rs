pub mod filter_panel;
pub mod map_view;
pub mod theme_selector;
