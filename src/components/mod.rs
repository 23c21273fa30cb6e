pub mod agent_group_panel;
pub mod error_banner;
pub mod feedback_forms;
pub mod feedback_row;
pub mod filter_bar;
pub mod metric_card;
pub mod sidebar;
pub mod status_badge;
pub mod trend_bars;
