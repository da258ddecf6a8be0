//! Leptos UI components

mod bar_chart;
mod error_panel;
mod header;
mod metrics_table;
mod protected_route;
mod sidebar;
mod stats_card;
mod toast;
mod trend_chart;

pub use bar_chart::BarChart;
pub use error_panel::ErrorPanel;
pub use header::Header;
pub use metrics_table::MetricsTable;
pub use protected_route::ProtectedRoute;
pub use sidebar::Sidebar;
pub use stats_card::{CardColor, StatsCard};
pub use toast::{use_toast, ToastContext, ToastKind, ToastProvider};
pub use trend_chart::TrendChart;
