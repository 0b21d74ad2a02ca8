//! The dashboard page: monthly totals, where the money went, and the
//! transactions behind them.

mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
