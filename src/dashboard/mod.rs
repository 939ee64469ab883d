pub mod config;
pub mod controller;
pub mod state;

pub use config::DashboardConfig;
pub use controller::{local_clock, Clock, DashboardController, DashboardSources};
pub use state::{AreaCard, BarView, DashboardState, DashboardView, LoadStatus, WeatherView};
