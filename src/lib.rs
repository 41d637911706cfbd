pub mod chart;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod fake_feed;
pub mod feed;
pub mod gallery;
pub mod http_client;
pub mod logging;
pub mod selection;
pub mod state;
pub mod stats_fetch;
pub mod view_data;
