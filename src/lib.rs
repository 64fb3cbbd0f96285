pub mod api;
pub mod app;
pub mod config;
pub mod connector;
pub mod overlay;
pub mod save;
pub mod shared;
pub mod wizard;
