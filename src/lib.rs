pub mod calendar;
pub mod config;
pub mod error;
pub mod grid;
pub mod timeline;
pub mod tz;
pub mod widget;
