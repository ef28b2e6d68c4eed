pub mod action;
pub mod app;
pub mod event;
pub mod format;
pub mod stats;
pub mod ui;
pub mod view;
