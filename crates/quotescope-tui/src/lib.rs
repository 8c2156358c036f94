// Terminal UI for browsing quotes

pub mod app;
pub mod runner;
pub mod ui;

pub use app::{App, InputMode, Screen, SliderTrack};
pub use runner::{run_tui, Session};
