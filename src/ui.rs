//! Ratatui front-end for the score tracker. Players are shown as cards in a
//! grid ordered by the roster's derived view, with a footer for transient
//! notifications and key hints. Timed behaviour (notification dismissal, the
//! reset confirmation window, the score-change flash) goes through an explicit
//! scheduler that the event loop drives on every tick.

mod app;
mod forms;
mod helpers;
mod notify;
mod terminal;
mod timer;

pub use app::App;
pub use terminal::run_app;
