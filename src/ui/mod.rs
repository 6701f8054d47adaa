pub mod overview;
pub mod panels;
pub mod plot;

use crate::state::{Event, Session};

/// Apply the events collected while drawing a panel.
/// `Session::handle` keeps the status line current; errors are logged here.
pub fn dispatch(session: &mut Session, events: Vec<Event>) {
    for event in events {
        if let Err(e) = session.handle(event) {
            log::error!("{e:#}");
        }
    }
}
