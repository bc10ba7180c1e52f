use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// Components get their data as struct fields (props) and may borrow a
/// persistent state struct mutably, the same way ratatui's `StatefulWidget`
/// works. `render` takes `&mut self` so a component can record layout
/// measurements (row offsets, viewport height) that event handling needs on
/// the next tick.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Persistent component state that reacts to terminal input.
pub trait EventHandler {
    /// What the component reports back to the event loop.
    type Event;

    /// Handle a `TuiEvent`. Returns `None` when the event was consumed
    /// locally or ignored.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
