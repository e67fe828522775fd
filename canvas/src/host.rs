//! Outbound notifications from the engine to the page that embeds it.

/// Receiver for engine notifications.
///
/// Calls are made synchronously, in the order the engine produced them. An
/// implementation that forwards them somewhere slow should queue and return;
/// the engine never waits on the outcome.
pub trait HostSink {
    /// The document changed; `json` is the full serialized shape list.
    fn on_document_changed(&mut self, json: &str);

    /// A shape was right-clicked. `x`/`y` are relative to the canvas container.
    fn on_shape_right_clicked(&mut self, x: f64, y: f64, id: &str);

    /// Any open context menu should be dismissed.
    fn on_request_hide_context_menu(&mut self);

    /// The canvas cursor should change. Hosts without a cursor ignore this.
    fn on_cursor_changed(&mut self, _cursor: &str) {}
}

/// A sink that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl HostSink for NullHost {
    fn on_document_changed(&mut self, _json: &str) {}

    fn on_shape_right_clicked(&mut self, _x: f64, _y: f64, _id: &str) {}

    fn on_request_hide_context_menu(&mut self) {}
}
