#![forbid(unsafe_code)]

//! Embeddable multi-line editor.
//!
//! [`Editor`] ties the pieces together: a [`TextModel`] holds the text, an
//! [`InputDispatcher`] turns keys into edits and moves, a [`TextView`]
//! draws the text inside an optional [`Block`], and a [`CursorReconciler`]
//! puts the terminal caret on the marker cell after drawing.
//!
//! The host owns the event loop. It feeds events to
//! [`Editor::handle_event`], calls [`Editor::render`] once per frame, and
//! learns about changes through the [`Editor::on_change`] callback.
//!
//! # Example
//! ```
//! use caret_core::event::{KeyCode, KeyEvent, Modifiers};
//! use caret_render::frame::Frame;
//! use caret_widgets::Editor;
//!
//! let mut editor = Editor::new().with_title("Test editor");
//! editor.set_text("ab");
//!
//! let shift_left = KeyEvent::new(KeyCode::Left).with_modifiers(Modifiers::SHIFT);
//! editor.handle_key(shift_left);
//! editor.handle_key(shift_left);
//! editor.handle_key(KeyEvent::char('x'));
//! assert_eq!(editor.editor_text(), "x");
//!
//! let mut frame = Frame::new(20, 3);
//! let area = frame.bounds();
//! editor.render(area, &mut frame);
//! assert_eq!(frame.cursor_position, Some((2, 1)));
//! ```

mod dispatch;
mod reconcile;

pub use dispatch::{Dispatch, EditAction, InputDispatcher, Interception, KeyInterceptor};
pub use reconcile::{CaretStrategy, CursorReconciler};

use caret_core::event::{Event, KeyEvent};
use caret_core::geometry::Rect;
use caret_render::Style;
use caret_render::frame::Frame;
use caret_text::{TextModel, VisualLayout};

use crate::block::Block;
use crate::text_view::{TextView, TextViewState};
use crate::{StatefulWidget, Widget};

type ChangeCallback = Box<dyn FnMut()>;

/// A text editor widget driven by the host's event loop.
pub struct Editor {
    model: TextModel,
    dispatcher: InputDispatcher,
    reconciler: CursorReconciler,
    view_state: TextViewState,
    block: Option<Block>,
    style: Style,
    selection_style: Style,
    selectable: bool,
    on_change: Option<ChangeCallback>,
    /// Inner area of the last render; movement wraps to its width.
    last_inner: Option<Rect>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("model", &self.model)
            .field("dispatcher", &self.dispatcher)
            .field("reconciler", &self.reconciler)
            .field("block", &self.block)
            .field("selectable", &self.selectable)
            .field("last_inner", &self.last_inner)
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// Create an empty editor without a border.
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: TextModel::new(),
            dispatcher: InputDispatcher::new(),
            reconciler: CursorReconciler::default(),
            view_state: TextViewState::default(),
            block: None,
            style: Style::new(),
            selection_style: Style::new().reverse(),
            selectable: false,
            on_change: None,
            last_inner: None,
        }
    }

    /// Draw the editor inside `block`.
    #[must_use]
    pub fn with_block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    /// Set the title, adding a bordered block if there is none yet.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.set_title(title);
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: CaretStrategy) -> Self {
        self.reconciler.set_strategy(strategy);
        self
    }

    /// Base style for the text.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Style layered on selected text (reverse video by default).
    #[must_use]
    pub fn with_selection_style(mut self, style: Style) -> Self {
        self.selection_style = style;
        self
    }

    // ── Content ─────────────────────────────────────────────────────────

    /// Replace the whole document. The cursor goes to the end.
    pub fn set_text(&mut self, text: &str) {
        self.model.set_text(text);
        self.text_replaced();
    }

    /// Replace the whole document and put the cursor at `cursor`.
    pub fn set_text_with_cursor(&mut self, text: &str, cursor: usize) {
        self.model.set_text_with_cursor(text, cursor);
        self.text_replaced();
    }

    /// The document as plain text.
    pub fn editor_text(&self) -> String {
        self.model.plain_text()
    }

    pub fn model(&self) -> &TextModel {
        &self.model
    }

    fn text_replaced(&mut self) {
        self.dispatcher.reset_movement();
        self.reconciler.invalidate();
        caret_core::debug!(len = self.model.len(), "editor text replaced");
        self.notify();
    }

    // ── Chrome ──────────────────────────────────────────────────────────

    pub fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.block
            .get_or_insert_with(Block::bordered)
            .set_title(title);
    }

    pub fn caret_strategy(&self) -> CaretStrategy {
        self.reconciler.strategy()
    }

    // ── Interceptors ────────────────────────────────────────────────────

    /// Append a key interceptor; interceptors run in registration order.
    pub fn add_handler(&mut self, handler: impl KeyInterceptor + 'static) {
        self.dispatcher.push(handler);
    }

    /// Replace the interceptor chain.
    pub fn set_handlers(&mut self, handlers: Vec<Box<dyn KeyInterceptor>>) {
        self.dispatcher.set_interceptors(handlers);
    }

    pub fn handlers(&self) -> &[Box<dyn KeyInterceptor>] {
        self.dispatcher.interceptors()
    }

    /// Remove the chain so it can be edited and handed back with
    /// [`Editor::set_handlers`].
    pub fn take_handlers(&mut self) -> Vec<Box<dyn KeyInterceptor>> {
        self.dispatcher.take_interceptors()
    }

    pub fn clear_handlers(&mut self) {
        self.dispatcher.set_interceptors(Vec::new());
    }

    /// Store the host's selectable flag. The editor does not act on it.
    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// Register the change callback, replacing any previous one.
    ///
    /// It runs once for every key that triggers a built-in action
    /// (movement included), for every paste, and when the text is replaced.
    pub fn on_change(&mut self, callback: impl FnMut() + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback();
        }
    }

    // ── Input ───────────────────────────────────────────────────────────

    /// Handle one host event. Returns `true` if the change callback ran.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Paste(paste) => {
                let outcome = self.dispatcher.paste(&paste.text, &mut self.model);
                self.after_dispatch(outcome)
            }
            Event::Resize { .. } => {
                self.reconciler.invalidate();
                false
            }
            Event::Focus(_) => false,
        }
    }

    /// Handle one key. Returns `true` if the change callback ran.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let layout = self.layout();
        let outcome = self.dispatcher.dispatch(key, &mut self.model, &layout);
        self.after_dispatch(outcome)
    }

    fn after_dispatch(&mut self, outcome: Dispatch) -> bool {
        if !outcome.notifies() {
            return false;
        }
        self.reconciler.invalidate();
        self.notify();
        true
    }

    /// Layout matching what is on screen, or an unwrapped one before the
    /// first render.
    pub fn layout(&self) -> VisualLayout {
        match self.last_inner {
            Some(inner) if !inner.is_empty() => VisualLayout::new(
                self.model.chars(),
                usize::from(inner.width),
                usize::from(inner.height),
            ),
            _ => VisualLayout::unwrapped(self.model.chars()),
        }
    }

    // ── Drawing ─────────────────────────────────────────────────────────

    /// Area left for text once the block is drawn around `area`.
    pub fn inner_area(&self, area: Rect) -> Rect {
        self.block.as_ref().map_or(area, |block| block.inner(area))
    }

    /// Draw the editor and place the caret. Call once per frame.
    pub fn render(&mut self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Editor",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }

        if let Some(block) = &self.block {
            block.render(area, frame);
        }

        let inner = self.inner_area(area);
        if self.last_inner != Some(inner) {
            caret_core::debug!(?inner, "editor geometry changed");
            self.last_inner = Some(inner);
            self.reconciler.invalidate();
        }
        if inner.is_empty() {
            return;
        }

        let layout = self.layout();
        TextView::new(&self.model, &layout)
            .style(self.style)
            .selection_style(self.selection_style)
            .render(inner, frame, &mut self.view_state);

        self.reconciler.reconcile(frame, inner);
    }

    /// Scroll state of the text view.
    pub fn view_state(&self) -> TextViewState {
        self.view_state
    }
}
