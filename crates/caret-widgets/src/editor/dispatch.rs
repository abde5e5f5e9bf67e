#![forbid(unsafe_code)]

//! Key routing: interceptor chain, then the built-in key table.
//!
//! Every key first runs through the registered [`KeyInterceptor`]s in
//! order. Each one may rewrite the key or consume it; a consumed key stops
//! there and no built-in action runs. A key that survives the chain is
//! matched against this table:
//!
//! | key                      | action                                  |
//! |--------------------------|-----------------------------------------|
//! | printable char           | insert it                               |
//! | Enter                    | insert `"\n"`                           |
//! | Left / Right / Up / Down | relative move                           |
//! | Home / End               | line start / end (Ctrl: document)       |
//! | PageUp / PageDown        | page move                               |
//! | Backspace / Delete       | delete backward / forward               |
//!
//! Shift makes any move extend the selection. Everything else, including
//! key releases and characters typed with Ctrl or Alt, is ignored.

use caret_core::event::{KeyCode, KeyEvent};
use caret_text::{Absolute, LayoutGeometry, MovementEngine, PageDirection, TextModel};

/// What an interceptor decided about a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interception {
    /// Keep going with this (possibly rewritten) key.
    Continue(KeyEvent),
    /// Stop; the key was handled by the interceptor.
    Consumed,
}

/// A link in the interceptor chain.
pub trait KeyInterceptor {
    fn intercept(&mut self, key: KeyEvent) -> Interception;
}

impl<F> KeyInterceptor for F
where
    F: FnMut(KeyEvent) -> Interception,
{
    fn intercept(&mut self, key: KeyEvent) -> Interception {
        self(key)
    }
}

/// The built-in action a key triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Insert,
    DeleteBackward,
    DeleteForward,
    Move,
}

/// Outcome of dispatching one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// An interceptor consumed the key.
    Consumed,
    /// The key matched nothing in the table.
    Ignored,
    /// A built-in action ran.
    Applied(EditAction),
}

impl Dispatch {
    /// Whether the host should hear about a change.
    pub fn notifies(self) -> bool {
        matches!(self, Dispatch::Applied(_))
    }
}

/// Routes keys to interceptors and then to the model.
#[derive(Default)]
pub struct InputDispatcher {
    interceptors: Vec<Box<dyn KeyInterceptor>>,
    movement: MovementEngine,
}

impl std::fmt::Debug for InputDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputDispatcher")
            .field("interceptors", &self.interceptors.len())
            .field("movement", &self.movement)
            .finish()
    }
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor to the end of the chain.
    pub fn push(&mut self, interceptor: impl KeyInterceptor + 'static) {
        self.interceptors.push(Box::new(interceptor));
    }

    /// Replace the whole chain.
    pub fn set_interceptors(&mut self, interceptors: Vec<Box<dyn KeyInterceptor>>) {
        self.interceptors = interceptors;
    }

    pub fn interceptors(&self) -> &[Box<dyn KeyInterceptor>] {
        &self.interceptors
    }

    /// Remove and return the chain, leaving it empty.
    pub fn take_interceptors(&mut self) -> Vec<Box<dyn KeyInterceptor>> {
        std::mem::take(&mut self.interceptors)
    }

    pub fn movement(&self) -> &MovementEngine {
        &self.movement
    }

    /// Forget movement state that depends on the old text.
    pub fn reset_movement(&mut self) {
        self.movement.reset_goal();
    }

    /// Run `key` through the chain and the key table.
    pub fn dispatch<L: LayoutGeometry>(
        &mut self,
        key: KeyEvent,
        model: &mut TextModel,
        layout: &L,
    ) -> Dispatch {
        if !key.is_press() {
            return Dispatch::Ignored;
        }

        let mut key = key;
        for interceptor in &mut self.interceptors {
            match interceptor.intercept(key) {
                Interception::Continue(next) => key = next,
                Interception::Consumed => {
                    caret_core::debug!(code = ?key.code, "key consumed by interceptor");
                    return Dispatch::Consumed;
                }
            }
        }

        // An interceptor may have rewritten the key into a release.
        if !key.is_press() {
            return Dispatch::Ignored;
        }

        let outcome = self.apply_builtin(key, model, layout);
        caret_core::trace!(
            code = ?key.code,
            modifiers = ?key.modifiers,
            outcome = ?outcome,
            cursor = model.cursor(),
            "key dispatched"
        );
        outcome
    }

    /// Insert pasted text as a single edit. Interceptors are not consulted.
    pub fn paste(&mut self, text: &str, model: &mut TextModel) -> Dispatch {
        model.insert(text);
        self.movement.reset_goal();
        caret_core::trace!(len = text.len(), cursor = model.cursor(), "paste");
        Dispatch::Applied(EditAction::Insert)
    }

    fn apply_builtin<L: LayoutGeometry>(
        &mut self,
        key: KeyEvent,
        model: &mut TextModel,
        layout: &L,
    ) -> Dispatch {
        let selecting = key.shift();
        let moved = Dispatch::Applied(EditAction::Move);

        match key.code {
            KeyCode::Char(c) if !key.ctrl() && !key.alt() && !c.is_control() => {
                model.insert_char(c);
                self.movement.reset_goal();
                Dispatch::Applied(EditAction::Insert)
            }
            KeyCode::Enter => {
                model.insert("\n");
                self.movement.reset_goal();
                Dispatch::Applied(EditAction::Insert)
            }
            KeyCode::Backspace => {
                model.delete_backward();
                self.movement.reset_goal();
                Dispatch::Applied(EditAction::DeleteBackward)
            }
            KeyCode::Delete => {
                model.delete_forward();
                self.movement.reset_goal();
                Dispatch::Applied(EditAction::DeleteForward)
            }
            KeyCode::Left => {
                self.movement.move_relative(model, layout, -1, 0, selecting);
                moved
            }
            KeyCode::Right => {
                self.movement.move_relative(model, layout, 1, 0, selecting);
                moved
            }
            KeyCode::Up => {
                self.movement.move_relative(model, layout, 0, -1, selecting);
                moved
            }
            KeyCode::Down => {
                self.movement.move_relative(model, layout, 0, 1, selecting);
                moved
            }
            KeyCode::Home => {
                let to = if key.ctrl() {
                    Absolute::DocumentStart
                } else {
                    Absolute::LineStart
                };
                self.movement.jump(model, layout, to, selecting);
                moved
            }
            KeyCode::End => {
                let to = if key.ctrl() {
                    Absolute::DocumentEnd
                } else {
                    Absolute::LineEnd
                };
                self.movement.jump(model, layout, to, selecting);
                moved
            }
            KeyCode::PageUp => {
                self.movement.page(model, layout, PageDirection::Up, selecting);
                moved
            }
            KeyCode::PageDown => {
                self.movement.page(model, layout, PageDirection::Down, selecting);
                moved
            }
            _ => Dispatch::Ignored,
        }
    }
}
