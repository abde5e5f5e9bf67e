#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! [`TerminalSession`] owns the terminal modes an interactive editor needs
//! (raw mode, alternate screen, bracketed paste) and restores them when
//! dropped. Restoration also happens on panic (via a one-time panic hook)
//! and, on unix, on SIGINT/SIGTERM.
//!
//! Cleanup runs in the reverse order of setup so the shell gets back the
//! exact state it handed over.

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use crate::event::Event;

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM, SIGWINCH};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Terminal modes requested for a session.
///
/// Raw mode is always enabled; everything else is opt-in.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Draw on the alternate screen and restore the primary one on exit.
    pub alternate_screen: bool,

    /// Deliver pastes as a single [`Event::Paste`] instead of key storms.
    pub bracketed_paste: bool,

    /// Report focus gained/lost.
    pub focus_events: bool,
}

impl SessionOptions {
    /// The modes a full-screen editor wants.
    #[must_use]
    pub fn editor() -> Self {
        Self {
            alternate_screen: true,
            bracketed_paste: true,
            focus_events: false,
        }
    }
}

/// RAII guard for terminal state.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    alternate_screen_enabled: bool,
    bracketed_paste_enabled: bool,
    focus_events_enabled: bool,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode and the requested modes.
    ///
    /// If any step fails, the modes already entered are restored by `Drop`
    /// before the error is returned.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode enabled");

        let mut session = Self {
            options: options.clone(),
            alternate_screen_enabled: false,
            bracketed_paste_enabled: false,
            focus_events_enabled: false,
            #[cfg(unix)]
            signal_guard: None,
        };

        #[cfg(unix)]
        {
            session.signal_guard = Some(SignalGuard::new()?);
        }

        let mut stdout = io::stdout();

        if options.alternate_screen {
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
            #[cfg(feature = "tracing")]
            tracing::info!("alternate screen enabled");
        }

        if options.bracketed_paste {
            crossterm::execute!(stdout, crossterm::event::EnableBracketedPaste)?;
            session.bracketed_paste_enabled = true;
            #[cfg(feature = "tracing")]
            tracing::info!("bracketed paste enabled");
        }

        if options.focus_events {
            crossterm::execute!(stdout, crossterm::event::EnableFocusChange)?;
            session.focus_events_enabled = true;
            #[cfg(feature = "tracing")]
            tracing::info!("focus events enabled");
        }

        Ok(session)
    }

    /// Current terminal size as `(columns, rows)`.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    /// Wait up to `timeout` for an input event to become available.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    /// Read the next event, blocking.
    ///
    /// Returns `Ok(None)` for terminal events the editor does not consume.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        let event = crossterm::event::read()?;
        Ok(Event::from_crossterm(event))
    }

    /// Requested options.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        let mut stdout = io::stdout();

        if self.focus_events_enabled {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableFocusChange);
            self.focus_events_enabled = false;
            #[cfg(feature = "tracing")]
            tracing::info!("focus events disabled");
        }

        if self.bracketed_paste_enabled {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableBracketedPaste);
            self.bracketed_paste_enabled = false;
            #[cfg(feature = "tracing")]
            tracing::info!("bracketed paste disabled");
        }

        let _ = crossterm::execute!(
            stdout,
            crossterm::cursor::SetCursorStyle::DefaultUserShape,
            crossterm::cursor::Show
        );

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
            #[cfg(feature = "tracing")]
            tracing::info!("alternate screen disabled");
        }

        let _ = crossterm::terminal::disable_raw_mode();
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode disabled");

        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

/// Restore every mode unconditionally; used where the session is unreachable.
fn best_effort_cleanup() {
    let mut stdout = io::stdout();

    let _ = crossterm::execute!(stdout, crossterm::event::DisableFocusChange);
    let _ = crossterm::execute!(stdout, crossterm::event::DisableBracketedPaste);
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM, SIGWINCH]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for signal in signals.forever() {
                match signal {
                    SIGWINCH => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!("SIGWINCH received");
                    }
                    SIGINT | SIGTERM => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!("termination signal received, cleaning up");
                        best_effort_cleanup();
                        std::process::exit(128 + signal);
                    }
                    _ => {}
                }
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_options_default_is_minimal() {
        let opts = SessionOptions::default();
        assert!(!opts.alternate_screen);
        assert!(!opts.bracketed_paste);
        assert!(!opts.focus_events);
    }

    #[test]
    fn editor_options_use_alt_screen_and_paste() {
        let opts = SessionOptions::editor();
        assert!(opts.alternate_screen);
        assert!(opts.bracketed_paste);
        assert!(!opts.focus_events);
    }
}
