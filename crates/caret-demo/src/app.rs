#![forbid(unsafe_code)]

//! The demo's event loop.
//!
//! The loop owns the terminal: it reads events, hands them to the editor,
//! and repaints whenever the editor reports a change. The editor itself
//! never touches the terminal.

use std::cell::Cell;
use std::fs::File;
use std::io;
use std::path::Path;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use caret_core::event::{Event, KeyCode, KeyEvent};
use caret_core::terminal_session::{SessionOptions, TerminalSession};
use caret_render::frame::Frame;
use caret_render::presenter::Presenter;
use caret_widgets::{Block, Editor, Interception};

use crate::cli::Opts;

/// How long one poll waits before the loop re-checks its flags.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Build the editor the options describe.
pub fn build_editor(opts: &Opts) -> Editor {
    let mut editor = Editor::new().with_strategy(opts.caret);
    if opts.border {
        editor = editor.with_block(Block::bordered().title(opts.title.clone()));
    }
    editor.set_text(&opts.text);
    editor
}

/// Interceptor that consumes Esc and Ctrl+C and raises `quit`.
pub fn quit_interceptor(quit: Rc<Cell<bool>>) -> impl FnMut(KeyEvent) -> Interception {
    move |key: KeyEvent| {
        let is_quit = key.code == KeyCode::Escape || (key.ctrl() && key.is_char('c'));
        if is_quit {
            quit.set(true);
            Interception::Consumed
        } else {
            Interception::Continue(key)
        }
    }
}

/// Render `editor` into a fresh `width` x `height` frame.
pub fn draw(editor: &mut Editor, width: u16, height: u16) -> Frame {
    let mut frame = Frame::new(width, height);
    let area = frame.bounds();
    editor.render(area, &mut frame);
    frame
}

/// Send logs to `path`. `RUST_LOG` overrides the `info` default.
pub fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let file = File::create(path)?;

    #[cfg(feature = "tracing-json")]
    {
        caret_core::logging::init_json(Mutex::new(file), "info")
    }

    #[cfg(not(feature = "tracing-json"))]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init()
    }
}

/// Run the editor until the user quits.
pub fn run(opts: &Opts) -> io::Result<()> {
    let mut editor = build_editor(opts);

    let dirty = Rc::new(Cell::new(true));
    let quit = Rc::new(Cell::new(false));
    {
        let dirty = Rc::clone(&dirty);
        editor.on_change(move || dirty.set(true));
    }
    editor.add_handler(quit_interceptor(Rc::clone(&quit)));

    let session = TerminalSession::new(SessionOptions::editor())?;
    let mut presenter = Presenter::new(io::stdout());
    presenter.use_blinking_bar()?;
    presenter.clear_screen()?;

    let (mut width, mut height) = session.size()?;
    tracing::info!(width, height, caret = ?opts.caret, "editor started");

    while !quit.get() {
        if dirty.replace(false) {
            let frame = draw(&mut editor, width, height);
            presenter.present(&frame)?;
        }

        if !session.poll_event(POLL_INTERVAL)? {
            continue;
        }
        let Some(event) = session.read_event()? else {
            continue;
        };

        if let Event::Resize {
            width: w,
            height: h,
        } = event
        {
            tracing::debug!(width = w, height = h, "resize");
            width = w;
            height = h;
            presenter.clear_screen()?;
            dirty.set(true);
        }
        editor.handle_event(&event);
    }

    tracing::info!(len = editor.model().len(), "editor closed");
    Ok(())
}
