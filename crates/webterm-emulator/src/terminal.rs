//! Terminal facade tying the interpreter, screen and IO stack together.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use webterm_core::{Error, Result, Size, TerminalPreferences};

use crate::io::{Dispatch, IoContext, IoHandler, IoStack, IoStats, LoggingHandler};
use crate::pubsub::PubSub;
use crate::screen::Screen;
use crate::snapshot::ScreenSnapshot;
use crate::utf8::Utf8Decoder;
use crate::vt::{Vt, VtEvent, VtStats};

/// Topic published on BEL.
pub const TOPIC_BELL: &str = "bell";
/// Topic published when the window title changes.
pub const TOPIC_TITLE: &str = "title";
/// Topic published when the alternate buffer is entered or left.
pub const TOPIC_ALTERNATE_SCREEN: &str = "alternate-screen";
/// Topic published after a resize.
pub const TOPIC_RESIZE: &str = "resize";

/// Notification published to terminal subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum TerminalEvent {
    /// BEL received
    Bell,
    /// New window title
    Title(String),
    /// Alternate buffer entered (`true`) or left (`false`)
    AlternateScreen(bool),
    /// New screen size
    Resize(Size),
}

/// One terminal: screen state, interpreter and IO routing.
#[derive(Debug)]
pub struct Terminal {
    prefs: TerminalPreferences,
    screen: Screen,
    vt: Vt,
    io: IoStack,
    root: IoContext,
    decoder: Utf8Decoder,
    events: PubSub<TerminalEvent>,
}

impl Terminal {
    /// Create a terminal from validated preferences.
    ///
    /// A root IO context with a logging-only handler is pushed so the
    /// terminal starts with an active context.
    pub fn new(prefs: TerminalPreferences) -> Result<Self> {
        prefs.validate()?;

        let screen = Screen::new(prefs.size(), prefs.scrollback_lines);
        let vt = Vt::from_preferences(&prefs);
        let mut io = IoStack::new();
        let root = io.push(Box::new(LoggingHandler));

        info!(
            columns = prefs.columns,
            rows = prefs.rows,
            max_string_sequence = prefs.max_string_sequence,
            "terminal created"
        );

        Ok(Self {
            prefs,
            screen,
            vt,
            io,
            root,
            decoder: Utf8Decoder::new(),
            events: PubSub::new(),
        })
    }

    /// Preferences the terminal was built with, with the current size.
    pub fn preferences(&self) -> &TerminalPreferences {
        &self.prefs
    }

    /// Interpret a chunk of terminal output.
    pub fn consume(&mut self, text: &str) {
        self.vt.interpret(text, &mut self.screen);
        self.flush_events();
    }

    /// Interpret raw bytes, decoding UTF-8 across chunk boundaries.
    pub fn consume_bytes(&mut self, bytes: &[u8]) {
        let text = self.decoder.decode(bytes);
        if !text.is_empty() {
            self.consume(&text);
        }
    }

    /// Screen state.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Serializable render surface.
    pub fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            theme: self.prefs.theme(),
            ..self.screen.snapshot()
        }
    }

    /// Interpreter recovery counters.
    pub fn stats(&self) -> VtStats {
        self.vt.stats()
    }

    /// IO routing counters.
    pub fn io_stats(&self) -> IoStats {
        self.io.stats()
    }

    /// Context pushed at construction.
    pub fn root_io(&self) -> IoContext {
        self.root
    }

    /// The active IO context, if any.
    pub fn active_io(&self) -> Option<IoContext> {
        self.io.active()
    }

    /// Number of IO contexts on the stack.
    pub fn io_depth(&self) -> usize {
        self.io.depth()
    }

    /// Push a handler; its context becomes active.
    pub fn push_io(&mut self, handler: impl IoHandler + 'static) -> IoContext {
        self.io.push(Box::new(handler))
    }

    /// Pop `context`, restoring the context that was active before it.
    pub fn pop_io(&mut self, context: IoContext) -> Result<()> {
        self.io.pop(context)
    }

    /// Print `text` to the screen on behalf of `context`.
    ///
    /// Fails unless `context` is the active context.
    pub fn write(&mut self, context: IoContext, text: &str) -> Result<()> {
        if !self.io.is_active(context) {
            return Err(Error::InactiveContext(context.id()));
        }
        self.consume(text);
        Ok(())
    }

    /// [`Terminal::write`] followed by CR LF.
    pub fn writeln(&mut self, context: IoContext, text: &str) -> Result<()> {
        self.write(context, &format!("{text}\r\n"))
    }

    /// Route keystroke data to the active context.
    pub fn keystroke(&mut self, data: &str) -> Option<Dispatch> {
        self.io.dispatch_keystroke(data)
    }

    /// Send data towards the host through the active context.
    pub fn send_string(&mut self, data: &str) -> Option<Dispatch> {
        self.io.dispatch_output(data)
    }

    /// Resize the screen and notify the active context and subscribers.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        if size.is_empty() {
            return Err(Error::InvalidDimensions {
                columns: size.width,
                rows: size.height,
            });
        }
        if size == self.screen.size() {
            return Ok(());
        }

        self.screen.resize(size);
        self.prefs.columns = size.width;
        self.prefs.rows = size.height;
        self.io.dispatch_resize(size);
        self.events
            .publish(TOPIC_RESIZE, &TerminalEvent::Resize(size), None);
        Ok(())
    }

    /// Full reset of the screen and interpreter.
    pub fn reset(&mut self) {
        self.consume("\x1bc");
        self.vt.reset();
        self.decoder.reset();
    }

    /// Subscribe to one of the `TOPIC_*` topics.
    pub fn subscribe<F>(&mut self, topic: &str, callback: F)
    where
        F: FnMut(&TerminalEvent) -> anyhow::Result<()> + 'static,
    {
        self.events.subscribe(topic, callback);
    }

    fn flush_events(&mut self) {
        for event in self.vt.take_events() {
            match event {
                VtEvent::Reply(reply) => {
                    debug!(len = reply.len(), "sending reply");
                    self.io.dispatch_output(&reply);
                }
                VtEvent::Bell => {
                    self.events.publish(TOPIC_BELL, &TerminalEvent::Bell, None);
                }
                VtEvent::TitleChanged(title) => {
                    self.events
                        .publish(TOPIC_TITLE, &TerminalEvent::Title(title), None);
                }
                VtEvent::AlternateScreen(active) => {
                    self.events.publish(
                        TOPIC_ALTERNATE_SCREEN,
                        &TerminalEvent::AlternateScreen(active),
                        None,
                    );
                }
            }
        }
    }
}
