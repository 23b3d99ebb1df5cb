//! IO routing stack.
//!
//! Programs running "inside" the terminal (a shell, a login prompt, a nested
//! command) each push an IO context and receive keystrokes, host-bound
//! output and resize notifications while their context is on top. Popping a
//! context hands control back to whichever context was active when it was
//! pushed; handlers of popped contexts are dropped and never called again.

use std::fmt;

use tracing::{debug, warn};

use webterm_core::{ContextId, Error, Result, Size};

/// Whether a handler acted on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The handler consumed the event
    Claimed,
    /// The handler ignored the event (the default)
    Unclaimed,
}

/// Receiver for events routed to an IO context.
///
/// Every method has a default that logs the event and leaves it unclaimed,
/// so handlers only override what they care about.
pub trait IoHandler {
    /// Data the terminal sends towards the host: device reports and strings
    /// passed to `Terminal::send_string`.
    fn on_output(&mut self, data: &str) -> Dispatch {
        debug!(len = data.len(), "unhandled output");
        Dispatch::Unclaimed
    }

    /// Keystroke data typed by the user.
    fn on_keystroke(&mut self, data: &str) -> Dispatch {
        debug!(len = data.len(), "unhandled keystroke");
        Dispatch::Unclaimed
    }

    /// The terminal was resized.
    fn on_resize(&mut self, size: Size) -> Dispatch {
        debug!(columns = size.width, rows = size.height, "unhandled resize");
        Dispatch::Unclaimed
    }
}

/// Handler that claims nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHandler;

impl IoHandler for LoggingHandler {}

/// Handle to a pushed IO context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IoContext {
    id: ContextId,
}

impl IoContext {
    fn new() -> Self {
        Self {
            id: ContextId::new(),
        }
    }

    /// Identifier of this context.
    pub fn id(&self) -> ContextId {
        self.id
    }
}

impl fmt::Display for IoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

struct Frame {
    context: IoContext,
    previous: Option<IoContext>,
    handler: Box<dyn IoHandler>,
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("context", &self.context)
            .field("previous", &self.previous)
            .finish_non_exhaustive()
    }
}

/// Event routing counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoStats {
    /// Events a handler claimed
    pub claimed: u64,
    /// Events delivered to a handler that left them unclaimed
    pub unclaimed: u64,
    /// Events dropped because no context was active
    pub dropped: u64,
}

/// Stack of IO contexts; only the active one receives events.
#[derive(Debug, Default)]
pub struct IoStack {
    frames: Vec<Frame>,
    active: Option<IoContext>,
    stats: IoStats,
}

impl IoStack {
    /// Create an empty stack with no active context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a handler and make its context active.
    pub fn push(&mut self, handler: Box<dyn IoHandler>) -> IoContext {
        let context = IoContext::new();
        debug!(context = %context, depth = self.frames.len() + 1, "pushed IO context");
        self.frames.push(Frame {
            context,
            previous: self.active,
            handler,
        });
        self.active = Some(context);
        context
    }

    /// Pop `context`, making the context that was active when it was pushed
    /// active again.
    ///
    /// Contexts pushed after `context` are popped with it.
    pub fn pop(&mut self, context: IoContext) -> Result<()> {
        let position = self
            .frames
            .iter()
            .position(|frame| frame.context == context)
            .ok_or(Error::UnknownContext(context.id()))?;

        let above = self.frames.len() - position - 1;
        if above > 0 {
            warn!(context = %context, above, "popping IO context with contexts above it");
        }

        let previous = self.frames[position].previous;
        self.frames.truncate(position);
        self.active = previous;
        debug!(context = %context, depth = self.frames.len(), "popped IO context");
        Ok(())
    }

    /// The active context, if any.
    pub fn active(&self) -> Option<IoContext> {
        self.active
    }

    /// Whether `context` is the active context.
    pub fn is_active(&self, context: IoContext) -> bool {
        self.active == Some(context)
    }

    /// Whether `context` is on the stack.
    pub fn contains(&self, context: IoContext) -> bool {
        self.frames.iter().any(|frame| frame.context == context)
    }

    /// Number of contexts on the stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Routing counters.
    pub fn stats(&self) -> IoStats {
        self.stats
    }

    /// Route host-bound output to the active context.
    pub fn dispatch_output(&mut self, data: &str) -> Option<Dispatch> {
        self.dispatch("output", |handler| handler.on_output(data))
    }

    /// Route a keystroke to the active context.
    pub fn dispatch_keystroke(&mut self, data: &str) -> Option<Dispatch> {
        self.dispatch("keystroke", |handler| handler.on_keystroke(data))
    }

    /// Route a resize to the active context.
    pub fn dispatch_resize(&mut self, size: Size) -> Option<Dispatch> {
        self.dispatch("resize", |handler| handler.on_resize(size))
    }

    fn dispatch(
        &mut self,
        event: &'static str,
        deliver: impl FnOnce(&mut dyn IoHandler) -> Dispatch,
    ) -> Option<Dispatch> {
        let active = self.active;
        let Some(frame) = self
            .frames
            .iter_mut()
            .find(|frame| Some(frame.context) == active)
        else {
            debug!(event, "no active IO context, dropping event");
            self.stats.dropped += 1;
            return None;
        };

        let result = deliver(frame.handler.as_mut());
        match result {
            Dispatch::Claimed => self.stats.claimed += 1,
            Dispatch::Unclaimed => self.stats.unclaimed += 1,
        }
        Some(result)
    }
}
