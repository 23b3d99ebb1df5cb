//! Integration tests for IO routing through the terminal.

use std::cell::RefCell;
use std::rc::Rc;

use webterm_core::{Error, RowCol, Size, TerminalPreferences};
use webterm_emulator::{Dispatch, IoHandler, IoStack, LoggingHandler, Terminal};

type Log = Rc<RefCell<Vec<String>>>;

/// Records every event it receives, tagged with its own name.
struct Recorder {
    name: &'static str,
    log: Log,
}

impl Recorder {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Rc::clone(log),
        }
    }
}

impl IoHandler for Recorder {
    fn on_output(&mut self, data: &str) -> Dispatch {
        self.log.borrow_mut().push(format!("{}:out:{data}", self.name));
        Dispatch::Claimed
    }

    fn on_keystroke(&mut self, data: &str) -> Dispatch {
        self.log.borrow_mut().push(format!("{}:key:{data}", self.name));
        Dispatch::Claimed
    }

    fn on_resize(&mut self, size: Size) -> Dispatch {
        self.log
            .borrow_mut()
            .push(format!("{}:resize:{}x{}", self.name, size.width, size.height));
        Dispatch::Claimed
    }
}

fn terminal() -> Terminal {
    Terminal::new(TerminalPreferences::default()).unwrap()
}

#[test]
fn test_hello_on_default_terminal() {
    let mut term = terminal();
    term.consume("hello\r\n");

    assert_eq!(term.screen().size(), Size::new(80, 24));
    assert_eq!(term.screen().cursor_position(), RowCol::new(1, 0));
    assert_eq!(term.snapshot().lines[0], "hello");
}

#[test]
fn test_three_contexts_unwind_in_order() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut term = terminal();
    let root = term.root_io();

    let shell = term.push_io(Recorder::new("shell", &log));
    let login = term.push_io(Recorder::new("login", &log));
    let prompt = term.push_io(Recorder::new("prompt", &log));
    assert_eq!(term.io_depth(), 4);

    term.keystroke("a");
    term.pop_io(prompt).unwrap();
    term.keystroke("b");
    term.pop_io(login).unwrap();
    term.keystroke("c");
    term.pop_io(shell).unwrap();

    assert_eq!(term.active_io(), Some(root));
    assert_eq!(term.keystroke("d"), Some(Dispatch::Unclaimed));
    assert_eq!(
        *log.borrow(),
        vec!["prompt:key:a", "login:key:b", "shell:key:c"]
    );
}

#[test]
fn test_only_active_context_may_print() {
    let mut term = terminal();
    let root = term.root_io();
    let child = term.push_io(LoggingHandler);
    let grandchild = term.push_io(LoggingHandler);

    for context in [root, child] {
        match term.write(context, "x") {
            Err(Error::InactiveContext(id)) => assert_eq!(id, context.id()),
            other => panic!("expected inactive context error, got {other:?}"),
        }
    }
    term.write(grandchild, "ok").unwrap();
    assert_eq!(term.snapshot().lines[0], "ok");

    // A popped context stays unable to print.
    term.pop_io(grandchild).unwrap();
    assert!(term.write(grandchild, "late").is_err());
    term.write(child, "!").unwrap();
    assert_eq!(term.snapshot().lines[0], "ok!");
}

#[test]
fn test_device_reports_reach_active_context() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut term = terminal();
    let outer = term.push_io(Recorder::new("outer", &log));
    let inner = term.push_io(Recorder::new("inner", &log));

    term.consume("\x1b[3;5H\x1b[6n");
    term.pop_io(inner).unwrap();
    term.consume("\x1b[5n");
    term.pop_io(outer).unwrap();
    term.consume("\x1b[c");

    assert_eq!(*log.borrow(), vec!["inner:out:\x1b[3;5R", "outer:out:\x1b[0n"]);
    let stats = term.io_stats();
    assert_eq!(stats.claimed, 2);
    assert_eq!(stats.unclaimed, 1);
}

#[test]
fn test_resize_notifies_active_context() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut term = terminal();
    term.push_io(Recorder::new("app", &log));

    term.resize(Size::new(120, 40)).unwrap();
    // Same size again is a no-op.
    term.resize(Size::new(120, 40)).unwrap();

    assert_eq!(*log.borrow(), vec!["app:resize:120x40"]);
}

#[test]
fn test_events_dropped_without_active_context() {
    let mut term = terminal();
    let root = term.root_io();
    term.pop_io(root).unwrap();

    assert_eq!(term.active_io(), None);
    assert_eq!(term.keystroke("q"), None);
    term.consume("\x1b[c");
    assert_eq!(term.io_stats().dropped, 2);
    assert!(matches!(
        term.write(root, "x"),
        Err(Error::InactiveContext(_))
    ));
}

#[test]
fn test_pop_unknown_context_fails() {
    let mut stack = IoStack::new();
    let ctx = stack.push(Box::new(LoggingHandler));
    stack.pop(ctx).unwrap();
    assert!(matches!(stack.pop(ctx), Err(Error::UnknownContext(id)) if id == ctx.id()));
}
