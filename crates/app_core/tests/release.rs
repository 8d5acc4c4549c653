//! Every command execution path must release what it allocated.

use app_core::{
    Action, ActionType, Application, CommandEngine, CommandOutcome, CommandReporter, Context,
    Dispatcher, HelpOverlay, ImageId, ImageList, InfoBar, Keybind, Mode, RunStatus, Services, Ui,
};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::io;

/// System allocator tracking net allocated bytes per thread
struct Tracking;

thread_local! {
    static NET: Cell<isize> = const { Cell::new(0) };
}

fn account(delta: isize) {
    let _ = NET.try_with(|net| net.set(net.get() + delta));
}

unsafe impl GlobalAlloc for Tracking {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            account(layout.size() as isize);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        account(-(layout.size() as isize));
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new = System.realloc(ptr, layout, new_size);
        if !new.is_null() {
            account(new_size as isize - layout.size() as isize);
        }
        new
    }
}

#[global_allocator]
static ALLOCATOR: Tracking = Tracking;

fn net() -> isize {
    NET.with(Cell::get)
}

/// Status bar reusing one preallocated buffer
struct Status(String);

impl InfoBar for Status {
    fn update_status(&mut self, text: &str) {
        self.0.clear();
        self.0.push_str(text);
    }
    fn update_mark(&mut self, _marked: bool) {}
    fn switch_scheme(&mut self, _name: &str) {}
}

struct Nothing;

impl Ui for Nothing {
    fn toggle_fullscreen(&mut self) {}
}

impl Application for Nothing {
    fn redraw(&mut self) {}
    fn switch_mode(&mut self, _name: &str) {}
    fn exit(&mut self, _code: i32) {}
}

impl HelpOverlay for Nothing {
    fn is_visible(&self) -> bool {
        false
    }
    fn show(&mut self, _keybinds: &[Keybind]) {}
    fn hide(&mut self) {}
}

impl Mode for Nothing {
    fn name(&self) -> &str {
        "none"
    }
    fn current(&self) -> Option<ImageId> {
        Some(ImageId(0))
    }
    fn keybinds(&self) -> &[Keybind] {
        &[]
    }
    fn handle_action(&mut self, _ctx: &mut Context<'_>, _action: &Action) -> bool {
        false
    }
}

/// Engine producing fresh buffers on every run
struct Canned {
    status: RunStatus,
    stdout: Option<&'static [u8]>,
    stderr: Option<&'static [u8]>,
}

impl CommandEngine for Canned {
    fn build(&self, expr: &str, paths: &[&str]) -> Option<String> {
        if expr.trim().is_empty() {
            return None;
        }
        Some(format!("{} {}", expr, paths.join(" ")))
    }

    fn run(&self, _cmd: &str) -> CommandOutcome {
        CommandOutcome {
            status: self.status,
            stdout: self.stdout.map(<[u8]>::to_vec),
            stderr: self.stderr.map(<[u8]>::to_vec),
        }
    }
}

/// Net bytes left allocated by a reporter call, measured after a warm-up call
fn leaked_by_execute(engine: Canned, expr: &str) -> (isize, String) {
    let mut images = ImageList::from_sources(["a.jpg"]);
    let mut status = Status(String::with_capacity(1024));
    let mut nothing = Nothing;
    let mut ui = Nothing;
    let mut help = Nothing;
    let mut out = io::sink();
    let mut err = io::sink();
    let reporter = CommandReporter::default();

    let mut ctx = Context::new(
        &mut images,
        Services {
            info: &mut status,
            ui: &mut ui,
            app: &mut nothing,
            help: &mut help,
            engine: &engine,
            stdout: &mut out,
            stderr: &mut err,
        },
    );

    reporter.execute(&mut ctx.services, expr, &["a.jpg"]);

    let before = net();
    reporter.execute(&mut ctx.services, expr, &["a.jpg"]);
    let leaked = net() - before;

    drop(ctx);
    (leaked, status.0)
}

#[test]
fn test_build_failure_releases() {
    let engine = Canned {
        status: RunStatus::Success,
        stdout: None,
        stderr: None,
    };
    let (leaked, status) = leaked_by_execute(engine, "  ");
    assert_eq!(status, "Error: no command to execute");
    assert_eq!(leaked, 0);
}

#[test]
fn test_success_releases() {
    let engine = Canned {
        status: RunStatus::Success,
        stdout: Some(&b"some rather long output that will certainly be truncated by the reporter"[..]),
        stderr: Some(&b"warning"[..]),
    };
    let (leaked, status) = leaked_by_execute(engine, "echo");
    assert!(status.ends_with("..."));
    assert_eq!(leaked, 0);
}

#[test]
fn test_timeout_releases() {
    let engine = Canned {
        status: RunStatus::TimedOut,
        stdout: None,
        stderr: None,
    };
    let (leaked, status) = leaked_by_execute(engine, "sleep");
    assert_eq!(status, "Child process timed out: sleep a.jpg");
    assert_eq!(leaked, 0);
}

#[test]
fn test_failure_releases() {
    for (stdout, stderr) in [
        (None, None),
        (Some(&b"out"[..]), None),
        (Some(&b"out"[..]), Some(&b"err"[..])),
    ] {
        let engine = Canned {
            status: RunStatus::Failed(2),
            stdout,
            stderr,
        };
        let (leaked, status) = leaked_by_execute(engine, "false");
        assert!(status.starts_with("Error 2: "));
        assert_eq!(leaked, 0);
    }
}

#[test]
fn test_marked_paths_released() {
    let mut images = ImageList::from_sources(["a.jpg", "b.jpg", "c.jpg"]);
    images.toggle_marked(ImageId(0));
    images.toggle_marked(ImageId(2));

    let engine = Canned {
        status: RunStatus::Success,
        stdout: None,
        stderr: None,
    };
    let mut status = Status(String::with_capacity(1024));
    let mut app = Nothing;
    let mut ui = Nothing;
    let mut help = Nothing;
    let mut mode = Nothing;
    let mut out = io::sink();
    let mut err = io::sink();
    let dispatcher = Dispatcher::default();
    let action = Action::new(ActionType::ExecMarked).with_params("rm");

    let mut ctx = Context::new(
        &mut images,
        Services {
            info: &mut status,
            ui: &mut ui,
            app: &mut app,
            help: &mut help,
            engine: &engine,
            stdout: &mut out,
            stderr: &mut err,
        },
    );

    dispatcher.dispatch(&mut ctx, &mut mode, &action);

    let before = net();
    dispatcher.dispatch(&mut ctx, &mut mode, &action);
    let leaked = net() - before;

    drop(ctx);
    assert_eq!(status.0, "Success: rm a.jpg c.jpg");
    assert_eq!(leaked, 0);
}
