//! Action dispatcher: handles actions common to every mode

use crate::context::{Context, Mode};
use crate::paths::collect_marked_paths;
use crate::reporter::CommandReporter;
use crate::{Action, ActionType};

/// Status shown when an action needs an image but there is none
pub const NO_IMAGE: &str = "No image";

/// Routes actions to built-in handlers, the command reporter, or the mode
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    reporter: CommandReporter,
}

impl Dispatcher {
    pub fn new(reporter: CommandReporter) -> Self {
        Self { reporter }
    }

    pub fn reporter(&self) -> &CommandReporter {
        &self.reporter
    }

    /// Handle one action in the context of the active mode
    pub fn dispatch(&self, ctx: &mut Context<'_>, mode: &mut dyn Mode, action: &Action) {
        tracing::debug!("Dispatch {} in {} mode", action, mode.name());

        match action.kind {
            ActionType::Info => {
                ctx.services.info.switch_scheme(action.params());
                ctx.services.redraw();
            }
            ActionType::Status => {
                ctx.services.set_status(action.params());
                ctx.services.redraw();
            }
            ActionType::Fullscreen => ctx.services.ui.toggle_fullscreen(),
            ActionType::Mode => ctx.services.app.switch_mode(action.params()),
            ActionType::Exec => self.exec_current(ctx, &*mode, action.params()),
            ActionType::Mark => toggle_mark(ctx, &*mode),
            ActionType::ExecMarked => {
                if let Some(paths) = collect_marked_paths(ctx.images) {
                    self.reporter.execute(&mut ctx.services, action.params(), &paths);
                } else {
                    tracing::debug!("No marked images, nothing to execute");
                }
            }
            ActionType::Help => {
                if ctx.services.help.is_visible() {
                    ctx.services.help.hide();
                } else {
                    ctx.services.help.show(mode.keybinds());
                }
                ctx.services.redraw();
            }
            ActionType::Exit => {
                if ctx.services.help.is_visible() {
                    ctx.services.help.hide();
                    ctx.services.redraw();
                } else {
                    ctx.services.app.exit(0);
                }
            }
            _ => {
                if !mode.handle_action(ctx, action) {
                    tracing::debug!("Action {} not handled by {} mode", action.kind, mode.name());
                    ctx.services
                        .set_status(&format!("Unhandled action: {}", action.kind));
                    ctx.services.redraw();
                }
            }
        }
    }

    fn exec_current(&self, ctx: &mut Context<'_>, mode: &dyn Mode, expr: &str) {
        let current = mode.current().and_then(|id| ctx.images.get(id));
        match current {
            Some(image) => {
                self.reporter.execute(&mut ctx.services, expr, &[image.source()]);
            }
            None => no_image(ctx),
        }
    }
}

fn toggle_mark(ctx: &mut Context<'_>, mode: &dyn Mode) {
    match mode.current().and_then(|id| ctx.images.toggle_marked(id)) {
        Some(marked) => {
            ctx.services.info.update_mark(marked);
            ctx.services.redraw();
        }
        None => no_image(ctx),
    }
}

fn no_image(ctx: &mut Context<'_>) {
    ctx.services.set_status(NO_IMAGE);
    ctx.services.redraw();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fakes::{FakeEngine, Harness};
    use crate::{HelpOverlay, ImageId, Keybind};
    use app_shell::{CommandOutcome, RunStatus};

    /// Mode handling `next_file` only
    struct TestMode {
        current: Option<ImageId>,
        keybinds: Vec<Keybind>,
        handled: Vec<ActionType>,
    }

    impl TestMode {
        fn new(current: Option<usize>) -> Self {
            Self {
                current: current.map(ImageId),
                keybinds: vec![
                    Keybind::new("F1", vec![Action::new(ActionType::Help)]),
                    Keybind::new("Escape", vec![Action::new(ActionType::Exit)]),
                ],
                handled: Vec::new(),
            }
        }
    }

    impl Mode for TestMode {
        fn name(&self) -> &str {
            "test"
        }

        fn current(&self) -> Option<ImageId> {
            self.current
        }

        fn keybinds(&self) -> &[Keybind] {
            &self.keybinds
        }

        fn handle_action(&mut self, ctx: &mut Context<'_>, action: &Action) -> bool {
            if action.kind != ActionType::NextFile {
                return false;
            }
            self.handled.push(action.kind);
            self.current = self.current.and_then(|id| ctx.images.next(id));
            true
        }
    }

    fn dispatch(h: &mut Harness, mode: &mut TestMode, text: &str) {
        let action = Action::parse(text).unwrap();
        let mut ctx = h.context();
        Dispatcher::default().dispatch(&mut ctx, mode, &action);
    }

    fn harness() -> Harness {
        Harness::new(&["a.jpg", "b.jpg", "c.jpg"], FakeEngine::success())
    }

    #[test]
    fn test_info_and_status() {
        let mut h = harness();
        let mut mode = TestMode::new(Some(0));

        dispatch(&mut h, &mut mode, "info viewer");
        assert_eq!(h.info.scheme.as_deref(), Some("viewer"));

        dispatch(&mut h, &mut mode, "status Hello there");
        assert_eq!(h.status(), "Hello there");
        assert_eq!(h.app.redraws, 2);
    }

    #[test]
    fn test_fullscreen_and_mode() {
        let mut h = harness();
        let mut mode = TestMode::new(Some(0));

        dispatch(&mut h, &mut mode, "fullscreen");
        assert!(h.ui.fullscreen);
        dispatch(&mut h, &mut mode, "mode gallery");
        assert_eq!(h.app.mode.as_deref(), Some("gallery"));
        // Neither requests a redraw itself
        assert_eq!(h.app.redraws, 0);
    }

    #[test]
    fn test_exec_current() {
        let mut h = harness();
        let mut mode = TestMode::new(Some(1));

        dispatch(&mut h, &mut mode, "exec echo %");
        assert_eq!(*h.engine.built.borrow(), ["echo b.jpg"]);
        assert_eq!(h.status(), "Success: echo b.jpg");
        assert_eq!(h.app.redraws, 1);
    }

    #[test]
    fn test_exec_without_image() {
        let mut h = Harness::new(&[], FakeEngine::success());
        let mut mode = TestMode::new(None);

        dispatch(&mut h, &mut mode, "exec echo %");
        assert_eq!(h.status(), NO_IMAGE);
        assert_eq!(h.engine.runs.get(), 0);
    }

    #[test]
    fn test_toggle_mark() {
        let mut h = harness();
        let mut mode = TestMode::new(Some(2));

        dispatch(&mut h, &mut mode, "mark");
        assert_eq!(h.info.mark, Some(true));
        assert!(h.images.is_marked(ImageId(2)));

        dispatch(&mut h, &mut mode, "mark");
        assert_eq!(h.info.mark, Some(false));
        assert!(!h.images.is_marked(ImageId(2)));
        assert_eq!(h.app.redraws, 2);
    }

    #[test]
    fn test_exec_marked() {
        let mut h = harness();
        h.images.toggle_marked(ImageId(2));
        h.images.toggle_marked(ImageId(0));
        let mut mode = TestMode::new(Some(1));

        dispatch(&mut h, &mut mode, "exec_marked rm %");
        assert_eq!(*h.engine.built.borrow(), ["rm a.jpg c.jpg"]);
        assert_eq!(h.engine.runs.get(), 1);
        assert_eq!(h.app.redraws, 1);
    }

    #[test]
    fn test_exec_marked_nothing_marked() {
        let mut h = harness();
        let mut mode = TestMode::new(Some(1));

        dispatch(&mut h, &mut mode, "exec_marked rm %");
        assert!(h.engine.built.borrow().is_empty());
        assert_eq!(h.engine.runs.get(), 0);
        assert!(h.info.status.is_none());
        assert_eq!(h.app.redraws, 0);
    }

    #[test]
    fn test_exec_reports_failure() {
        let engine = FakeEngine::new(CommandOutcome {
            status: RunStatus::Failed(127),
            stdout: None,
            stderr: Some(b"sh: nope: not found\n".to_vec()),
        });
        let mut h = Harness::new(&["a.jpg"], engine);
        let mut mode = TestMode::new(Some(0));

        dispatch(&mut h, &mut mode, "exec nope %");
        assert_eq!(h.status(), "Error 127: sh: nope: not found\n");
        assert_eq!(h.stderr, b"sh: nope: not found\n");
    }

    #[test]
    fn test_help_toggle() {
        let mut h = harness();
        let mut mode = TestMode::new(Some(0));

        dispatch(&mut h, &mut mode, "help");
        assert_eq!(h.help.shown.as_deref(), Some(&["F1".to_string(), "Escape".to_string()][..]));

        dispatch(&mut h, &mut mode, "help");
        assert!(h.help.shown.is_none());
        assert_eq!(h.app.redraws, 2);
    }

    #[test]
    fn test_exit_closes_help_first() {
        let mut h = harness();
        let mut mode = TestMode::new(Some(0));

        dispatch(&mut h, &mut mode, "help");
        dispatch(&mut h, &mut mode, "exit");
        assert!(!h.help.is_visible());
        assert!(h.app.exit_code.is_none());

        dispatch(&mut h, &mut mode, "exit");
        assert_eq!(h.app.exit_code, Some(0));
    }

    #[test]
    fn test_mode_specific_action() {
        let mut h = harness();
        let mut mode = TestMode::new(Some(0));

        dispatch(&mut h, &mut mode, "next_file");
        assert_eq!(mode.handled, [ActionType::NextFile]);
        assert_eq!(mode.current, Some(ImageId(1)));
        assert!(h.info.status.is_none());
    }

    #[test]
    fn test_unhandled_action() {
        let mut h = harness();
        let mut mode = TestMode::new(Some(0));

        dispatch(&mut h, &mut mode, "zoom 150");
        assert_eq!(h.status(), "Unhandled action: zoom");
        assert_eq!(h.app.redraws, 1);
        assert!(mode.handled.is_empty());
    }
}
