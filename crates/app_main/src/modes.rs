//! Viewer and gallery modes

use app_core::{Action, ActionType, AppError, Context, ImageId, ImageList, Keybind, Mode};
use std::fmt;
use std::str::FromStr;

/// Available modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Viewer,
    Gallery,
}

impl ModeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ModeKind::Viewer => "viewer",
            ModeKind::Gallery => "gallery",
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModeKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(ModeKind::Viewer),
            "gallery" => Ok(ModeKind::Gallery),
            _ => Err(AppError::UnknownMode(s.to_string())),
        }
    }
}

/// Move through the list, `None` if already at the edge
fn navigate(images: &ImageList, current: Option<ImageId>, kind: ActionType) -> Option<ImageId> {
    let target = match kind {
        ActionType::FirstFile => images.first(),
        ActionType::LastFile => images.last(),
        ActionType::PrevFile => current.and_then(|id| images.prev(id)),
        ActionType::NextFile => current.and_then(|id| images.next(id)),
        _ => None,
    };
    target.filter(|&id| Some(id) != current)
}

/// Handle a navigation action for `current`, returns false if `kind` is not one
fn handle_navigation(ctx: &mut Context<'_>, current: &mut Option<ImageId>, kind: ActionType) -> bool {
    if !matches!(
        kind,
        ActionType::FirstFile | ActionType::LastFile | ActionType::PrevFile | ActionType::NextFile
    ) {
        return false;
    }

    match navigate(ctx.images, *current, kind) {
        Some(id) => {
            *current = Some(id);
            let marked = ctx.images.is_marked(id);
            ctx.services.info.update_mark(marked);
        }
        None => ctx.services.set_status("No more files"),
    }
    ctx.services.redraw();
    true
}

/// Single image viewer
pub struct ViewerMode {
    current: Option<ImageId>,
    keybinds: Vec<Keybind>,
    /// Zoom in percent
    zoom: u32,
    /// Rotation in degrees
    rotation: u32,
}

impl ViewerMode {
    const ZOOM_MIN: u32 = 10;
    const ZOOM_MAX: u32 = 1000;

    pub fn new(keybinds: Vec<Keybind>, current: Option<ImageId>) -> Self {
        Self {
            current,
            keybinds,
            zoom: 100,
            rotation: 0,
        }
    }

    pub fn set_current(&mut self, current: Option<ImageId>) {
        self.current = current;
    }

    /// `+N`/`-N` relative, `N` absolute, empty resets
    fn apply_zoom(&mut self, params: &str) -> Option<u32> {
        let zoom = if params.is_empty() {
            100
        } else if let Some(delta) = params.strip_prefix('+') {
            self.zoom.saturating_add(delta.parse().ok()?)
        } else if let Some(delta) = params.strip_prefix('-') {
            self.zoom.saturating_sub(delta.parse().ok()?)
        } else {
            params.parse().ok()?
        };
        self.zoom = zoom.clamp(Self::ZOOM_MIN, Self::ZOOM_MAX);
        Some(self.zoom)
    }

    fn apply_rotation(&mut self, params: &str) -> Option<u32> {
        let angle: u32 = if params.is_empty() { 90 } else { params.parse().ok()? };
        if angle % 90 != 0 {
            return None;
        }
        self.rotation = (self.rotation + angle % 360) % 360;
        Some(self.rotation)
    }
}

impl Mode for ViewerMode {
    fn name(&self) -> &str {
        ModeKind::Viewer.name()
    }

    fn current(&self) -> Option<ImageId> {
        self.current
    }

    fn keybinds(&self) -> &[Keybind] {
        &self.keybinds
    }

    fn handle_action(&mut self, ctx: &mut Context<'_>, action: &Action) -> bool {
        if handle_navigation(ctx, &mut self.current, action.kind) {
            // New image starts unscaled
            self.zoom = 100;
            self.rotation = 0;
            return true;
        }

        let status = match action.kind {
            ActionType::Reload => match self.current.and_then(|id| ctx.images.get(id)) {
                Some(image) => format!("Reloaded {}", image.name()),
                None => app_core::NO_IMAGE.to_string(),
            },
            ActionType::Zoom => match self.apply_zoom(action.params()) {
                Some(zoom) => format!("Zoom: {}%", zoom),
                None => format!("Invalid zoom: {}", action.params()),
            },
            ActionType::Rotate => match self.apply_rotation(action.params()) {
                Some(angle) => format!("Rotation: {}°", angle),
                None => format!("Invalid rotation: {}", action.params()),
            },
            _ => return false,
        };

        ctx.services.set_status(&status);
        ctx.services.redraw();
        true
    }
}

/// Thumbnail gallery
pub struct GalleryMode {
    cursor: Option<ImageId>,
    keybinds: Vec<Keybind>,
}

impl GalleryMode {
    pub fn new(keybinds: Vec<Keybind>, cursor: Option<ImageId>) -> Self {
        Self { cursor, keybinds }
    }

    pub fn set_current(&mut self, cursor: Option<ImageId>) {
        self.cursor = cursor;
    }
}

impl Mode for GalleryMode {
    fn name(&self) -> &str {
        ModeKind::Gallery.name()
    }

    fn current(&self) -> Option<ImageId> {
        self.cursor
    }

    fn keybinds(&self) -> &[Keybind] {
        &self.keybinds
    }

    fn handle_action(&mut self, ctx: &mut Context<'_>, action: &Action) -> bool {
        handle_navigation(ctx, &mut self.cursor, action.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_kind() {
        assert_eq!("gallery".parse::<ModeKind>().unwrap(), ModeKind::Gallery);
        assert!(matches!(
            "slideshow".parse::<ModeKind>(),
            Err(AppError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_navigate() {
        let images = ImageList::from_sources(["a", "b", "c"]);
        let at = |i| Some(ImageId(i));

        assert_eq!(navigate(&images, at(1), ActionType::NextFile), at(2));
        assert_eq!(navigate(&images, at(2), ActionType::NextFile), None);
        assert_eq!(navigate(&images, at(0), ActionType::PrevFile), None);
        assert_eq!(navigate(&images, at(2), ActionType::FirstFile), at(0));
        assert_eq!(navigate(&images, at(0), ActionType::FirstFile), None);
        assert_eq!(navigate(&images, at(0), ActionType::LastFile), at(2));
        assert_eq!(navigate(&ImageList::new(), None, ActionType::LastFile), None);
    }

    #[test]
    fn test_zoom() {
        let mut viewer = ViewerMode::new(Vec::new(), None);
        assert_eq!(viewer.apply_zoom("+50"), Some(150));
        assert_eq!(viewer.apply_zoom("-200"), Some(ViewerMode::ZOOM_MIN));
        assert_eq!(viewer.apply_zoom("5000"), Some(ViewerMode::ZOOM_MAX));
        assert_eq!(viewer.apply_zoom(""), Some(100));
        assert_eq!(viewer.apply_zoom("big"), None);
        assert_eq!(viewer.zoom, 100);
    }

    #[test]
    fn test_rotation() {
        let mut viewer = ViewerMode::new(Vec::new(), None);
        assert_eq!(viewer.apply_rotation(""), Some(90));
        assert_eq!(viewer.apply_rotation("270"), Some(0));
        assert_eq!(viewer.apply_rotation("45"), None);
        assert_eq!(viewer.rotation, 0);
    }

    #[test]
    fn test_rotation_huge_angle() {
        let mut viewer = ViewerMode::new(Vec::new(), None);
        assert_eq!(viewer.apply_rotation("90"), Some(90));
        // 4294967220 = 360 * 11930464 + 180
        assert_eq!(viewer.apply_rotation("4294967220"), Some(270));
    }
}
