use parse_display::Display;

use crate::{color::PickedColor, models::Point};

use super::PickError;

type Hook = Box<dyn Fn() + Send + Sync>;
type ColorHook = Box<dyn Fn(&PickedColor) + Send + Sync>;

/// Lifecycle point at which a hook fires
#[derive(Display, Debug, Clone, Copy)]
pub enum HookEvent<'e> {
    #[display("init")]
    Init,
    #[display("pick-start")]
    PickStart,
    #[display("pick-click {0}")]
    PickClick(Point),
    #[display("pick-stop")]
    PickStop,
    #[display("pick-end")]
    PickEnd(&'e PickedColor),
    #[display("pick-cancel")]
    PickCancel,
    #[display("pick-error")]
    PickError(&'e PickError),
    #[display("change")]
    Change(&'e PickedColor),
}

/// Optional host callbacks
///
/// Over a full pick they fire in the order `init` (on mount), `pick_start`, `pick_click`,
/// `pick_stop`, then the result callback and `pick_end` once the color is known.
/// `pick_cancel` replaces the click path when the pick is cancelled. Unset hooks are skipped.
#[derive(Default)]
pub struct PickHooks {
    init: Option<Hook>,
    pick_start: Option<Hook>,
    pick_click: Option<Box<dyn Fn(Point) + Send + Sync>>,
    pick_stop: Option<Hook>,
    pick_end: Option<ColorHook>,
    pick_cancel: Option<Hook>,
    pick_error: Option<Box<dyn Fn(&PickError) + Send + Sync>>,
    change: Option<ColorHook>,
}

impl PickHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_init(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.init = Some(Box::new(f));
        self
    }

    pub fn on_pick_start(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.pick_start = Some(Box::new(f));
        self
    }

    pub fn on_pick_click(mut self, f: impl Fn(Point) + Send + Sync + 'static) -> Self {
        self.pick_click = Some(Box::new(f));
        self
    }

    pub fn on_pick_stop(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.pick_stop = Some(Box::new(f));
        self
    }

    pub fn on_pick_end(mut self, f: impl Fn(&PickedColor) + Send + Sync + 'static) -> Self {
        self.pick_end = Some(Box::new(f));
        self
    }

    pub fn on_pick_cancel(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.pick_cancel = Some(Box::new(f));
        self
    }

    pub fn on_pick_error(mut self, f: impl Fn(&PickError) + Send + Sync + 'static) -> Self {
        self.pick_error = Some(Box::new(f));
        self
    }

    /// Result callback, called once per completed pick
    pub fn on_change(mut self, f: impl Fn(&PickedColor) + Send + Sync + 'static) -> Self {
        self.change = Some(Box::new(f));
        self
    }

    pub(crate) fn fire(&self, event: HookEvent<'_>) {
        let fired = match event {
            HookEvent::Init => self.init.as_ref().map(|f| f()),
            HookEvent::PickStart => self.pick_start.as_ref().map(|f| f()),
            HookEvent::PickClick(offset) => self.pick_click.as_ref().map(|f| f(offset)),
            HookEvent::PickStop => self.pick_stop.as_ref().map(|f| f()),
            HookEvent::PickEnd(color) => self.pick_end.as_ref().map(|f| f(color)),
            HookEvent::PickCancel => self.pick_cancel.as_ref().map(|f| f()),
            HookEvent::PickError(error) => self.pick_error.as_ref().map(|f| f(error)),
            HookEvent::Change(color) => self.change.as_ref().map(|f| f(color)),
        };

        match fired {
            Some(()) => trace!(event = %event, "fired hook"),
            None => {
                // No hook for this event
            }
        }
    }
}

impl std::fmt::Debug for PickHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickHooks")
            .field("init", &self.init.is_some())
            .field("pick_start", &self.pick_start.is_some())
            .field("pick_click", &self.pick_click.is_some())
            .field("pick_stop", &self.pick_stop.is_some())
            .field("pick_end", &self.pick_end.is_some())
            .field("pick_cancel", &self.pick_cancel.is_some())
            .field("pick_error", &self.pick_error.is_some())
            .field("change", &self.change.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::models::{Color, RgbChannelOrder};

    #[test]
    fn unset_hooks_are_skipped() {
        let ends = Arc::new(AtomicUsize::new(0));
        let hooks = PickHooks::new().on_pick_end({
            let ends = ends.clone();
            move |_| {
                ends.fetch_add(1, Ordering::SeqCst);
            }
        });
        let picked = PickedColor::new(Color::new(0, 0, 0), RgbChannelOrder::Legacy);

        hooks.fire(HookEvent::Init);
        hooks.fire(HookEvent::Change(&picked));
        assert_eq!(ends.load(Ordering::SeqCst), 0);

        hooks.fire(HookEvent::PickEnd(&picked));
        assert_eq!(ends.load(Ordering::SeqCst), 1);

        let debug = format!("{:?}", hooks);
        assert!(debug.contains("init: false"));
        assert!(debug.contains("pick_end: true"));
    }

    #[test]
    fn fire_matching_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let hooks = PickHooks::new().on_pick_click({
            let calls = calls.clone();
            move |offset| {
                assert_eq!(offset, Point::new(3, 4));
                calls.fetch_add(1, Ordering::SeqCst);
            }
        });

        hooks.fire(HookEvent::PickStart);
        hooks.fire(HookEvent::PickClick(Point::new(3, 4)));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(format!("{:?}", hooks).contains("pick_click: true"));
    }
}
