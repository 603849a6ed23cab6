//! Host-facing picker control

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    color::PickedColor,
    models::{ConfigError, PickerConfig},
    picker::{
        hooks::{HookEvent, PickHooks},
        surface::InputSurface,
        InputEvent, PickError, PickSession, SessionError,
    },
    raster::Rasterizer,
};

pub type PickHandle = JoinHandle<Result<Option<PickedColor>, PickError>>;

/// Mounted picker control
///
/// Owns a [`PickSession`] for its whole lifetime. Clicking the control arms the session, and
/// captured clicks are completed on the tokio runtime. Dropping or unmounting the control
/// releases the surface and discards in-flight picks.
pub struct Picker<R: Rasterizer, S: InputSurface> {
    session: PickSession<R, S>,
    pass_through: Option<String>,
    colors: watch::Receiver<Option<PickedColor>>,
}

impl<R: Rasterizer, S: InputSurface> Picker<R, S> {
    pub fn mount(
        config: PickerConfig,
        hooks: Arc<PickHooks>,
        rasterizer: Arc<R>,
        surface: S,
    ) -> Result<Self, ConfigError> {
        let pass_through = config.pass_through.clone();
        let session = PickSession::new(config, hooks, rasterizer, surface)?;
        let colors = session.subscribe();

        session.hooks().fire(HookEvent::Init);
        debug!(pass_through = ?pass_through, "mounted picker");

        Ok(Self {
            session,
            pass_through,
            colors,
        })
    }

    /// Arms the picker, as done by clicking its button
    pub fn click(&mut self) -> Result<(), SessionError> {
        self.session.arm()
    }

    /// Forwards an input event, spawning the pick it completes, if any
    ///
    /// Must be called from within a tokio runtime.
    pub fn handle_event(&mut self, event: InputEvent<R::Target>) -> Option<PickHandle> {
        self.session
            .handle_event(event)
            .map(|pending| tokio::spawn(pending.run()))
    }

    /// Last picked color under the configured pass-through key
    ///
    /// `None` if no key is configured or nothing was picked yet.
    pub fn pass_through(&self) -> Option<(&str, PickedColor)> {
        let key = self.pass_through.as_deref()?;
        let color = self.colors.borrow().clone()?;
        Some((key, color))
    }

    /// Waits for the next picked color
    ///
    /// Returns `None` once the session is gone.
    pub async fn changed(&mut self) -> Option<PickedColor> {
        self.colors.changed().await.ok()?;
        self.colors.borrow().clone()
    }

    pub fn session(&self) -> &PickSession<R, S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PickSession<R, S> {
        &mut self.session
    }

    /// Releases the surface without firing hooks
    pub fn unmount(mut self) {
        self.session.shutdown();
        debug!("unmounted picker");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        image::RawImage,
        models::Color,
        picker::{surface::HeadlessSurface, SessionState},
        raster::ImageRasterizer,
    };

    fn rasterizer() -> Arc<ImageRasterizer> {
        Arc::new(
            ImageRasterizer::new()
                .with_image("canvas", RawImage::filled(4, 4, Color::new(12, 34, 56))),
        )
    }

    fn picker(
        config: PickerConfig,
        hooks: PickHooks,
    ) -> (Picker<ImageRasterizer, HeadlessSurface>, HeadlessSurface) {
        let surface = HeadlessSurface::new();
        let picker = Picker::mount(config, Arc::new(hooks), rasterizer(), surface.clone())
            .expect("failed to mount picker");

        (picker, surface)
    }

    #[test]
    fn mount_fires_init() {
        let inits = Arc::new(AtomicUsize::new(0));
        let hooks = PickHooks::new().on_init({
            let inits = inits.clone();
            move || {
                inits.fetch_add(1, Ordering::SeqCst);
            }
        });

        let (picker, surface) = picker(PickerConfig::default(), hooks);

        assert_eq!(inits.load(Ordering::SeqCst), 1);
        assert_eq!(picker.session().state(), SessionState::Idle);
        assert_eq!(surface.listener_count(), 0);
    }

    #[tokio::test]
    async fn pick_through_control() {
        let (mut picker, _surface) = picker(
            PickerConfig {
                pass_through: Some("color".to_owned()),
                ..Default::default()
            },
            PickHooks::new(),
        );

        assert!(picker.pass_through().is_none());

        picker.click().unwrap();
        let handle = picker
            .handle_event(InputEvent::click("canvas".to_owned(), 1, 1))
            .expect("click was not captured");
        let picked = handle.await.unwrap().unwrap().unwrap();

        assert_eq!(picked.hex, "#0c2238");
        assert_eq!(picker.changed().await, Some(picked.clone()));

        let (key, color) = picker.pass_through().expect("no pass-through value");
        assert_eq!(key, "color");
        assert_eq!(color, picked);
    }

    #[tokio::test]
    async fn pass_through_needs_key() {
        let (mut picker, _surface) = picker(PickerConfig::default(), PickHooks::new());

        picker.click().unwrap();
        let handle = picker
            .handle_event(InputEvent::click("canvas".to_owned(), 0, 0))
            .unwrap();
        handle.await.unwrap().unwrap();

        assert!(picker.pass_through().is_none());
        assert!(picker.session().last_color().is_some());
    }

    #[test]
    fn unmount_releases_surface() {
        let stops = Arc::new(AtomicUsize::new(0));
        let hooks = PickHooks::new().on_pick_stop({
            let stops = stops.clone();
            move || {
                stops.fetch_add(1, Ordering::SeqCst);
            }
        });
        let (mut picker, surface) = picker(PickerConfig::default(), hooks);

        picker.click().unwrap();
        assert_eq!(surface.cursor(), "copy");
        picker.unmount();

        assert_eq!(surface.listener_count(), 0);
        assert_eq!(surface.cursor(), "default");
        assert_eq!(stops.load(Ordering::SeqCst), 0);
    }
}
