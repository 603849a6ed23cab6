//! Pick lifecycle: arming, click capture, sampling and reporting
//!
//! A [`PickSession`] goes from `Idle` to `Armed` when the host arms it. While armed it
//! listens for clicks and for the cancel key on its [`InputSurface`]. A click is captured
//! by value, the session tears its listeners down right away and hands back a
//! [`PendingPick`], which rasterizes the clicked target and samples it in the background.

use std::{
    convert::TryFrom,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use parse_display::Display;
use thiserror::Error;
use tokio::sync::watch;
use validator::Validate;

use crate::{
    color::{self, PickedColor},
    image::{Neighborhood, PixelReader},
    models::{Color, ConfigError, PickerConfig, Point, RgbChannelOrder},
    raster::{RasterizeError, Rasterizer},
};

pub mod event;
pub use event::*;

pub mod hooks;
use hooks::{HookEvent, PickHooks};

pub mod surface;
use surface::{InputSurface, ListenerId};

/// Observable state of a [`PickSession`]
///
/// `Sampling` is transient: a captured click tears the session down before
/// [`PickSession::handle_event`] returns, so hosts see `Idle` right after a click. The
/// capture itself continues in the returned [`PendingPick`].
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
#[display(style = "lowercase")]
pub enum SessionState {
    Idle,
    Armed,
    Sampling,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot arm a session which is not idle (state: {0})")]
    NotIdle(SessionState),
}

#[derive(Debug, Error)]
pub enum PickError {
    #[error("rasterization failed: {0}")]
    Rasterize(#[from] RasterizeError),
    #[error("no pixel at {0}")]
    OutOfBounds(Point),
    #[error("no pixel in the neighborhood of {0}")]
    NoSamples(Point),
}

/// Resources held while listening for a click
#[derive(Debug)]
struct Armed {
    /// Pointer style to restore on teardown
    restore_cursor: String,
    /// Listeners registered on the input surface
    listeners: Vec<(ListenerKind, ListenerId)>,
}

impl Armed {
    fn listens_to(&self, kind: ListenerKind) -> bool {
        self.listeners.iter().any(|(k, _)| *k == kind)
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Armed(Armed),
    Sampling(Armed),
}

pub struct PickSession<R: Rasterizer, S: InputSurface> {
    config: Arc<PickerConfig>,
    neighborhood: Option<Neighborhood>,
    hooks: Arc<PickHooks>,
    rasterizer: Arc<R>,
    surface: S,
    phase: Phase,
    generation: Arc<AtomicU64>,
    last_color: Arc<watch::Sender<Option<PickedColor>>>,
}

impl<R: Rasterizer, S: InputSurface> PickSession<R, S> {
    /// Creates an idle session
    ///
    /// The configuration is validated here, so an invalid neighborhood is reported before
    /// anything touches the surface or the rasterizer.
    pub fn new(
        config: PickerConfig,
        hooks: Arc<PickHooks>,
        rasterizer: Arc<R>,
        surface: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let neighborhood = config.neighborhood()?;
        let (last_color, _) = watch::channel(None);

        Ok(Self {
            config: Arc::new(config),
            neighborhood,
            hooks,
            rasterizer,
            surface,
            phase: Phase::Idle,
            generation: Arc::new(AtomicU64::new(0)),
            last_color: Arc::new(last_color),
        })
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Idle => SessionState::Idle,
            Phase::Armed(_) => SessionState::Armed,
            Phase::Sampling(_) => SessionState::Sampling,
        }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn hooks(&self) -> &Arc<PickHooks> {
        &self.hooks
    }

    /// Last color reported by a completed pick of this session
    pub fn last_color(&self) -> Option<PickedColor> {
        self.last_color.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<PickedColor>> {
        self.last_color.subscribe()
    }

    /// Starts listening for a click
    pub fn arm(&mut self) -> Result<(), SessionError> {
        let state = self.state();
        if state != SessionState::Idle {
            return Err(SessionError::NotIdle(state));
        }

        self.hooks.fire(HookEvent::PickStart);
        self.surface.set_cursor(&self.config.cursor_active);

        let listeners = [ListenerKind::Click, ListenerKind::Key]
            .iter()
            .map(|&kind| (kind, self.surface.add_listener(kind)))
            .collect();

        self.phase = Phase::Armed(Armed {
            restore_cursor: self.config.cursor_inactive.clone(),
            listeners,
        });

        debug!(cursor = %self.config.cursor_active, "armed pick session");
        Ok(())
    }

    /// Delivers an input event to the session
    ///
    /// Events are dropped unless a listener for them is registered. A click returns the
    /// pending pick, which must be run to completion to report the color.
    pub fn handle_event(&mut self, event: InputEvent<R::Target>) -> Option<PendingPick<R>> {
        let listening = match &self.phase {
            Phase::Armed(armed) => armed.listens_to(event.kind()),
            _ => false,
        };

        if !listening {
            trace!(kind = %event.kind(), state = %self.state(), "no listener for event");
            return None;
        }

        match event {
            InputEvent::Key(KeyEvent { key }) => {
                if key == self.config.cancel_key {
                    self.cancel();
                }

                None
            }
            InputEvent::Click(click) => Some(self.capture(click)),
        }
    }

    /// Cancels an armed pick without reporting a color
    ///
    /// Returns `false`, and fires nothing, when the session is not armed.
    pub fn cancel(&mut self) -> bool {
        if self.state() != SessionState::Armed {
            return false;
        }

        self.hooks.fire(HookEvent::PickCancel);
        self.teardown(true);
        true
    }

    /// Removes listeners, restores the cursor and fires `pick_stop`
    ///
    /// No-op when the session is idle.
    pub fn disarm(&mut self) -> bool {
        self.teardown(true)
    }

    /// Releases every surface resource and invalidates in-flight picks, without firing hooks
    pub fn shutdown(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);

        if self.teardown(false) {
            debug!("pick session shut down while armed");
        }
    }

    fn capture(&mut self, click: ClickEvent<R::Target>) -> PendingPick<R> {
        self.hooks.fire(HookEvent::PickClick(click.offset));

        if let Phase::Armed(armed) = std::mem::replace(&mut self.phase, Phase::Idle) {
            self.phase = Phase::Sampling(armed);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            click_target = ?click.target,
            offset = %click.offset,
            generation,
            "captured click"
        );

        // The surface is released before the capture completes
        self.teardown(true);

        PendingPick {
            click,
            neighborhood: self.neighborhood,
            channel_order: self.config.rgb_channel_order,
            rasterizer: self.rasterizer.clone(),
            hooks: self.hooks.clone(),
            generation,
            current_generation: self.generation.clone(),
            last_color: self.last_color.clone(),
        }
    }

    fn teardown(&mut self, fire_stop: bool) -> bool {
        let armed = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => return false,
            Phase::Armed(armed) | Phase::Sampling(armed) => armed,
        };

        for (_, id) in armed.listeners {
            self.surface.remove_listener(id);
        }

        self.surface.set_cursor(&armed.restore_cursor);

        if fire_stop {
            self.hooks.fire(HookEvent::PickStop);
        }

        debug!(cursor = %armed.restore_cursor, "disarmed pick session");
        true
    }
}

impl<R: Rasterizer, S: InputSurface> Drop for PickSession<R, S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Rasterization and sampling of a captured click
///
/// Holds the click by value: later layout changes on the host side do not affect it.
pub struct PendingPick<R: Rasterizer> {
    click: ClickEvent<R::Target>,
    neighborhood: Option<Neighborhood>,
    channel_order: RgbChannelOrder,
    rasterizer: Arc<R>,
    hooks: Arc<PickHooks>,
    generation: u64,
    current_generation: Arc<AtomicU64>,
    last_color: Arc<watch::Sender<Option<PickedColor>>>,
}

impl<R: Rasterizer> PendingPick<R> {
    pub fn target(&self) -> &R::Target {
        &self.click.target
    }

    pub fn offset(&self) -> Point {
        self.click.offset
    }

    /// `true` once the session was shut down or captured a newer click
    pub fn is_stale(&self) -> bool {
        self.current_generation.load(Ordering::SeqCst) != self.generation
    }

    /// Completes the pick
    ///
    /// Returns `Ok(None)` when the result is stale and was discarded. Failures are also
    /// reported through the `pick_error` hook.
    pub async fn run(self) -> Result<Option<PickedColor>, PickError> {
        let result = self.sample().await;

        if self.is_stale() {
            debug!(generation = self.generation, "discarding stale pick");
            return Ok(None);
        }

        match result {
            Ok(color) => {
                let picked = PickedColor::new(color, self.channel_order);
                info!(rgb = %picked.rgb, hex = %picked.hex, "picked color");

                self.hooks.fire(HookEvent::Change(&picked));
                self.last_color.send_replace(Some(picked.clone()));
                self.hooks.fire(HookEvent::PickEnd(&picked));

                Ok(Some(picked))
            }
            Err(error) => {
                warn!(error = %error, click_target = ?self.click.target, "pick failed");
                self.hooks.fire(HookEvent::PickError(&error));

                Err(error)
            }
        }
    }

    async fn sample(&self) -> Result<Color, PickError> {
        let bitmap = self.rasterizer.rasterize(&self.click.target).await?;
        let offset = self.click.offset;

        match &self.neighborhood {
            Some(neighborhood) => {
                let samples = neighborhood.gather(&bitmap, offset);
                trace!(count = samples.len(), "gathered samples");

                color::aggregate(&samples).ok_or(PickError::NoSamples(offset))
            }
            None => {
                let x = u32::try_from(offset.x).map_err(|_| PickError::OutOfBounds(offset))?;
                let y = u32::try_from(offset.y).map_err(|_| PickError::OutOfBounds(offset))?;

                bitmap
                    .color_at(x, y)
                    .ok_or(PickError::OutOfBounds(offset))
            }
        }
    }
}
