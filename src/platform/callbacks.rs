//! Owned browser callbacks
//!
//! Every closure handed to the browser is owned here and detached when
//! dropped: event listeners are removed, pending animation frames and
//! timeouts are cancelled. Nothing is leaked with `Closure::forget`.

use std::cell::Cell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget, Window};

use super::MountError;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// Event listeners registered by one mounted page
#[derive(Default)]
pub struct Listeners {
    entries: Vec<Listener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), MountError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        self.entries.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    /// Listener that promises never to call `preventDefault`, so scrolling
    /// isn't held up waiting for it
    pub fn add_passive(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), MountError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        self.entries.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Detach everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A `requestAnimationFrame` callback that can be re-armed from inside itself
pub struct FrameLoop {
    window: Window,
    callback: Closure<dyn FnMut(f64)>,
    pending: Cell<Option<i32>>,
}

impl FrameLoop {
    pub fn new(window: Window, tick: impl FnMut(f64) + 'static) -> Self {
        Self {
            window,
            callback: Closure::<dyn FnMut(f64)>::new(tick),
            pending: Cell::new(None),
        }
    }

    /// Ask for a frame unless one is already pending
    pub fn request(&self) {
        if self.pending.get().is_some() {
            return;
        }
        match self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            Ok(id) => self.pending.set(Some(id)),
            Err(err) => log::warn!("requestAnimationFrame failed: {:?}", err),
        }
    }

    /// Call first thing in the tick: the frame being served is no longer pending
    pub fn begin(&self) {
        self.pending.set(None);
    }

    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A re-schedulable `setTimeout`
pub struct Timer {
    window: Window,
    callback: Closure<dyn FnMut()>,
    pending: Cell<Option<i32>>,
}

impl Timer {
    pub fn new(window: Window, fire: impl FnMut() + 'static) -> Self {
        Self {
            window,
            callback: Closure::<dyn FnMut()>::new(fire),
            pending: Cell::new(None),
        }
    }

    /// Fire once after `delay_ms`, replacing any earlier schedule
    pub fn schedule(&self, delay_ms: f64) {
        self.cancel();
        let delay = delay_ms.max(0.0).ceil() as i32;
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                self.callback.as_ref().unchecked_ref(),
                delay,
            ) {
            Ok(id) => self.pending.set(Some(id)),
            Err(err) => log::warn!("setTimeout failed: {:?}", err),
        }
    }

    /// Call first thing in the callback
    pub fn begin(&self) {
        self.pending.set(None);
    }

    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            self.window.clear_timeout_with_handle(id);
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}
