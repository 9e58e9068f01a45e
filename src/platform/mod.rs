//! Platform abstraction layer
//!
//! Browser glue for:
//! - Time and frame scheduling (`performance.now`, `requestAnimationFrame`)
//! - Viewport size
//!
//! Storage lives in [`crate::persistence`]. Native builds drive the game with
//! [`crate::sim::FixedStepScheduler`] instead.

#[cfg(target_arch = "wasm32")]
mod browser {
    use crate::Viewport;
    use crate::sim::Scheduler;

    /// Scheduler backed by `performance.now()`. Frame requests are recorded
    /// here and turned into `requestAnimationFrame` calls by the entry point.
    #[derive(Debug, Clone)]
    pub struct BrowserScheduler {
        performance: Option<web_sys::Performance>,
        pending: bool,
    }

    impl BrowserScheduler {
        pub fn new() -> Self {
            let performance = web_sys::window().and_then(|w| w.performance());
            if performance.is_none() {
                log::warn!("performance.now unavailable, falling back to Date.now");
            }
            Self {
                performance,
                pending: false,
            }
        }
    }

    impl Default for BrowserScheduler {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Scheduler for BrowserScheduler {
        fn now(&self) -> f64 {
            match &self.performance {
                Some(p) => p.now(),
                None => js_sys::Date::now(),
            }
        }

        fn request_frame(&mut self) {
            self.pending = true;
        }

        fn take_frame_request(&mut self) -> bool {
            std::mem::take(&mut self.pending)
        }
    }

    /// Current window inner size, or the default viewport if unavailable
    pub fn viewport_size() -> Viewport {
        let Some(window) = web_sys::window() else {
            return Viewport::default();
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64());
        let height = window.inner_height().ok().and_then(|v| v.as_f64());
        match (width, height) {
            (Some(w), Some(h)) => Viewport::new(w as f32, h as f32),
            _ => Viewport::default(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserScheduler, viewport_size};
