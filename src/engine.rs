//=========================================================================
// Strata Engine
//
// Frame-stepped facade over the screen stack.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──frame()──>  update + draw
//         │                          │
//         ├─ with_config()           ├─ ScreenManager
//         ├─ with_fixed_timestep()   ├─ GameClock
//         └─ with_channel_capacity() └─ InputFeed ←── input_sender()
// ```
//
// The host owns the loop: it polls devices, sends input batches, and
// calls `frame()` once per display refresh with its render target.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;
use log::info;

//=== Internal Dependencies ===============================================

use crate::core::config::CoreConfig;
use crate::core::input::{InputBatch, InputFeed};
use crate::core::render::RenderTarget;
use crate::core::screen::ScreenManager;
use crate::core::time::{GameClock, GameTime};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Config**: [`CoreConfig::default()`]
/// - **Clock**: realtime
/// - **Channel capacity**: 128 input batches
///
/// # Examples
///
/// ```
/// use strata_engine::EngineBuilder;
/// use strata_engine::core::render::CommandList;
/// use strata_engine::screens::MenuScreen;
///
/// let mut engine = EngineBuilder::new()
///     .with_fixed_timestep(60.0)
///     .build()
///     .init(|screens| {
///         let menu = screens.new_screen(MenuScreen::new("Main Menu"));
///         screens.add_screen(menu);
///     });
///
/// let mut target = CommandList::new();
/// engine.frame(&mut target);
/// assert!(!target.is_empty());
/// ```
pub struct EngineBuilder {
    config: CoreConfig,
    tps: Option<f64>,
    channel_capacity: usize,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: CoreConfig::default(),
            tps: None,
            channel_capacity: 128,
        }
    }

    /// Replaces the whole configuration. Values are validated first.
    pub fn with_config(mut self, config: CoreConfig) -> Self {
        self.config = config.validate();
        self
    }

    /// Advances time by exactly `1 / tps` seconds per frame instead of
    /// measuring wall time.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_fixed_timestep(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = Some(tps);
        self
    }

    /// Sets how many undrained input batches the channel holds.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive, got {}", capacity);
        self.channel_capacity = capacity;
        self
    }

    pub fn build(self) -> Engine {
        info!(
            "Building engine (viewport: {}x{}, clock: {}, channel: {})",
            self.config.viewport.width,
            self.config.viewport.height,
            self.tps.map_or("realtime".to_string(), |tps| format!("{} TPS", tps)),
            self.channel_capacity
        );

        let (input, feed) = InputFeed::bounded(self.channel_capacity);
        let clock = match self.tps {
            Some(tps) => GameClock::fixed(tps),
            None => GameClock::realtime(),
        };

        Engine {
            screens: ScreenManager::new(self.config).with_input_feed(feed),
            clock,
            input,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Runtime owning the screen stack, the clock and the input channel.
pub struct Engine {
    screens: ScreenManager,
    clock: GameClock,
    input: Sender<InputBatch>,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Lets the host push its first screens, then loads them.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut ScreenManager),
    {
        info!("Initializing engine screens");
        init_fn(&mut self.screens);
        self.screens.initialize();
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn screens(&self) -> &ScreenManager {
        &self.screens
    }

    pub fn screens_mut(&mut self) -> &mut ScreenManager {
        &mut self.screens
    }

    /// A sender for the device layer. Batches are applied at the start of
    /// the next frame.
    pub fn input_sender(&self) -> Sender<InputBatch> {
        self.input.clone()
    }

    /// Host window focus. While inactive no screen receives input.
    pub fn set_application_active(&mut self, active: bool) {
        self.screens.set_application_active(active);
    }

    /// `true` once the last screen has left the stack.
    pub fn is_finished(&self) -> bool {
        self.screens.is_empty()
    }

    //--- Execution --------------------------------------------------------

    /// Runs one update and one draw. Returns the frame's time.
    pub fn frame(&mut self, target: &mut dyn RenderTarget) -> GameTime {
        if !self.screens.is_initialized() {
            self.screens.initialize();
        }

        let time = self.clock.tick();
        self.screens.update(&time);
        self.screens.draw(&time, target);
        time
    }

    /// Unloads every screen.
    pub fn shutdown(&mut self) {
        self.screens.shutdown();
        info!("Engine shutdown complete");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
