//=========================================================================
// Screen Manager
//=========================================================================
//
// Owns the screen stack and routes update, input and draw through it.
//
// Screens are stored bottom → top. Each update walks a snapshot of the
// stack ids from the top down, so screens added during the frame wait
// for the next one and screens removed during the frame are skipped.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{fade_to_black, CommandQueue, GameScreen, Screen, ScreenCommand, ScreenId, ScreenState};
use crate::core::config::CoreConfig;
use crate::core::input::{InputFeed, InputState};
use crate::core::render::RenderTarget;
use crate::core::time::GameTime;

//=== ScreenManager =======================================================

pub struct ScreenManager {
    config: CoreConfig,
    screens: Vec<GameScreen>,
    snapshot: Vec<ScreenId>,
    commands: CommandQueue,

    input: InputState,
    feed: Option<InputFeed>,

    application_active: bool,
    initialized: bool,
    trace_enabled: bool,
}

impl ScreenManager {
    //--- Construction -----------------------------------------------------

    pub fn new(config: CoreConfig) -> Self {
        Self {
            config,
            screens: Vec::new(),
            snapshot: Vec::new(),
            commands: CommandQueue::new(),
            input: InputState::new(),
            feed: None,
            application_active: true,
            initialized: false,
            trace_enabled: false,
        }
    }

    /// Reads input from `feed` at the start of every update.
    pub fn with_input_feed(mut self, feed: InputFeed) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn set_input_feed(&mut self, feed: InputFeed) {
        self.feed = Some(feed);
    }

    /// Loads every screen already on the stack. Screens added afterwards
    /// are loaded as they are added.
    pub fn initialize(&mut self) {
        if self.initialized {
            warn!("Screen manager already initialized");
            return;
        }

        for screen in &mut self.screens {
            screen.load_content();
        }
        self.initialized = true;
        info!("Screen manager initialized with {} screen(s)", self.screens.len());
    }

    /// Unloads every screen on the stack.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        for screen in &mut self.screens {
            screen.unload_content();
        }
        self.initialized = false;
        info!("Screen manager shut down");
    }

    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Screens from bottom to top.
    pub fn screens(&self) -> impl Iterator<Item = &GameScreen> {
        self.screens.iter()
    }

    pub fn top(&self) -> Option<&GameScreen> {
        self.screens.last()
    }

    pub fn get(&self, id: ScreenId) -> Option<&GameScreen> {
        self.screens.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ScreenId) -> Option<&mut GameScreen> {
        self.screens.iter_mut().find(|s| s.id() == id)
    }

    pub fn contains(&self, id: ScreenId) -> bool {
        self.get(id).is_some()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Direct access for hosts that feed input without a channel.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// While inactive, no screen receives input.
    pub fn set_application_active(&mut self, active: bool) {
        if self.application_active != active {
            debug!("Application active: {}", active);
        }
        self.application_active = active;
    }

    pub fn is_application_active(&self) -> bool {
        self.application_active
    }

    /// Logs the stack after every update.
    pub fn set_trace_enabled(&mut self, enabled: bool) {
        self.trace_enabled = enabled;
    }

    //--- Stack Operations -------------------------------------------------

    /// Builds a screen from `behavior` with this manager's configuration.
    pub fn new_screen<S: Screen>(&self, behavior: S) -> GameScreen {
        GameScreen::new(behavior, &self.config)
    }

    /// Pushes `screen` on top of the stack, loading it if initialized.
    pub fn add_screen(&mut self, mut screen: GameScreen) -> ScreenId {
        let id = screen.id();
        if self.initialized {
            screen.load_content();
        }

        debug!("Pushing {} ({}) onto stack", screen.name(), id);
        self.screens.push(screen);
        id
    }

    /// Removes a screen at once, unloading it if initialized.
    ///
    /// Also drops it from the current update snapshot. Unknown ids are a
    /// no-op.
    pub fn remove_screen(&mut self, id: ScreenId) -> Option<GameScreen> {
        let Some(pos) = self.screens.iter().position(|s| s.id() == id) else {
            debug!("{} not found in stack, skipping removal", id);
            return None;
        };

        let mut screen = self.screens.remove(pos);
        self.snapshot.retain(|&s| s != id);

        if self.initialized {
            screen.unload_content();
        }

        debug!("Removed {} ({}) from stack at position {}", screen.name(), id, pos);
        Some(screen)
    }

    /// Starts the exit transition of `id`, or removes it when its
    /// fade-out time is zero.
    pub fn exit_screen(&mut self, id: ScreenId) {
        match self.get_mut(id) {
            Some(screen) => {
                if screen.exit_screen() {
                    self.remove_screen(id);
                }
            }
            None => debug!("{} not found in stack, skipping exit", id),
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one frame: input, transitions, focus routing and screen logic.
    pub fn update(&mut self, time: &GameTime) {
        self.input.begin_frame();
        if let Some(feed) = &mut self.feed {
            feed.drain_into(&mut self.input);
        }

        self.snapshot.clear();
        self.snapshot.extend(self.screens.iter().map(GameScreen::id));

        let mut other_has_focus = !self.application_active;
        let mut covered = false;

        while let Some(id) = self.snapshot.pop() {
            let Some(screen) = self.screens.iter_mut().find(|s| s.id() == id) else {
                continue;
            };

            if screen.update(time, other_has_focus, covered, &self.config, &mut self.commands) {
                self.remove_screen(id);
                self.apply_commands();
                continue;
            }

            if matches!(screen.state(), ScreenState::TransitionOn | ScreenState::Active) {
                if !other_has_focus {
                    screen.handle_input(&self.input, time, &self.config, &mut self.commands);
                    other_has_focus = true;
                }
                if !screen.is_popup() {
                    covered = true;
                }
            }

            self.apply_commands();
        }

        if self.trace_enabled {
            self.trace_screens();
        }
    }

    fn apply_commands(&mut self) {
        if self.commands.is_empty() {
            return;
        }

        for command in self.commands.take() {
            match command {
                ScreenCommand::Add(screen) => {
                    self.add_screen(screen);
                }
                ScreenCommand::Exit(id) => self.exit_screen(id),
                ScreenCommand::Remove(id) => {
                    self.remove_screen(id);
                }
            }
        }
    }

    //--- Draw -------------------------------------------------------------

    /// Draws every non-hidden screen, bottom of the stack first.
    pub fn draw(&mut self, time: &GameTime, target: &mut dyn RenderTarget) {
        for screen in &mut self.screens {
            if screen.state() == ScreenState::Hidden {
                continue;
            }
            screen.draw(time, target);
        }
    }

    /// Covers the whole viewport with black at the given opacity.
    pub fn fade_back_buffer_to_black(&self, alpha: f32, target: &mut dyn RenderTarget) {
        fade_to_black(target, self.config.viewport.rect(), alpha);
    }

    //--- Diagnostics ------------------------------------------------------

    /// Logs the stack, top first.
    pub fn trace_screens(&self) {
        let lines: Vec<String> = self
            .screens
            .iter()
            .rev()
            .map(|s| format!("{} {} {:?} {:.2}", s.id(), s.name(), s.state(), s.transition_position()))
            .collect();
        debug!("Screens: [{}]", lines.join(", "));
    }
}

impl std::fmt::Debug for ScreenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenManager")
            .field("screens", &self.screens)
            .field("initialized", &self.initialized)
            .field("application_active", &self.application_active)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use crate::core::input::{InputEvent, KeyCode};
    use crate::core::render::{CommandList, DrawCommand};
    use crate::core::screen::{ScreenContext, ScreenView};

    type Log = Rc<RefCell<Vec<String>>>;

    /// Screen recording lifecycle calls into a shared log.
    struct Probe {
        tag: &'static str,
        popup: bool,
        log: Log,
        on_input: Option<Box<dyn Fn(&mut ScreenContext<'_>)>>,
    }

    impl Probe {
        fn new(tag: &'static str, log: &Log) -> Self {
            Self { tag, popup: false, log: Rc::clone(log), on_input: None }
        }

        fn popup(mut self) -> Self {
            self.popup = true;
            self
        }

        fn record(&self, what: &str) {
            self.log.borrow_mut().push(format!("{}:{}", what, self.tag));
        }
    }

    impl Screen for Probe {
        fn name(&self) -> &str {
            self.tag
        }

        fn is_popup(&self) -> bool {
            self.popup
        }

        fn load_content(&mut self, _scene: &mut crate::core::entity::SceneObjectManager) {
            self.record("load");
        }

        fn unload_content(&mut self, _scene: &mut crate::core::entity::SceneObjectManager) {
            self.record("unload");
        }

        fn update(&mut self, _ctx: &mut ScreenContext<'_>) {
            self.record("update");
        }

        fn handle_input(&mut self, _input: &InputState, ctx: &mut ScreenContext<'_>) {
            self.record("input");
            if let Some(action) = &self.on_input {
                action(ctx);
            }
        }

        fn draw(&self, _time: &GameTime, _view: &ScreenView, _target: &mut dyn RenderTarget) {
            self.record("draw");
        }
    }

    fn manager() -> ScreenManager {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut m = ScreenManager::new(CoreConfig::default());
        m.set_trace_enabled(true);
        m
    }

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn entries(log: &Log, prefix: &str) -> Vec<String> {
        log.borrow().iter().filter(|e| e.starts_with(prefix)).cloned().collect()
    }

    fn frame() -> GameTime {
        GameTime::from_millis(16)
    }

    //--- Stack Operations -------------------------------------------------

    #[test]
    fn add_before_initialize_defers_loading() {
        let log = log();
        let mut m = manager();
        let screen = m.new_screen(Probe::new("a", &log));
        m.add_screen(screen);

        assert!(entries(&log, "load").is_empty());

        m.initialize();
        assert_eq!(entries(&log, "load"), vec!["load:a"]);
    }

    #[test]
    fn add_and_remove_after_initialize_load_and_unload() {
        let log = log();
        let mut m = manager();
        m.initialize();

        let screen = m.new_screen(Probe::new("a", &log));
        let id = m.add_screen(screen);
        assert_eq!(entries(&log, "load"), vec!["load:a"]);

        assert!(m.remove_screen(id).is_some());
        assert_eq!(entries(&log, "unload"), vec!["unload:a"]);
        assert!(m.is_empty());
    }

    #[test]
    fn removing_unknown_screen_is_a_no_op() {
        let log = log();
        let mut m = manager();
        let other = m.new_screen(Probe::new("other", &log));
        let screen = m.new_screen(Probe::new("a", &log));
        m.add_screen(screen);

        assert!(m.remove_screen(other.id()).is_none());
        assert_eq!(m.len(), 1);
    }

    //--- Update Routing ---------------------------------------------------

    #[test]
    fn popup_leaves_screen_beneath_active() {
        let log = log();
        let mut m = manager();
        let base = m.add_screen(m.new_screen(Probe::new("base", &log)));
        m.update(&frame());

        m.add_screen(m.new_screen(Probe::new("popup", &log).popup()));
        m.update(&frame());

        assert_eq!(m.get(base).unwrap().state(), ScreenState::Active);
        assert!(!m.get(base).unwrap().is_covered());
    }

    #[test]
    fn full_screen_covers_screen_beneath() {
        let log = log();
        let mut m = manager();
        let base = m.add_screen(
            m.new_screen(Probe::new("base", &log))
                .with_transition_off(Duration::from_millis(100)),
        );
        m.update(&frame());

        m.add_screen(m.new_screen(Probe::new("top", &log)));
        m.update(&GameTime::from_millis(50));
        assert_eq!(m.get(base).unwrap().state(), ScreenState::TransitionOff);

        m.update(&GameTime::from_millis(50));
        assert_eq!(m.get(base).unwrap().state(), ScreenState::Hidden);
    }

    #[test]
    fn only_the_top_active_screen_gets_input() {
        let log = log();
        let mut m = manager();
        m.add_screen(m.new_screen(Probe::new("base", &log)));
        m.add_screen(m.new_screen(Probe::new("dialog", &log).popup()));

        m.update(&frame());

        assert_eq!(entries(&log, "input"), vec!["input:dialog"]);
        assert_eq!(entries(&log, "update"), vec!["update:dialog", "update:base"]);
    }

    #[test]
    fn inactive_application_routes_no_input() {
        let log = log();
        let mut m = manager();
        m.add_screen(m.new_screen(Probe::new("a", &log)));
        m.set_application_active(false);

        m.update(&frame());

        assert!(entries(&log, "input").is_empty());
        assert_eq!(entries(&log, "update"), vec!["update:a"]);
    }

    #[test]
    fn removed_screen_is_not_updated_in_the_same_frame() {
        let log = log();
        let mut m = manager();
        let below = m.add_screen(m.new_screen(Probe::new("below", &log)));

        let mut top = Probe::new("top", &log);
        top.on_input = Some(Box::new(move |ctx: &mut ScreenContext<'_>| ctx.remove_screen(below)));
        m.add_screen(m.new_screen(top));

        m.update(&frame());

        assert!(!m.contains(below));
        assert_eq!(entries(&log, "update"), vec!["update:top"]);
    }

    #[test]
    fn screen_added_during_update_waits_for_next_frame() {
        let log = log();
        let mut m = manager();
        let mut opener = Probe::new("opener", &log);
        opener.on_input = Some(Box::new(|ctx: &mut ScreenContext<'_>| {
            let dialog = ctx.new_screen(Probe::new("dialog", &Rc::new(RefCell::new(Vec::new()))));
            ctx.add_screen(dialog);
        }));
        m.add_screen(m.new_screen(opener));

        m.update(&frame());

        assert_eq!(m.len(), 2);
        assert_eq!(m.top().unwrap().state(), ScreenState::TransitionOn);
        assert_eq!(m.top().unwrap().name(), "dialog");
    }

    #[test]
    fn exit_with_fade_removes_after_transition() {
        let log = log();
        let mut m = manager();
        let id = m.add_screen(
            m.new_screen(Probe::new("a", &log))
                .with_transition_off(Duration::from_millis(32)),
        );
        m.update(&frame());

        m.exit_screen(id);
        m.update(&frame());
        assert!(m.contains(id));
        assert!(m.get(id).unwrap().is_exiting());

        m.update(&frame());
        assert!(!m.contains(id));
    }

    #[test]
    fn exit_without_fade_removes_immediately() {
        let log = log();
        let mut m = manager();
        let id = m.add_screen(m.new_screen(Probe::new("a", &log)));

        m.exit_screen(id);

        assert!(!m.contains(id));
    }

    #[test]
    fn input_feed_is_drained_each_update() {
        let log = log();
        let (tx, feed) = InputFeed::bounded(8);
        let mut m = manager().with_input_feed(feed);
        m.add_screen(m.new_screen(Probe::new("a", &log)));

        tx.send(vec![InputEvent::KeyDown(KeyCode::Enter)]).unwrap();
        m.update(&frame());

        assert!(m.input().menu_select());
    }

    //--- Draw -------------------------------------------------------------

    #[test]
    fn draw_skips_hidden_and_runs_bottom_up() {
        let log = log();
        let mut m = manager();
        m.add_screen(m.new_screen(Probe::new("hidden", &log)));
        m.add_screen(m.new_screen(Probe::new("middle", &log)));
        m.add_screen(m.new_screen(Probe::new("popup", &log).popup()));
        m.update(&frame());

        m.draw(&frame(), &mut CommandList::new());

        assert_eq!(entries(&log, "draw"), vec!["draw:middle", "draw:popup"]);
    }

    #[test]
    fn fade_fills_viewport_with_translucent_black() {
        let m = manager();
        let mut target = CommandList::new();

        m.fade_back_buffer_to_black(0.5, &mut target);

        match &target.commands()[0] {
            DrawCommand::Fill { rect, color } => {
                assert_eq!(*rect, m.config().viewport.rect());
                assert_eq!(color.a, 128);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
