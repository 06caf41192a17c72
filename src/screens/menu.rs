//=========================================================================
// Menu Screen
//=========================================================================
//
// Vertical list of text entries.
//
// Input:
//   menu_up / menu_down → move the selection, wrapping at both ends
//   menu_select         → selected entry's listeners
//   menu_cancel         → cancel listeners, or exit when there are none
//
// Draw:
//   entries slide in from the left and out to the right by
//   transition_offset, fade with transition_alpha; the selected entry
//   is tinted and pulses in scale.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Affine2, Vec2};
use log::warn;

//=== Internal Dependencies ===============================================

use super::ScreenListener;
use crate::core::content::AssetHandle;
use crate::core::entity::SceneObjectManager;
use crate::core::input::InputState;
use crate::core::render::{Color, RenderTarget, TextDraw};
use crate::core::screen::{Screen, ScreenContext, ScreenState, ScreenView};
use crate::core::time::GameTime;

//=== Layout ==============================================================

const DEFAULT_FONT: &str = "fonts/menu";
const ENTRY_ORIGIN: Vec2 = Vec2::new(100.0, 150.0);
const LINE_SPACING: f32 = 40.0;
const TITLE_POSITION: Vec2 = Vec2::new(100.0, 80.0);
const TITLE_SCALE: f32 = 1.25;
const TITLE_COLOR: Color = Color::rgba(192, 192, 192, 255);

const SLIDE_IN_DISTANCE: f32 = 256.0;
const SLIDE_OUT_DISTANCE: f32 = 512.0;
const PULSE_SPEED: f32 = 6.0;
const PULSE_AMOUNT: f32 = 0.05;

//=== MenuEntry ===========================================================

pub struct MenuEntry {
    text: String,
    selected: Vec<ScreenListener>,
}

impl MenuEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selected: Vec::new(),
        }
    }

    /// Adds a listener run when this entry is chosen.
    pub fn on_selected<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&mut ScreenContext<'_>) + 'static,
    {
        self.selected.push(Box::new(listener));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Entries like "Sound: On" rewrite their label when toggled.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    fn select(&mut self, ctx: &mut ScreenContext<'_>) {
        for listener in &mut self.selected {
            listener(ctx);
        }
    }
}

//=== MenuScreen ==========================================================

pub struct MenuScreen {
    title: String,
    entries: Vec<MenuEntry>,
    selected: usize,
    cancelled: Vec<ScreenListener>,
    font_path: String,
    font: Option<AssetHandle>,
}

impl MenuScreen {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
            selected: 0,
            cancelled: Vec::new(),
            font_path: DEFAULT_FONT.to_string(),
            font: None,
        }
    }

    pub fn with_entry(mut self, entry: MenuEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn with_font(mut self, path: impl Into<String>) -> Self {
        self.font_path = path.into();
        self
    }

    /// Adds a listener run on cancel. With none registered, cancel exits.
    pub fn on_cancelled<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&mut ScreenContext<'_>) + 'static,
    {
        self.cancelled.push(Box::new(listener));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut MenuEntry> {
        self.entries.get_mut(index)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    fn move_selection(&mut self, forward: bool) {
        let count = self.entries.len();
        if count == 0 {
            return;
        }
        self.selected = if forward {
            (self.selected + 1) % count
        } else {
            (self.selected + count - 1) % count
        };
    }

    fn slide(view: &ScreenView) -> f32 {
        let offset = view.transition_offset();
        if view.state == ScreenState::TransitionOn {
            -offset * SLIDE_IN_DISTANCE
        } else {
            offset * SLIDE_OUT_DISTANCE
        }
    }
}

impl Screen for MenuScreen {
    fn name(&self) -> &str {
        &self.title
    }

    fn load_content(&mut self, scene: &mut SceneObjectManager) {
        match scene.content_mut().load(&self.font_path) {
            Ok(font) => self.font = Some(font),
            Err(e) => warn!("Menu '{}' has no font: {}", self.title, e),
        }
    }

    fn unload_content(&mut self, _scene: &mut SceneObjectManager) {
        self.font = None;
    }

    fn handle_input(&mut self, input: &InputState, ctx: &mut ScreenContext<'_>) {
        if input.menu_up() {
            self.move_selection(false);
        }
        if input.menu_down() {
            self.move_selection(true);
        }

        if input.menu_select() {
            if let Some(entry) = self.entries.get_mut(self.selected) {
                entry.select(ctx);
            }
        } else if input.menu_cancel() {
            if self.cancelled.is_empty() {
                ctx.exit_screen();
            } else {
                for listener in &mut self.cancelled {
                    listener(ctx);
                }
            }
        }
    }

    fn draw(&self, time: &GameTime, view: &ScreenView, target: &mut dyn RenderTarget) {
        let Some(font) = self.font else {
            return;
        };

        let alpha = view.transition_alpha();
        let origin = view.viewport.position();
        let slide = Vec2::new(Self::slide(view), 0.0);
        let pulse = (time.total_seconds() * PULSE_SPEED).sin() + 1.0;

        target.draw_text(&TextDraw {
            font,
            text: self.title.clone(),
            position: origin + TITLE_POSITION - Vec2::new(0.0, view.transition_offset() * 100.0),
            color: TITLE_COLOR.faded(alpha),
            scale: TITLE_SCALE,
            transform: Affine2::IDENTITY,
        });

        for (i, entry) in self.entries.iter().enumerate() {
            let is_selected = view.is_active && i == self.selected;
            let (color, scale) = if is_selected {
                (Color::YELLOW, 1.0 + pulse * PULSE_AMOUNT)
            } else {
                (Color::WHITE, 1.0)
            };

            target.draw_text(&TextDraw {
                font,
                text: entry.text.clone(),
                position: origin + ENTRY_ORIGIN + slide + Vec2::new(0.0, i as f32 * LINE_SPACING),
                color: color.faded(alpha),
                scale,
                transform: Affine2::IDENTITY,
            });
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crossbeam_channel::Sender;

    use crate::core::config::CoreConfig;
    use crate::core::content::MemoryContent;
    use crate::core::input::{InputBatch, InputEvent, InputFeed, KeyCode};
    use crate::core::physics::{CollisionManager, MovementManager};
    use crate::core::render::{CommandList, DrawCommand};
    use crate::core::screen::{GameScreen, ScreenId, ScreenManager};

    fn stack(menu: MenuScreen) -> (ScreenManager, Sender<InputBatch>, ScreenId) {
        let (tx, feed) = InputFeed::bounded(8);
        let mut m = ScreenManager::new(CoreConfig::default()).with_input_feed(feed);
        let id = m.add_screen(m.new_screen(menu));
        m.initialize();
        (m, tx, id)
    }

    fn press(m: &mut ScreenManager, tx: &Sender<InputBatch>, key: KeyCode) {
        tx.send(vec![InputEvent::KeyDown(key)]).unwrap();
        m.update(&GameTime::from_millis(16));
        tx.send(vec![InputEvent::KeyUp(key)]).unwrap();
        m.update(&GameTime::from_millis(16));
    }

    fn three_entries() -> MenuScreen {
        MenuScreen::new("Main")
            .with_entry(MenuEntry::new("Play"))
            .with_entry(MenuEntry::new("Options"))
            .with_entry(MenuEntry::new("Quit"))
    }

    fn selected(m: &ScreenManager, id: ScreenId) -> usize {
        m.get(id).unwrap().behavior::<MenuScreen>().unwrap().selected_index()
    }

    //--- Navigation -------------------------------------------------------

    #[test]
    fn selection_wraps_in_both_directions() {
        let (mut m, tx, id) = stack(three_entries());

        press(&mut m, &tx, KeyCode::ArrowUp);
        assert_eq!(selected(&m, id), 2);

        press(&mut m, &tx, KeyCode::ArrowDown);
        assert_eq!(selected(&m, id), 0);

        press(&mut m, &tx, KeyCode::ArrowDown);
        assert_eq!(selected(&m, id), 1);
    }

    #[test]
    fn empty_menu_ignores_navigation() {
        let (mut m, tx, id) = stack(MenuScreen::new("Empty"));

        press(&mut m, &tx, KeyCode::ArrowDown);
        press(&mut m, &tx, KeyCode::Enter);

        assert_eq!(selected(&m, id), 0);
    }

    //--- Listeners --------------------------------------------------------

    #[test]
    fn select_runs_every_listener_of_the_selected_entry() {
        let hits = Rc::new(Cell::new(0));
        let (a, b) = (Rc::clone(&hits), Rc::clone(&hits));
        let menu = MenuScreen::new("Main")
            .with_entry(MenuEntry::new("Play"))
            .with_entry(
                MenuEntry::new("Options")
                    .on_selected(move |_| a.set(a.get() + 1))
                    .on_selected(move |_| b.set(b.get() + 10)),
            );
        let (mut m, tx, _) = stack(menu);

        press(&mut m, &tx, KeyCode::Enter);
        assert_eq!(hits.get(), 0);

        press(&mut m, &tx, KeyCode::ArrowDown);
        press(&mut m, &tx, KeyCode::Space);
        assert_eq!(hits.get(), 11);
    }

    #[test]
    fn cancel_without_listeners_exits_the_menu() {
        let (mut m, tx, id) = stack(three_entries());

        press(&mut m, &tx, KeyCode::Escape);

        assert!(!m.contains(id));
    }

    #[test]
    fn cancel_listeners_replace_default_exit() {
        let cancelled = Rc::new(Cell::new(false));
        let flag = Rc::clone(&cancelled);
        let (mut m, tx, id) = stack(three_entries().on_cancelled(move |_| flag.set(true)));

        press(&mut m, &tx, KeyCode::Escape);

        assert!(cancelled.get());
        assert!(m.contains(id));
    }

    #[test]
    fn entry_listener_can_push_a_screen() {
        let menu = MenuScreen::new("Main").with_entry(MenuEntry::new("Options").on_selected(|ctx| {
            let options = ctx.new_screen(MenuScreen::new("Options"));
            ctx.add_screen(options);
        }));
        let (mut m, tx, _) = stack(menu);

        press(&mut m, &tx, KeyCode::Enter);

        assert_eq!(m.len(), 2);
        assert_eq!(m.top().unwrap().name(), "Options");
    }

    //--- Draw -------------------------------------------------------------

    #[test]
    fn selected_entry_is_highlighted() {
        let (mut m, _tx, _) = stack(three_entries());
        m.update(&GameTime::from_millis(16));

        let mut target = CommandList::new();
        m.draw(&GameTime::from_millis(16), &mut target);

        let colors: Vec<Color> = target
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text(t) => Some(t.color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![TITLE_COLOR, Color::YELLOW, Color::WHITE, Color::WHITE]);
    }

    #[test]
    fn nothing_is_drawn_without_a_font() {
        let menu = three_entries().with_font("fonts/missing");
        let config = CoreConfig::default();
        let scene = SceneObjectManager::new(
            CollisionManager::new(&config.collision, config.viewport.rect()),
            MovementManager::default(),
            Box::new(MemoryContent::with_catalog(["fonts/menu"])),
        );
        let mut screen = GameScreen::with_scene(menu, scene, &config);
        screen.load_content();

        let mut target = CommandList::new();
        screen.draw(&GameTime::from_millis(16), &mut target);

        assert!(target.is_empty());
    }
}
