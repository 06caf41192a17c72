//=========================================================================
// Message Box Screen
//=========================================================================
//
// Popup asking the player to accept or cancel.
//
// The box never covers the screens beneath it. It darkens them with a
// backdrop at two thirds of its transition alpha, prints the message at
// the viewport center and exits after either choice.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use glam::Affine2;
use log::warn;

//=== Internal Dependencies ===============================================

use super::ScreenListener;
use crate::core::content::AssetHandle;
use crate::core::entity::SceneObjectManager;
use crate::core::input::InputState;
use crate::core::render::{Color, RenderTarget, TextDraw};
use crate::core::screen::{fade_to_black, Screen, ScreenContext, ScreenView};
use crate::core::time::GameTime;

const DEFAULT_FONT: &str = "fonts/menu";
const TRANSITION_TIME: Duration = Duration::from_millis(200);
const USAGE_TEXT: &str = "\nA button, Space, Enter = ok\nB button, Esc = cancel";

pub struct MessageBoxScreen {
    message: String,
    accepted: Vec<ScreenListener>,
    cancelled: Vec<ScreenListener>,
    font_path: String,
    font: Option<AssetHandle>,
}

impl MessageBoxScreen {
    /// Message box with the control hints appended to `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_usage(message, true)
    }

    pub fn with_usage(message: impl Into<String>, include_usage_text: bool) -> Self {
        let mut message = message.into();
        if include_usage_text {
            message.push_str(USAGE_TEXT);
        }

        Self {
            message,
            accepted: Vec::new(),
            cancelled: Vec::new(),
            font_path: DEFAULT_FONT.to_string(),
            font: None,
        }
    }

    pub fn with_font(mut self, path: impl Into<String>) -> Self {
        self.font_path = path.into();
        self
    }

    pub fn on_accepted<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&mut ScreenContext<'_>) + 'static,
    {
        self.accepted.push(Box::new(listener));
        self
    }

    pub fn on_cancelled<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&mut ScreenContext<'_>) + 'static,
    {
        self.cancelled.push(Box::new(listener));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Screen for MessageBoxScreen {
    fn name(&self) -> &str {
        "MessageBox"
    }

    fn is_popup(&self) -> bool {
        true
    }

    fn transition_on_time(&self) -> Option<Duration> {
        Some(TRANSITION_TIME)
    }

    fn transition_off_time(&self) -> Option<Duration> {
        Some(TRANSITION_TIME)
    }

    fn load_content(&mut self, scene: &mut SceneObjectManager) {
        match scene.content_mut().load(&self.font_path) {
            Ok(font) => self.font = Some(font),
            Err(e) => warn!("Message box has no font: {}", e),
        }
    }

    fn unload_content(&mut self, _scene: &mut SceneObjectManager) {
        self.font = None;
    }

    fn handle_input(&mut self, input: &InputState, ctx: &mut ScreenContext<'_>) {
        let listeners = if input.menu_select() {
            &mut self.accepted
        } else if input.menu_cancel() {
            &mut self.cancelled
        } else {
            return;
        };

        for listener in listeners.iter_mut() {
            listener(ctx);
        }
        ctx.exit_screen();
    }

    fn draw(&self, _time: &GameTime, view: &ScreenView, target: &mut dyn RenderTarget) {
        let alpha = view.transition_alpha();
        fade_to_black(target, view.viewport, alpha * 2.0 / 3.0);

        let Some(font) = self.font else {
            return;
        };

        target.draw_text(&TextDraw {
            font,
            text: self.message.clone(),
            position: view.viewport.center(),
            color: Color::WHITE.faded(alpha),
            scale: 1.0,
            transform: Affine2::IDENTITY,
        });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
