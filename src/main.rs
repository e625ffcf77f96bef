//=========================================================================
// Beacon Demo
//=========================================================================
//
// Opens a window from `resources/config.json` and wires a few
// subscribers to show the signal flow:
//   - key presses and typed text are logged
//   - F11 toggles full screen, F1 toggles the editor flag
//   - every second the average frame time is logged
//
// Run with `RUST_LOG=debug` for more detail.
//
//=========================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use env_logger::{Builder, Env};
use log::info;

use beacon_engine::prelude::*;
use beacon_engine::GameError;

/// Accumulates frame times and reports them once per second.
struct FrameStats {
    handle: GameHandle,
    elapsed: Cell<Duration>,
    frames: Cell<u32>,
}

impl FrameStats {
    fn on_update(&self, _: &()) {
        self.elapsed.set(self.elapsed.get() + self.handle.frame_delta());
        self.frames.set(self.frames.get() + 1);

        if self.elapsed.get() >= Duration::from_secs(1) {
            let average = self.elapsed.get() / self.frames.get();
            info!("{} frames, {:?} average", self.frames.get(), average);
            self.elapsed.set(Duration::ZERO);
            self.frames.set(0);
        }
    }
}

fn main() -> Result<(), GameError> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let game = GameBuilder::new().with_name("Beacon Demo").build();
    let events = game.events();

    events.key_down_event().connect(|key| info!("Key down: {:?}", key));

    let typed = RefCell::new(String::new());
    events.text_event().connect(move |text| {
        if !text.unicode.is_control() {
            typed.borrow_mut().push(text.unicode);
            info!("Typed so far: {}", typed.borrow());
        }
    });

    let handle = game.handle();
    let full_screen = Cell::new(false);
    let editor_visible = Cell::new(false);
    events.key_down_event().connect(move |key| match key.code {
        KeyCode::F11 => {
            full_screen.set(!full_screen.get());
            handle.set_full_screen(full_screen.get());
        }
        KeyCode::F1 => {
            editor_visible.set(!editor_visible.get());
            handle.set_editor_visible(editor_visible.get());
        }
        _ => {}
    });

    let stats = Rc::new(FrameStats {
        handle: game.handle(),
        elapsed: Cell::new(Duration::ZERO),
        frames: Cell::new(0),
    });
    events.update_event().connect_method(&stats, FrameStats::on_update);

    events.quit_event().connect(|_| info!("Quit requested"));

    game.run()
}
