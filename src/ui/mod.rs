mod console;
mod controller;

pub use console::Console;
pub use controller::{Effect, Event, Field, Phase, UiController, View};
