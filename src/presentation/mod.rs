//! Presentation layer handling terminal UI and user input.
//!
//! Rendering of the calculator, sign-in, application and dashboard screens
//! lives in `ui` and `views`; `input` maps key presses onto `App` methods.

pub mod ui;
pub mod views;
pub mod input;

pub use ui::*;
pub use input::*;
