mod common;
mod floating;
mod slide;

pub use common::Frame;
pub(crate) use common::{Animation, transition_declaration};

use crate::achievement::request::Position;

/// Where a badge is laid out, which determines how it animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Inside the widget's own frame.
    Inline,
    /// Fixed on top of the host page.
    Floating(Position),
}

/// Get the animation implementation for a given placement
pub(crate) fn get_animation(placement: Placement) -> Box<dyn Animation> {
    match placement {
        Placement::Inline => Box::new(slide::InlineSlide),
        Placement::Floating(Position::Top | Position::Bottom) => Box::new(floating::EdgeSlide),
        Placement::Floating(Position::Middle) => Box::new(floating::CenterSlide),
    }
}
