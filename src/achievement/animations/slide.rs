use super::common::{Animation, Frame};

/// Slides across the widget's own frame, left to right.
pub(crate) struct InlineSlide;

impl Animation for InlineSlide {
    fn transform(&self, frame: Frame) -> &'static str {
        match frame {
            Frame::OffScreen => "translateX(-100%)",
            Frame::OnScreen => "translateX(0)",
            Frame::Exit => "translateX(100%)",
        }
    }
}
