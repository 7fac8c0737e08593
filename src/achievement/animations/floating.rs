use super::common::{Animation, Frame};

/// Horizontally centered on the host page, anchored to the top or bottom edge.
pub(crate) struct EdgeSlide;

impl Animation for EdgeSlide {
    fn transform(&self, frame: Frame) -> &'static str {
        match frame {
            Frame::OffScreen => "translateX(-50%) translateX(-100%)",
            Frame::OnScreen => "translateX(-50%)",
            Frame::Exit => "translateX(-50%) translateX(100%)",
        }
    }
}

/// Centered on both axes of the host page.
pub(crate) struct CenterSlide;

impl Animation for CenterSlide {
    fn transform(&self, frame: Frame) -> &'static str {
        // The vertical centering offset has to stay in every frame or the badge jumps.
        match frame {
            Frame::OffScreen => "translateX(-50%) translateY(-50%) translateX(-100%)",
            Frame::OnScreen => "translateX(-50%) translateY(-50%)",
            Frame::Exit => "translateX(-50%) translateY(-50%) translateX(100%)",
        }
    }
}
