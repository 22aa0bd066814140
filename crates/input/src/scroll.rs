use crate::viewport::Viewport;

/// A scroll request from the wheel or keyboard.
///
/// Wheel deltas use the desktop convention: positive values scroll towards
/// the top of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollInput {
    /// Wheel notches, converted with `ScrollState::line_height`.
    Lines(f32),
    /// Precise (touchpad) delta in logical pixels.
    Pixels(f32),
    PageDown,
    PageUp,
    Home,
    End,
}

/// Page scroll emulation. The page is `sections` viewports tall, so the
/// offset ranges over `[0, (sections - 1) * height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    offset: f32,
    /// Logical pixels per wheel notch.
    pub line_height: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0.0,
            line_height: 100.0,
        }
    }
}

impl ScrollState {
    pub fn new(line_height: f32) -> Self {
        Self {
            offset: 0.0,
            line_height,
        }
    }

    /// Current offset in logical pixels, `0` at the top.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_offset(viewport: &Viewport, sections: u32) -> f32 {
        sections.saturating_sub(1) as f32 * viewport.height.max(0.0)
    }

    /// Apply a scroll request and return the new offset.
    pub fn apply(&mut self, input: ScrollInput, viewport: &Viewport, sections: u32) -> f32 {
        let max = Self::max_offset(viewport, sections);
        let target = match input {
            ScrollInput::Lines(lines) => self.offset - lines * self.line_height,
            ScrollInput::Pixels(px) => self.offset - px,
            ScrollInput::PageDown => self.offset + viewport.height,
            ScrollInput::PageUp => self.offset - viewport.height,
            ScrollInput::Home => 0.0,
            ScrollInput::End => max,
        };
        let next = if target.is_finite() {
            target.clamp(0.0, max)
        } else {
            self.offset
        };
        if next != self.offset {
            tracing::trace!(from = self.offset, to = next, ?input, "scroll");
        }
        self.offset = next;
        next
    }

    /// Keep the offset in range after the viewport shrinks.
    pub fn clamp_to(&mut self, viewport: &Viewport, sections: u32) {
        self.offset = self.offset.clamp(0.0, Self::max_offset(viewport, sections));
    }

    /// Jump straight to an offset, clamped to the page.
    pub fn set_offset(&mut self, offset: f32, viewport: &Viewport, sections: u32) {
        if offset.is_finite() {
            self.offset = offset.clamp(0.0, Self::max_offset(viewport, sections));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 800.0, 1.0, 2.0)
    }

    #[test]
    fn wheel_down_scrolls_down_the_page() {
        let mut scroll = ScrollState::default();
        let vp = viewport();
        assert_eq!(scroll.apply(ScrollInput::Lines(-3.0), &vp, 3), 300.0);
        assert_eq!(scroll.apply(ScrollInput::Pixels(50.0), &vp, 3), 250.0);
    }

    #[test]
    fn offset_is_clamped_to_the_page() {
        let mut scroll = ScrollState::default();
        let vp = viewport();
        assert_eq!(scroll.apply(ScrollInput::Lines(5.0), &vp, 3), 0.0);
        assert_eq!(scroll.apply(ScrollInput::Lines(-100.0), &vp, 3), 1600.0);
        assert_eq!(scroll.apply(ScrollInput::PageDown, &vp, 3), 1600.0);
    }

    #[test]
    fn page_keys_move_by_one_viewport() {
        let mut scroll = ScrollState::default();
        let vp = viewport();
        assert_eq!(scroll.apply(ScrollInput::PageDown, &vp, 3), 800.0);
        assert_eq!(scroll.apply(ScrollInput::End, &vp, 3), 1600.0);
        assert_eq!(scroll.apply(ScrollInput::PageUp, &vp, 3), 800.0);
        assert_eq!(scroll.apply(ScrollInput::Home, &vp, 3), 0.0);
    }

    #[test]
    fn single_section_page_does_not_scroll() {
        let mut scroll = ScrollState::default();
        assert_eq!(scroll.apply(ScrollInput::PageDown, &viewport(), 1), 0.0);
    }

    #[test]
    fn shrinking_viewport_reclamps() {
        let mut scroll = ScrollState::default();
        let mut vp = viewport();
        scroll.apply(ScrollInput::End, &vp, 3);
        vp.resize(1000.0, 400.0);
        scroll.clamp_to(&vp, 3);
        assert_eq!(scroll.offset(), 800.0);
    }

    #[test]
    fn non_finite_delta_is_ignored() {
        let mut scroll = ScrollState::default();
        let vp = viewport();
        scroll.apply(ScrollInput::PageDown, &vp, 3);
        assert_eq!(scroll.apply(ScrollInput::Pixels(f32::NAN), &vp, 3), 800.0);
    }
}
