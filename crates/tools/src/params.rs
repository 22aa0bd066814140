use scrollscape_common::Rgba;
use scrollscape_kernel::SceneConfig;

/// Values exposed in the debug panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugParams {
    /// Hex color picked in the panel, e.g. `#488ba8`.
    pub material_color: String,
    pub show_panel: bool,
}

impl Default for DebugParams {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}

impl DebugParams {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            material_color: config.material_color.clone(),
            show_panel: true,
        }
    }

    /// Mesh tint for the current color. An unparsable value logs a warning
    /// and tints white, which leaves the environment reflection unchanged.
    pub fn tint(&self) -> Rgba {
        match Rgba::from_hex(&self.material_color) {
            Ok(color) => color,
            Err(err) => {
                tracing::warn!(color = %self.material_color, %err, "bad material color");
                Rgba::WHITE
            }
        }
    }

    pub fn set_tint(&mut self, color: Rgba) {
        self.material_color = color.to_hex();
    }

    pub fn toggle_panel(&mut self) -> bool {
        self.show_panel = !self.show_panel;
        self.show_panel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_config() {
        let params = DebugParams::default();
        assert_eq!(params.material_color, "#488ba8");
        assert!(params.show_panel);
        assert_eq!(params.tint().to_rgb8(), [0x48, 0x8b, 0xa8]);
    }

    #[test]
    fn invalid_color_tints_white() {
        let params = DebugParams {
            material_color: "teal".into(),
            show_panel: false,
        };
        assert_eq!(params.tint(), Rgba::WHITE);
    }

    #[test]
    fn set_tint_stores_hex() {
        let mut params = DebugParams::default();
        params.set_tint(Rgba::rgb(1.0, 0.0, 0.0));
        assert_eq!(params.material_color, "#ff0000");
    }

    #[test]
    fn toggle_panel_flips() {
        let mut params = DebugParams::default();
        assert!(!params.toggle_panel());
        assert!(params.toggle_panel());
    }
}
