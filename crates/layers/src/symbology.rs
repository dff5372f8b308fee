use serde::{Deserialize, Serialize};

/// Paint settings of a highlight overlay. Colors are linear RGBA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    pub stroke_color: [f32; 4],
    pub stroke_weight: f32,
    pub fill_color: [f32; 4],
    pub fill_opacity: f32,
    pub opacity: f32,
    /// Extra class for a glow effect on DOM-backed surfaces.
    pub class_name: Option<String>,
}

impl Default for HighlightStyle {
    // Yellow outline, fill hidden until the blink animation reveals it.
    fn default() -> Self {
        Self {
            stroke_color: [1.0, 1.0, 0.0, 1.0],
            stroke_weight: 1.5,
            fill_color: [1.0, 1.0, 0.0, 1.0],
            fill_opacity: 0.0,
            opacity: 1.0,
            class_name: Some("glow-effect".to_string()),
        }
    }
}
