/// Debug panel for live material tweaks
use crate::material::{Hsv, Material, Rgb};

/// Hue rotation applied per color adjustment step.
pub const HUE_STEP_DEGREES: f32 = 10.0;

/// Saturation and brightness change per adjustment step.
pub const TONE_STEP: f32 = 0.05;

/// Metalness change per adjustment step.
pub const METALNESS_STEP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Hue of the material color
    Color,
    Saturation,
    Brightness,
    Metalness,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::Color,
        Control::Saturation,
        Control::Brightness,
        Control::Metalness,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Control::Color => "color",
            Control::Saturation => "saturation",
            Control::Brightness => "brightness",
            Control::Metalness => "metalness",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DebugPanel {
    pub visible: bool,
    selected: usize,
    /// Last color written by the panel and the unrounded HSV behind it.
    tone: Option<(Rgb, Hsv)>,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self {
            visible: true,
            selected: 0,
            tone: None,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn selected(&self) -> Control {
        Control::ALL[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Control::ALL.len();
    }

    pub fn select_previous(&mut self) {
        self.selected = (self.selected + Control::ALL.len() - 1) % Control::ALL.len();
    }

    /// Nudge the selected control by `steps` (negative to decrease).
    pub fn adjust(&mut self, material: &mut Material, steps: i32) {
        let steps = steps as f32;
        match self.selected() {
            Control::Color => self.retone(material, |hsv| {
                hsv.h = (hsv.h + steps * HUE_STEP_DEGREES).rem_euclid(360.0);
            }),
            Control::Saturation => self.retone(material, |hsv| {
                hsv.s = (hsv.s + steps * TONE_STEP).clamp(0.0, 1.0);
            }),
            Control::Brightness => self.retone(material, |hsv| {
                hsv.v = (hsv.v + steps * TONE_STEP).clamp(0.0, 1.0);
            }),
            Control::Metalness => {
                set_metalness(material, material.metalness + steps * METALNESS_STEP);
            }
        }
        tracing::debug!(
            control = self.selected().label(),
            color = %material.color,
            metalness = material.metalness,
            "debug panel adjusted material"
        );
    }

    /// Apply `change` to the color in HSV space. The panel keeps its own HSV
    /// so repeated steps don't accumulate 8-bit rounding, and so a grey color
    /// keeps its hue while saturation is raised again. A color set from
    /// elsewhere resets that state.
    fn retone(&mut self, material: &mut Material, change: impl FnOnce(&mut Hsv)) {
        let mut hsv = self.hsv(material);
        change(&mut hsv);
        material.color = hsv.to_rgb();
        self.tone = Some((material.color, hsv));
    }

    /// One line per control, the selected one marked with `>`.
    pub fn lines(&self, material: &Material) -> Vec<String> {
        Control::ALL
            .iter()
            .map(|&control| {
                let marker = if control == self.selected() { '>' } else { ' ' };
                let value = match control {
                    Control::Color => material.color.to_string(),
                    Control::Saturation => format!("{:.2}", self.hsv(material).s),
                    Control::Brightness => format!("{:.2}", self.hsv(material).v),
                    Control::Metalness => format!("{:.2}", material.metalness),
                };
                format!("{marker} {:<10} {value}", control.label())
            })
            .collect()
    }

    fn hsv(&self, material: &Material) -> Hsv {
        match self.tone {
            Some((written, hsv)) if written == material.color => hsv,
            _ => material.color.to_hsv(),
        }
    }
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Set metalness clamped to [0, 1] and snapped to the panel step.
pub fn set_metalness(material: &mut Material, value: f32) {
    let snapped = (value / METALNESS_STEP).round() * METALNESS_STEP;
    material.metalness = snapped.clamp(0.0, 1.0);
}
