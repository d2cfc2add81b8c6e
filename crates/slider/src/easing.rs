use slideconfig::EasingName;

/// Easing curves available to the displacement sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    Smoothstep,
    EaseInOut,
    #[default]
    ExpoInOut,
    Power2Out,
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        let clamped = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => clamped,
            Easing::Smoothstep => clamped * clamped * (3.0 - 2.0 * clamped),
            Easing::EaseInOut => {
                if clamped < 0.5 {
                    2.0 * clamped * clamped
                } else {
                    -1.0 + (4.0 - 2.0 * clamped) * clamped
                }
            }
            Easing::ExpoInOut => {
                if clamped <= 0.0 {
                    0.0
                } else if clamped >= 1.0 {
                    1.0
                } else if clamped < 0.5 {
                    2f32.powf(20.0 * clamped - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * clamped + 10.0)) / 2.0
                }
            }
            Easing::Power2Out => {
                let inv = 1.0 - clamped;
                1.0 - inv * inv
            }
        }
    }
}

impl From<EasingName> for Easing {
    fn from(value: EasingName) -> Self {
        match value {
            EasingName::Linear => Easing::Linear,
            EasingName::Smoothstep => Easing::Smoothstep,
            EasingName::EaseInOut => Easing::EaseInOut,
            EasingName::ExpoInOut => Easing::ExpoInOut,
            EasingName::Power2Out => Easing::Power2Out,
        }
    }
}
