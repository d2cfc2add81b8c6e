/// Slide indices bound to the two blend texture slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSlots {
    pub a: usize,
    pub b: usize,
}

/// Shader parameters read by the renderer every frame.
///
/// Writes go through setters so `disp_power` always stays inside `[0, 1]`
/// and `intensity` never goes negative.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacementUniforms {
    disp_power: f32,
    intensity: f32,
    resolution: [f32; 2],
    slots: TextureSlots,
}

impl DisplacementUniforms {
    pub fn new(intensity: f32, resolution: (u32, u32), slots: TextureSlots) -> Self {
        let mut uniforms = Self {
            disp_power: 0.0,
            intensity: 0.0,
            resolution: [0.0, 0.0],
            slots,
        };
        uniforms.set_intensity(intensity);
        uniforms.set_resolution(resolution.0, resolution.1);
        uniforms
    }

    pub fn disp_power(&self) -> f32 {
        self.disp_power
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn resolution(&self) -> [f32; 2] {
        self.resolution
    }

    pub fn slots(&self) -> TextureSlots {
        self.slots
    }

    /// Stores the displacement power clamped to `[0, 1]` and returns it.
    pub fn set_displacement(&mut self, value: f32) -> f32 {
        self.disp_power = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        };
        self.disp_power
    }

    pub fn set_intensity(&mut self, value: f32) -> f32 {
        if !value.is_nan() {
            self.intensity = value.max(0.0);
        }
        self.intensity
    }

    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.resolution = [width as f32, height as f32];
    }

    pub fn set_slots(&mut self, slots: TextureSlots) {
        self.slots = slots;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniforms() -> DisplacementUniforms {
        DisplacementUniforms::new(0.5, (1920, 1080), TextureSlots { a: 0, b: 1 })
    }

    #[test]
    fn displacement_is_clamped() {
        let mut uniforms = uniforms();
        assert_eq!(uniforms.set_displacement(1.7), 1.0);
        assert_eq!(uniforms.set_displacement(-0.2), 0.0);
        uniforms.set_displacement(0.4);
        assert_eq!(uniforms.set_displacement(f32::NAN), 0.0);
    }

    #[test]
    fn intensity_ignores_nan_and_negatives() {
        let mut uniforms = uniforms();
        assert_eq!(uniforms.set_intensity(f32::NAN), 0.5);
        assert_eq!(uniforms.set_intensity(-1.0), 0.0);
        assert_eq!(uniforms.set_intensity(1.5), 1.5);
    }

    #[test]
    fn starts_settled() {
        let uniforms = uniforms();
        assert_eq!(uniforms.disp_power(), 0.0);
        assert_eq!(uniforms.resolution(), [1920.0, 1080.0]);
    }
}
