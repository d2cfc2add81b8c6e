use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    Clamp,
    Repeat,
}

impl fmt::Display for TextureWrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureWrap::Clamp => f.write_str("clamp"),
            TextureWrap::Repeat => f.write_str("repeat"),
        }
    }
}

/// Sampling setup applied when a texture is uploaded. Filtering is always linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexturePolicy {
    pub wrap: TextureWrap,
    pub mipmaps: bool,
}

impl TexturePolicy {
    pub const SLIDE: TexturePolicy = TexturePolicy {
        wrap: TextureWrap::Clamp,
        mipmaps: false,
    };

    /// Tileable so large distortions never sample past an edge.
    pub const DISPLACEMENT: TexturePolicy = TexturePolicy {
        wrap: TextureWrap::Repeat,
        mipmaps: false,
    };
}

/// Tightly packed RGBA8 pixels, top row first.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    pub fn from_dynamic(image: image::DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            rgba: rgba.into_raw(),
        }
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LoadedTexture {
    pub source: String,
    pub policy: TexturePolicy,
    pub image: DecodedImage,
}

#[derive(Debug, Clone)]
pub struct LoadedAssets {
    pub displacement: LoadedTexture,
    pub slides: Vec<LoadedTexture>,
}

impl LoadedAssets {
    /// One line per texture, e.g. `slide 0 1920x1080 clamp`.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.slides.len() + 1);
        lines.push(format!(
            "displacement {}x{} {}",
            self.displacement.image.width,
            self.displacement.image.height,
            self.displacement.policy.wrap
        ));
        for (index, slide) in self.slides.iter().enumerate() {
            lines.push(format!(
                "slide {index} {}x{} {}",
                slide.image.width, slide.image.height, slide.policy.wrap
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(width: u32, height: u32, policy: TexturePolicy) -> LoadedTexture {
        LoadedTexture {
            source: "test".into(),
            policy,
            image: DecodedImage {
                width,
                height,
                rgba: vec![0; (width * height * 4) as usize],
            },
        }
    }

    #[test]
    fn summary_names_each_texture() {
        let assets = LoadedAssets {
            displacement: texture(4, 4, TexturePolicy::DISPLACEMENT),
            slides: vec![texture(8, 2, TexturePolicy::SLIDE)],
        };
        assert_eq!(
            assets.summary_lines(),
            vec!["displacement 4x4 repeat", "slide 0 8x2 clamp"]
        );
    }

    #[test]
    fn decodes_into_packed_rgba() {
        let image = image::DynamicImage::new_rgb8(3, 2);
        let decoded = DecodedImage::from_dynamic(image);
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.rgba.len(), 24);
    }
}
