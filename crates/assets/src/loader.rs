use std::fs;
use std::thread;

use crossbeam_channel::unbounded;
use reqwest::blocking::Client;
use slideconfig::SliderConfig;

use crate::error::AssetLoadError;
use crate::source::{cache_bust_stamp, AssetSource};
use crate::texture::{DecodedImage, LoadedAssets, LoadedTexture, TexturePolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub displacement: AssetSource,
    pub slides: Vec<AssetSource>,
}

impl AssetRequest {
    pub fn from_config(config: &SliderConfig) -> Result<Self, AssetLoadError> {
        let stamp = cache_bust_stamp();
        Self::from_config_with_stamp(config, &stamp)
    }

    pub fn from_config_with_stamp(
        config: &SliderConfig,
        stamp: &str,
    ) -> Result<Self, AssetLoadError> {
        let displacement = AssetSource::parse(&config.displacement)?;
        let slides = config
            .images
            .iter()
            .map(|image| {
                let source = AssetSource::parse(image)?;
                Ok(if config.cache_bust {
                    source.with_cache_bust(stamp)
                } else {
                    source
                })
            })
            .collect::<Result<Vec<_>, AssetLoadError>>()?;
        Ok(Self {
            displacement,
            slides,
        })
    }

    /// Displacement map plus every slide.
    pub fn texture_count(&self) -> usize {
        self.slides.len() + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetSlot {
    Displacement,
    Slide(usize),
}

/// Fetches and decodes every texture of a request concurrently.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    client: Client,
}

impl AssetLoader {
    pub fn new() -> Result<Self, AssetLoadError> {
        let client = Client::builder()
            .user_agent(concat!("dispslide/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AssetLoadError::Client)?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Resolves once every texture is decoded, or with the first failure.
    pub fn load(&self, request: &AssetRequest) -> Result<LoadedAssets, AssetLoadError> {
        let (tx, rx) = unbounded();
        let jobs = std::iter::once((
            AssetSlot::Displacement,
            request.displacement.clone(),
            TexturePolicy::DISPLACEMENT,
        ))
        .chain(request.slides.iter().enumerate().map(|(index, source)| {
            (AssetSlot::Slide(index), source.clone(), TexturePolicy::SLIDE)
        }));

        for (slot, source, policy) in jobs {
            let tx = tx.clone();
            let client = self.client.clone();
            let name = match slot {
                AssetSlot::Displacement => "asset-displacement".to_string(),
                AssetSlot::Slide(index) => format!("asset-slide-{index}"),
            };
            let url = source.to_string();
            let spawned = thread::Builder::new().name(name).spawn(move || {
                let result = fetch_texture(&client, &source, policy);
                // Receiver is gone once another asset has already failed.
                let _ = tx.send((slot, result));
            });
            if let Err(err) = spawned {
                tracing::error!(%url, "failed to spawn asset loader: {err}");
                return Err(AssetLoadError::Disconnected { url });
            }
        }
        drop(tx);

        let mut displacement = None;
        let mut slides: Vec<Option<LoadedTexture>> = vec![None; request.slides.len()];
        for (slot, result) in rx.iter() {
            let texture = match result {
                Ok(texture) => texture,
                Err(err) => {
                    tracing::error!("asset load failed: {err}");
                    return Err(err);
                }
            };
            tracing::debug!(
                url = %texture.source,
                width = texture.image.width,
                height = texture.image.height,
                "texture ready"
            );
            match slot {
                AssetSlot::Displacement => displacement = Some(texture),
                AssetSlot::Slide(index) => slides[index] = Some(texture),
            }
        }

        let displacement = displacement.ok_or_else(|| AssetLoadError::Disconnected {
            url: request.displacement.to_string(),
        })?;
        let slides = slides
            .into_iter()
            .zip(&request.slides)
            .map(|(texture, source)| {
                texture.ok_or_else(|| AssetLoadError::Disconnected {
                    url: source.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(slides = slides.len(), "all textures loaded");
        Ok(LoadedAssets {
            displacement,
            slides,
        })
    }
}

fn fetch_texture(
    client: &Client,
    source: &AssetSource,
    policy: TexturePolicy,
) -> Result<LoadedTexture, AssetLoadError> {
    let url = source.to_string();
    let bytes = match source {
        AssetSource::Remote(remote) => {
            tracing::debug!(%url, "downloading texture");
            let response = client
                .get(remote.clone())
                .send()
                .map_err(|source| AssetLoadError::Fetch {
                    url: url.clone(),
                    source,
                })?;
            let status = response.status();
            if !status.is_success() {
                return Err(AssetLoadError::Status {
                    url,
                    status: status.as_u16(),
                });
            }
            response
                .bytes()
                .map_err(|source| AssetLoadError::Fetch {
                    url: url.clone(),
                    source,
                })?
                .to_vec()
        }
        AssetSource::Local(path) => {
            tracing::debug!(%url, "reading texture");
            fs::read(path).map_err(|source| AssetLoadError::Read {
                url: url.clone(),
                source,
            })?
        }
    };

    let decoded = image::load_from_memory(&bytes).map_err(|source| AssetLoadError::Decode {
        url: url.clone(),
        source,
    })?;
    Ok(LoadedTexture {
        source: url,
        policy,
        image: DecodedImage::from_dynamic(decoded),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_png(path: &Path, width: u32, height: u32) {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
        image.save(path).unwrap();
    }

    fn local(path: &Path) -> AssetSource {
        AssetSource::Local(path.to_path_buf())
    }

    #[test]
    fn loads_every_texture_with_its_policy() {
        let dir = tempfile::tempdir().unwrap();
        let disp = dir.path().join("disp.png");
        let one = dir.path().join("one.png");
        let two = dir.path().join("two.png");
        write_png(&disp, 4, 4);
        write_png(&one, 8, 6);
        write_png(&two, 6, 8);

        let request = AssetRequest {
            displacement: local(&disp),
            slides: vec![local(&one), local(&two)],
        };
        let loaded = AssetLoader::new().unwrap().load(&request).unwrap();

        assert_eq!(loaded.displacement.policy, TexturePolicy::DISPLACEMENT);
        assert_eq!(loaded.slides.len(), 2);
        assert_eq!(
            (loaded.slides[0].image.width, loaded.slides[0].image.height),
            (8, 6)
        );
        assert_eq!(
            (loaded.slides[1].image.width, loaded.slides[1].image.height),
            (6, 8)
        );
        assert!(loaded
            .slides
            .iter()
            .all(|slide| slide.policy == TexturePolicy::SLIDE));
        assert_eq!(loaded.slides[0].image.rgba.len(), 8 * 6 * 4);
    }

    #[test]
    fn missing_slide_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        let disp = dir.path().join("disp.png");
        let one = dir.path().join("one.png");
        write_png(&disp, 2, 2);
        write_png(&one, 2, 2);
        let missing = dir.path().join("missing.png");

        let request = AssetRequest {
            displacement: local(&disp),
            slides: vec![local(&one), local(&missing)],
        };
        let err = AssetLoader::new().unwrap().load(&request).unwrap_err();
        assert!(matches!(err, AssetLoadError::Read { .. }));
        assert_eq!(err.url(), Some(missing.display().to_string().as_str()));
    }

    #[test]
    fn undecodable_displacement_reports_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let disp = dir.path().join("disp.png");
        fs::write(&disp, b"not an image").unwrap();
        let one = dir.path().join("one.png");
        let two = dir.path().join("two.png");
        write_png(&one, 2, 2);
        write_png(&two, 2, 2);

        let request = AssetRequest {
            displacement: local(&disp),
            slides: vec![local(&one), local(&two)],
        };
        let err = AssetLoader::new().unwrap().load(&request).unwrap_err();
        assert!(matches!(err, AssetLoadError::Decode { .. }));

        let init: slider::InitError = err.into();
        match init {
            slider::InitError::AssetLoad { url, .. } => assert!(url.ends_with("disp.png")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn request_busts_only_remote_slides() {
        let config = SliderConfig {
            images: vec![
                "https://cdn.example.com/a.jpg".into(),
                "/srv/slides/b.jpg".into(),
            ],
            ..SliderConfig::default()
        };
        let request = AssetRequest::from_config_with_stamp(&config, "42").unwrap();
        assert_eq!(request.slides[0].to_string(), "https://cdn.example.com/a.jpg?v=42");
        assert_eq!(request.slides[1].to_string(), "/srv/slides/b.jpg");
        assert!(!request.displacement.to_string().contains("v=42"));
        assert_eq!(request.texture_count(), 3);
    }

    #[test]
    fn cache_bust_can_be_disabled() {
        let config = SliderConfig {
            images: vec!["https://a.example/1.jpg".into(), "https://a.example/2.jpg".into()],
            cache_bust: false,
            ..SliderConfig::default()
        };
        let request = AssetRequest::from_config_with_stamp(&config, "42").unwrap();
        assert_eq!(request.slides[1].to_string(), "https://a.example/2.jpg");
    }
}
