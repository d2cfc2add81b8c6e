/// Fatal failures while bringing a slider up.
///
/// Navigation requests that fall outside the transition guards are not
/// errors; see [`crate::Navigation`].
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("container '{0}' not found")]
    ContainerNotFound(String),
    #[error("failed to load asset {url}: {reason}")]
    AssetLoad { url: String, reason: String },
    #[error("slider needs at least two slides, found {0}")]
    NotEnoughSlides(usize),
    #[error("failed to prepare render surface: {0}")]
    Surface(String),
    #[error("failed to build displacement material: {0}")]
    Material(String),
}

impl InitError {
    pub fn surface(err: anyhow::Error) -> Self {
        InitError::Surface(format!("{err:#}"))
    }

    pub fn material(err: anyhow::Error) -> Self {
        InitError::Material(format!("{err:#}"))
    }
}
