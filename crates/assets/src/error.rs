/// Failure to bring a single texture in. Every variant names the asset.
#[derive(Debug, thiserror::Error)]
pub enum AssetLoadError {
    #[error("invalid asset location '{url}': {reason}")]
    InvalidSource { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read {url}: {source}")]
    Read {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },
    #[error("loader for {url} stopped before reporting a result")]
    Disconnected { url: String },
}

impl AssetLoadError {
    pub fn url(&self) -> Option<&str> {
        match self {
            AssetLoadError::Client(_) => None,
            AssetLoadError::InvalidSource { url, .. }
            | AssetLoadError::Fetch { url, .. }
            | AssetLoadError::Status { url, .. }
            | AssetLoadError::Read { url, .. }
            | AssetLoadError::Decode { url, .. }
            | AssetLoadError::Disconnected { url } => Some(url),
        }
    }
}

impl From<AssetLoadError> for slider::InitError {
    fn from(err: AssetLoadError) -> Self {
        let url = err.url().unwrap_or("<http client>").to_string();
        let reason = match &err {
            AssetLoadError::InvalidSource { reason, .. } => reason.clone(),
            AssetLoadError::Status { status, .. } => format!("status {status}"),
            AssetLoadError::Client(source) | AssetLoadError::Fetch { source, .. } => {
                source.to_string()
            }
            AssetLoadError::Read { source, .. } => source.to_string(),
            AssetLoadError::Decode { source, .. } => source.to_string(),
            AssetLoadError::Disconnected { .. } => "loader disconnected".to_string(),
        };
        slider::InitError::AssetLoad { url, reason }
    }
}
