use std::fmt;
use std::path::PathBuf;

use directories_next::BaseDirs;
use reqwest::Url;

use crate::error::AssetLoadError;

/// Where a texture comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Remote(Url),
    Local(PathBuf),
}

impl AssetSource {
    pub fn parse(input: &str) -> Result<Self, AssetLoadError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AssetLoadError::InvalidSource {
                url: input.to_string(),
                reason: "location must not be empty".into(),
            });
        }
        if slideconfig::is_remote(trimmed) {
            let url = Url::parse(trimmed).map_err(|err| AssetLoadError::InvalidSource {
                url: trimmed.to_string(),
                reason: err.to_string(),
            })?;
            return Ok(AssetSource::Remote(url));
        }
        let expanded = expand_home(trimmed).map_err(|reason| AssetLoadError::InvalidSource {
            url: trimmed.to_string(),
            reason,
        })?;
        Ok(AssetSource::Local(expanded))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, AssetSource::Remote(_))
    }

    /// Appends `v=<stamp>` to remote locations; local paths are returned unchanged.
    pub fn with_cache_bust(self, stamp: &str) -> Self {
        match self {
            AssetSource::Remote(mut url) => {
                url.query_pairs_mut().append_pair("v", stamp);
                AssetSource::Remote(url)
            }
            local => local,
        }
    }
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSource::Remote(url) => write!(f, "{url}"),
            AssetSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Millisecond timestamp used as the cache-busting query value.
pub fn cache_bust_stamp() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

fn expand_home(input: &str) -> Result<PathBuf, String> {
    if !input.starts_with('~') {
        return Ok(PathBuf::from(input));
    }

    let base_dirs =
        BaseDirs::new().ok_or_else(|| "unable to determine home directory for '~'".to_string())?;
    let home_dir = base_dirs.home_dir();

    if input == "~" {
        return Ok(home_dir.to_path_buf());
    }

    match input.strip_prefix("~/") {
        Some(rest) => Ok(home_dir.join(rest)),
        None => Err(format!(
            "user-specific home expansion ('{input}') is not supported"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguishes_remote_and_local() {
        let remote = AssetSource::parse("https://example.com/disp.png").unwrap();
        assert!(remote.is_remote());
        let local = AssetSource::parse("images/bg1.jpg").unwrap();
        assert_eq!(local, AssetSource::Local(PathBuf::from("images/bg1.jpg")));
    }

    #[test]
    fn cache_bust_only_touches_remote_sources() {
        let remote = AssetSource::parse("https://example.com/a.png?size=2")
            .unwrap()
            .with_cache_bust("1700000000000");
        assert_eq!(
            remote.to_string(),
            "https://example.com/a.png?size=2&v=1700000000000"
        );

        let local = AssetSource::parse("slides/a.png")
            .unwrap()
            .with_cache_bust("1700000000000");
        assert_eq!(local.to_string(), "slides/a.png");
    }

    #[test]
    fn rejects_malformed_locations() {
        assert!(matches!(
            AssetSource::parse("http://"),
            Err(AssetLoadError::InvalidSource { .. })
        ));
        assert!(AssetSource::parse("   ").is_err());
        assert!(AssetSource::parse("~someone/x.png").is_err());
    }

    #[test]
    fn stamp_is_numeric() {
        let stamp = cache_bust_stamp();
        assert!(!stamp.is_empty());
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }
}
