//! Public asset locations.
//!
//! Uploaded files and catalog pictures are stored as paths relative to the
//! uploads directory; clients always receive absolute URLs built from
//! `API_PUBLIC_URL`.

use crate::{env_or_default, ConfigError, FromEnv};
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AssetConfig {
    /// Base URL the uploads directory is served under
    pub public_url: String,
    /// Directory uploaded files are written to
    pub uploads_dir: PathBuf,
    /// Illustration shown next to the catalog filter when none is stored
    pub default_filter_image: String,
}

impl AssetConfig {
    pub fn new(public_url: impl Into<String>, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_url: public_url.into(),
            uploads_dir: uploads_dir.into(),
            default_filter_image: "filter.png".to_string(),
        }
    }

    /// Joins a stored relative path onto the public base URL.
    pub fn resolve(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.public_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl FromEnv for AssetConfig {
    /// - API_PUBLIC_URL: defaults to http://localhost:8080/static
    /// - UPLOADS_DIR: defaults to ./public
    /// - FILTER_IMAGE_PATH: defaults to filter.png
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            public_url: env_or_default("API_PUBLIC_URL", "http://localhost:8080/static"),
            uploads_dir: PathBuf::from(env_or_default("UPLOADS_DIR", "./public")),
            default_filter_image: env_or_default("FILTER_IMAGE_PATH", "filter.png"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_joins_with_single_slash() {
        let assets = AssetConfig::new("http://cdn.local/static/", "./public");
        assert_eq!(
            assets.resolve("/doors/a.png"),
            "http://cdn.local/static/doors/a.png"
        );
        assert_eq!(assets.resolve("b.jpg"), "http://cdn.local/static/b.jpg");
    }

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            [
                ("API_PUBLIC_URL", None::<&str>),
                ("UPLOADS_DIR", None),
                ("FILTER_IMAGE_PATH", None),
            ],
            || {
                let assets = AssetConfig::from_env().unwrap();
                assert_eq!(assets.public_url, "http://localhost:8080/static");
                assert_eq!(assets.uploads_dir, PathBuf::from("./public"));
                assert_eq!(assets.default_filter_image, "filter.png");
            },
        );
    }
}
