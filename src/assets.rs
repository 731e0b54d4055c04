//! Logo loading with cache-busting, format sniffing and graceful failure.
//!
//! The loader resolves a logo path against a base location, fetches the bytes
//! through an [`AssetFetcher`], and validates them with the [`image`] crate.
//! Any failure is reported as an [`AssetError`]; callers treat it as "no logo"
//! rather than aborting the report.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use image::GenericImageView;
use log::debug;
use url::Url;

use crate::error::AssetError;

/// Default logo location relative to the serving base.
pub const DEFAULT_LOGO_PATH: &str = "assets/logo.png";

/// Embedding format of an image asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Detects the format from the leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    /// Maps a `Content-Type` header value to a format.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// A decoded, embeddable image.
#[derive(Clone, PartialEq, Eq)]
pub struct Asset {
    bytes: Vec<u8>,
    format: ImageFormat,
    width_px: u32,
    height_px: u32,
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("bytes", &self.bytes.len())
            .field("format", &self.format)
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .finish()
    }
}

impl Asset {
    /// Validates `bytes` as an image of `format` and records its dimensions.
    pub fn decode(bytes: Vec<u8>, format: ImageFormat) -> Result<Self, AssetError> {
        let image = image::load_from_memory_with_format(&bytes, format.to_image_format())?;
        let (width_px, height_px) = image.dimensions();
        Ok(Self {
            bytes,
            format,
            width_px,
            height_px,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    /// Width divided by height; `1.0` for degenerate images.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height_px == 0 {
            1.0
        } else {
            f64::from(self.width_px) / f64::from(self.height_px)
        }
    }

    /// Decodes the image for embedding.
    pub fn to_dynamic_image(&self) -> Result<image::DynamicImage, AssetError> {
        Ok(image::load_from_memory_with_format(
            &self.bytes,
            self.format.to_image_format(),
        )?)
    }
}

/// Raw response of an asset fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn ok(content_type: Option<&str>, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: content_type.map(str::to_owned),
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches raw bytes for a resolved asset URL.
///
/// Non-2xx responses should be returned as a [`FetchResponse`] with their
/// status; only transport failures are errors.
pub trait AssetFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse, AssetError>;
}

impl<F: AssetFetcher + ?Sized> AssetFetcher for Box<F> {
    fn fetch(&self, url: &str) -> Result<FetchResponse, AssetError> {
        (**self).fetch(url)
    }
}

/// Fetches assets over HTTP(S).
#[cfg(feature = "http")]
#[derive(Clone, Debug, Default)]
pub struct HttpFetcher;

#[cfg(feature = "http")]
impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse, AssetError> {
        use std::io::Read;

        let response = match ureq::get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                return Ok(FetchResponse {
                    status,
                    content_type: Some(response.content_type().to_owned()),
                    body: Vec::new(),
                })
            }
            Err(err) => {
                return Err(AssetError::Fetch {
                    url: url.to_owned(),
                    message: err.to_string(),
                })
            }
        };

        let status = response.status();
        let content_type = response.header("Content-Type").map(str::to_owned);
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|err| AssetError::Fetch {
                url: url.to_owned(),
                message: err.to_string(),
            })?;

        Ok(FetchResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Reads assets from the local filesystem.
///
/// Accepts `file://` URLs (percent-decoded, query ignored) and plain paths.
/// A missing file maps to a 404 response.
#[derive(Clone, Debug, Default)]
pub struct FsFetcher;

impl AssetFetcher for FsFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse, AssetError> {
        let path = match Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "file" => {
                parsed.to_file_path().map_err(|()| AssetError::InvalidUrl {
                    url: url.to_owned(),
                    message: "not a local file path".to_owned(),
                })?
            }
            Ok(parsed) => {
                return Err(AssetError::Fetch {
                    url: url.to_owned(),
                    message: format!("unsupported scheme '{}'", parsed.scheme()),
                })
            }
            Err(_) => PathBuf::from(url),
        };

        match fs::read(&path) {
            Ok(body) => Ok(FetchResponse::ok(None, body)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(FetchResponse {
                status: 404,
                ..FetchResponse::default()
            }),
            Err(err) => Err(AssetError::Fetch {
                url: url.to_owned(),
                message: err.to_string(),
            }),
        }
    }
}

type CacheToken = Box<dyn Fn() -> String>;

/// Resolves, fetches and validates the report logo.
pub struct LogoLoader {
    base: String,
    fetcher: Box<dyn AssetFetcher>,
    cache_token: CacheToken,
}

impl LogoLoader {
    /// Creates a loader resolving paths against `base` (a URL or directory).
    pub fn new(base: impl Into<String>, fetcher: impl AssetFetcher + 'static) -> Self {
        Self {
            base: base.into(),
            fetcher: Box::new(fetcher),
            cache_token: Box::new(|| chrono::Utc::now().timestamp_millis().to_string()),
        }
    }

    /// Replaces the cache-busting token source.
    pub fn with_cache_token<F>(mut self, token: F) -> Self
    where
        F: Fn() -> String + 'static,
    {
        self.cache_token = Box::new(token);
        self
    }

    /// Resolves `path` against the base without cache-busting.
    ///
    /// Absolute URLs are kept, everything else follows standard relative
    /// reference resolution against the base URL or directory.
    pub fn resolve(&self, path: &str) -> Result<Url, AssetError> {
        resolve_against(&self.base, path)
    }

    /// Loads the asset at `path`.
    pub fn load(&self, path: &str) -> Result<Asset, AssetError> {
        let url = cache_busted(self.resolve(path)?, &(self.cache_token)()).to_string();
        debug!("fetching logo from {url}");

        let response = self.fetcher.fetch(&url)?;
        if !response.is_success() {
            return Err(AssetError::Status {
                url,
                status: response.status,
            });
        }

        let format = ImageFormat::sniff(&response.body)
            .or_else(|| {
                response
                    .content_type
                    .as_deref()
                    .and_then(ImageFormat::from_content_type)
            })
            .ok_or_else(|| AssetError::UnsupportedFormat {
                content_type: response.content_type.clone(),
            })?;

        Asset::decode(response.body, format)
    }
}

fn invalid_url(url: &str, message: impl fmt::Display) -> AssetError {
    AssetError::InvalidUrl {
        url: url.to_owned(),
        message: message.to_string(),
    }
}

/// Parses `base` as a URL, falling back to a filesystem directory.
fn base_url(base: &str) -> Result<Url, AssetError> {
    let directory = Path::new(base);
    if !directory.is_absolute() {
        if let Ok(url) = Url::parse(base) {
            return Ok(url);
        }
    }
    let directory = env::current_dir()
        .map_err(|err| invalid_url(base, err))?
        .join(directory);
    Url::from_directory_path(&directory).map_err(|()| invalid_url(base, "not a usable directory"))
}

fn resolve_against(base: &str, path: &str) -> Result<Url, AssetError> {
    match Url::parse(path) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => base_url(base)?
            .join(path)
            .map_err(|err| invalid_url(path, err)),
        Err(err) => Err(invalid_url(path, err)),
    }
}

/// Appends the `v=<token>` cache-busting pair, keeping any fragment.
fn cache_busted(mut url: Url, token: &str) -> Url {
    url.query_pairs_mut().append_pair("v", token);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(base: &str, path: &str) -> String {
        resolve_against(base, path).unwrap().to_string()
    }

    #[test]
    fn resolves_relative_rooted_and_absolute_paths() {
        assert_eq!(
            resolved("https://pools.example.com/app/", "assets/logo.png"),
            "https://pools.example.com/app/assets/logo.png"
        );
        assert_eq!(
            resolved("https://pools.example.com/app", "assets/logo.png"),
            "https://pools.example.com/assets/logo.png"
        );
        assert_eq!(
            resolved("https://pools.example.com/app/index.html?x=1", "assets/logo.png"),
            "https://pools.example.com/app/assets/logo.png"
        );
        assert_eq!(
            resolved("https://pools.example.com/app/", "../logo.png"),
            "https://pools.example.com/logo.png"
        );
        assert_eq!(
            resolved("https://pools.example.com/app/", "/logo.jpg"),
            "https://pools.example.com/logo.jpg"
        );
        assert_eq!(
            resolved("https://pools.example.com/app/", "//cdn.example.com/logo.png"),
            "https://cdn.example.com/logo.png"
        );
        assert_eq!(
            resolved("https://pools.example.com/app/", "https://cdn.example.com/l.png"),
            "https://cdn.example.com/l.png"
        );
    }

    #[cfg(unix)]
    #[test]
    fn directory_bases_become_file_urls() {
        assert_eq!(
            resolved("/srv/www", "assets/logo.png"),
            "file:///srv/www/assets/logo.png"
        );
        assert_eq!(
            resolved("/srv/www/", "pool logo.png"),
            "file:///srv/www/pool%20logo.png"
        );
    }

    #[test]
    fn cache_buster_respects_existing_query_and_fragment() {
        let busted = |url: &str| cache_busted(Url::parse(url).unwrap(), "1").to_string();
        assert_eq!(busted("https://x.test/a.png"), "https://x.test/a.png?v=1");
        assert_eq!(busted("https://x.test/a.png?x=2"), "https://x.test/a.png?x=2&v=1");
        assert_eq!(busted("https://x.test/a.png#top"), "https://x.test/a.png?v=1#top");
    }

    #[test]
    fn fs_fetcher_reads_percent_encoded_file_urls() {
        let directory =
            std::env::temp_dir().join(format!("pool_report_assets_{}", std::process::id()));
        fs::create_dir_all(&directory).unwrap();
        fs::write(directory.join("pool logo.bin"), b"logo").unwrap();

        let loader = LogoLoader::new(directory.to_string_lossy(), FsFetcher);
        let url = cache_busted(loader.resolve("pool logo.bin").unwrap(), "7");
        assert!(url.as_str().contains("pool%20logo.bin?v=7"));

        let response = FsFetcher.fetch(url.as_str()).unwrap();
        assert!(response.is_success());
        assert_eq!(response.body, b"logo");

        let missing = FsFetcher
            .fetch(loader.resolve("missing.png").unwrap().as_str())
            .unwrap();
        assert_eq!(missing.status, 404);
        assert!(FsFetcher.fetch("https://pools.example.com/logo.png").is_err());

        fs::remove_dir_all(&directory).unwrap();
    }

    #[test]
    fn sniffing_prefers_magic_bytes() {
        assert_eq!(
            ImageFormat::sniff(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0]),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(b"GIF89a"), None);
        assert_eq!(
            ImageFormat::from_content_type("image/JPEG; charset=binary"),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_content_type("text/html"), None);
    }
}
