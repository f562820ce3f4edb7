//! Strand texture assets and their one-shot asynchronous loading.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::{ParseError, Url};

use crate::error::{ChartError, ChartResult};

pub const DEFAULT_TEXTURE_URL: &str = "yarn.png";

/// Decoded, non-premultiplied RGBA8 image of one horizontal strand segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> ChartResult<Self> {
        let image = Self {
            width,
            height,
            rgba,
        };
        image.validate()?;
        Ok(image)
    }

    /// Single-color texture, mostly useful for headless rendering.
    #[must_use]
    pub fn solid(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            rgba: pixel.repeat(count),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ChartError::InvalidData(
                "texture size must be > 0".to_owned(),
            ));
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.rgba.len() != expected {
            return Err(ChartError::InvalidData(format!(
                "texture data has {} bytes, expected {expected}",
                self.rgba.len()
            )));
        }
        Ok(())
    }
}

/// Credential policy for fetching a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossOrigin {
    SameOrigin,
    /// Cross-origin fetch without credentials.
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRequest {
    pub url: String,
    pub cross_origin: CrossOrigin,
}

impl TextureRequest {
    /// Relative URLs are same-origin. Absolute and scheme-relative URLs are
    /// anonymous unless their origin matches `page_origin`.
    #[must_use]
    pub fn new(url: impl Into<String>, page_origin: Option<&str>) -> Self {
        let url = url.into();
        let page = page_origin.and_then(|origin| Url::parse(origin).ok());
        let cross_origin = match (absolute_url(&url, page.as_ref()), page) {
            (None, _) => CrossOrigin::SameOrigin,
            (Some(target), Some(page)) if target.origin() == page.origin() => {
                CrossOrigin::SameOrigin
            }
            (Some(_), _) => CrossOrigin::Anonymous,
        };
        Self { url, cross_origin }
    }

    #[must_use]
    pub fn omits_credentials(&self) -> bool {
        self.cross_origin == CrossOrigin::Anonymous
    }
}

/// Resolves `url` to an absolute URL, or `None` for path-relative references.
fn absolute_url(url: &str, page: Option<&Url>) -> Option<Url> {
    match Url::parse(url) {
        Ok(parsed) => Some(parsed),
        Err(ParseError::RelativeUrlWithoutBase) if url.starts_with("//") => match page {
            Some(page) => page.join(url).ok(),
            None => Url::parse(&format!("https:{url}")).ok(),
        },
        Err(_) => None,
    }
}

/// Fetches and decodes texture images. Implementations may block.
pub trait TextureLoader: Send + Sync {
    fn load(&self, request: &TextureRequest) -> ChartResult<TextureImage>;
}

/// Loader serving pre-decoded images by URL.
#[derive(Debug, Clone, Default)]
pub struct MemoryTextureLoader {
    textures: IndexMap<String, TextureImage>,
}

impl MemoryTextureLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_texture(mut self, url: impl Into<String>, image: TextureImage) -> Self {
        self.insert(url, image);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, image: TextureImage) {
        self.textures.insert(url.into(), image);
    }
}

impl TextureLoader for MemoryTextureLoader {
    fn load(&self, request: &TextureRequest) -> ChartResult<TextureImage> {
        self.textures
            .get(&request.url)
            .cloned()
            .ok_or_else(|| ChartError::TextureLoad {
                url: request.url.clone(),
                reason: "not found".to_owned(),
            })
    }
}

/// Completion signal of a texture load running on its own thread.
///
/// There is no retry and no cancellation; dropping the handle only discards
/// the result.
#[derive(Debug)]
pub struct PendingTexture {
    request: TextureRequest,
    receiver: Receiver<ChartResult<TextureImage>>,
}

impl PendingTexture {
    #[must_use]
    pub fn request(&self) -> &TextureRequest {
        &self.request
    }

    /// Returns the result once available without blocking.
    pub fn try_take(&self) -> Option<ChartResult<Arc<TextureImage>>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result.map(Arc::new)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(self.terminated())),
        }
    }

    /// Blocks until the load finishes.
    pub fn wait(self) -> ChartResult<Arc<TextureImage>> {
        match self.receiver.recv() {
            Ok(result) => result.map(Arc::new),
            Err(_) => Err(self.terminated()),
        }
    }

    fn terminated(&self) -> ChartError {
        ChartError::TextureLoad {
            url: self.request.url.clone(),
            reason: "loader terminated without a result".to_owned(),
        }
    }
}

/// Starts loading `request` on a background thread.
#[must_use]
pub fn spawn_texture_load(
    loader: Arc<dyn TextureLoader>,
    request: TextureRequest,
) -> PendingTexture {
    let (tx, rx) = mpsc::channel();
    let worker_request = request.clone();
    thread::spawn(move || {
        let result = loader.load(&worker_request).and_then(|image| {
            image.validate()?;
            Ok(image)
        });
        match &result {
            Ok(image) => debug!(
                url = %worker_request.url,
                width = image.width,
                height = image.height,
                "texture loaded"
            ),
            Err(err) => warn!(url = %worker_request.url, error = %err, "texture load failed"),
        }
        let _ = tx.send(result);
    });
    PendingTexture {
        request,
        receiver: rx,
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::{CrossOrigin, TextureRequest, absolute_url};

    #[test]
    fn absolute_url_keeps_relative_paths_relative() {
        assert_eq!(absolute_url("yarn.png", None), None);
        assert_eq!(absolute_url("textures/yarn.png", None), None);

        let page = Url::parse("https://charts.example.com/app/").expect("page url");
        let resolved = absolute_url("//cdn.example.com/yarn.png", Some(&page)).expect("resolved");
        assert_eq!(resolved.as_str(), "https://cdn.example.com/yarn.png");
    }

    #[test]
    fn request_compares_against_page_origin() {
        let page = Some("https://charts.example.com");
        let same = TextureRequest::new("https://charts.example.com/yarn.png", page);
        assert_eq!(same.cross_origin, CrossOrigin::SameOrigin);

        let other = TextureRequest::new("https://cdn.example.com/yarn.png", page);
        assert!(other.omits_credentials());

        let relative = TextureRequest::new("textures/yarn.png", page);
        assert!(!relative.omits_credentials());
    }
}
