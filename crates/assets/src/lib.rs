//! Asset pipeline: resolves the displacement map and slide images, fetches
//! them concurrently, and decodes them into RGBA8 buffers ready for upload.

mod error;
mod loader;
mod source;
mod texture;

pub use error::AssetLoadError;
pub use loader::{AssetLoader, AssetRequest};
pub use source::{cache_bust_stamp, AssetSource};
pub use texture::{DecodedImage, LoadedAssets, LoadedTexture, TexturePolicy, TextureWrap};
