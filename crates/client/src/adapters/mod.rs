//! Built-in tool adapters, one per analysis endpoint.

mod image;
mod news;
mod speech;
mod unified;

pub use image::ImageAdapter;
pub use news::NewsAdapter;
pub use speech::{SpeechAdapter, YoutubeSpeechAdapter};
pub use unified::UnifiedAdapter;
