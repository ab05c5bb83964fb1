/// Image file I/O
///
/// This module handles:
/// - Decoding source files into grayscale buffers (loader.rs)
/// - Writing results under their original names (persister.rs)
/// - Rendering previews and the shared preview file (preview.rs)
/// - Finding images in a folder (discover.rs)

pub mod discover;
pub mod loader;
pub mod persister;
pub mod preview;
