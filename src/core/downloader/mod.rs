mod client;

pub use client::{ArtifactFetcher, Downloader};
