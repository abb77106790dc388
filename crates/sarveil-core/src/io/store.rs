use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::info;

use crate::error::Result;
use crate::io::image_io::save_rgba_png;
use crate::render::FrameArtifact;
use crate::sequence::SequenceArtifact;

/// File name of the standalone basemap image.
pub const BASEMAP_FILE: &str = "base_image.png";

/// Destination for everything a run produces.
pub trait ArtifactStore {
    fn put_basemap(&mut self, poi: &str, image: &RgbaImage) -> Result<()>;
    fn put_frame(&mut self, poi: &str, frame: &FrameArtifact) -> Result<()>;
    fn put_sequence(&mut self, poi: &str, sequence: &SequenceArtifact) -> Result<()>;
}

/// Replace path separators and control characters so a POI name is a single path component.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

/// Writes `<root>/<poi>/<id>.png`, `<root>/<poi>/base_image.png` and `<root>/<poi>/gif/<poi>.gif`.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn poi_dir(&self, poi: &str) -> PathBuf {
        self.root.join(sanitize_name(poi))
    }

    pub fn frame_path(&self, poi: &str, frame: &FrameArtifact) -> PathBuf {
        self.poi_dir(poi).join(frame.file_name())
    }

    pub fn basemap_path(&self, poi: &str) -> PathBuf {
        self.poi_dir(poi).join(BASEMAP_FILE)
    }

    pub fn sequence_path(&self, poi: &str) -> PathBuf {
        let name = sanitize_name(poi);
        self.poi_dir(poi).join("gif").join(format!("{name}.gif"))
    }
}

impl ArtifactStore for DirectoryStore {
    fn put_basemap(&mut self, poi: &str, image: &RgbaImage) -> Result<()> {
        fs::create_dir_all(self.poi_dir(poi))?;
        let path = self.basemap_path(poi);
        save_rgba_png(image, &path)?;
        info!(path = %path.display(), "Wrote basemap image");
        Ok(())
    }

    fn put_frame(&mut self, poi: &str, frame: &FrameArtifact) -> Result<()> {
        fs::create_dir_all(self.poi_dir(poi))?;
        save_rgba_png(&frame.pixels, &self.frame_path(poi, frame))
    }

    fn put_sequence(&mut self, poi: &str, sequence: &SequenceArtifact) -> Result<()> {
        let path = self.sequence_path(poi);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(&path)?);
        sequence.encode_gif(writer)?;
        info!(path = %path.display(), frames = sequence.len(), "Wrote animation");
        Ok(())
    }
}

/// Keeps artifacts in memory; useful for embedding and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub basemap: Option<RgbaImage>,
    /// (output identifier, pixels) in the order they were stored.
    pub frames: Vec<(String, RgbaImage)>,
    pub sequence: Option<Vec<u8>>,
}

impl ArtifactStore for MemoryStore {
    fn put_basemap(&mut self, _poi: &str, image: &RgbaImage) -> Result<()> {
        self.basemap = Some(image.clone());
        Ok(())
    }

    fn put_frame(&mut self, _poi: &str, frame: &FrameArtifact) -> Result<()> {
        self.frames
            .push((frame.output_identifier.clone(), frame.pixels.clone()));
        Ok(())
    }

    fn put_sequence(&mut self, _poi: &str, sequence: &SequenceArtifact) -> Result<()> {
        self.sequence = Some(sequence.to_gif_bytes()?);
        Ok(())
    }
}
