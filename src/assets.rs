//! Art discovery and loading: scan an art directory for frames and animations.
//!
//! Layout of an art directory:
//! - `name.json`: one frame, column-major `[[[r, g, b], ...], ...]`
//! - `name.png` / `name.jpg`: one frame, pixel `(x, y)` becomes column `x`, row `y`
//! - `name/`: an animation, its frame files played in filename order
//!
//! An animation may also be a single JSON file holding a list of frames.
//! Everything is validated here, so malformed pixels never reach the grid.

use crate::art::{Animation, Frame};
use crate::{LampError, Pixel, Result};
use image::{ImageReader, RgbImage};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: [&str; 4] = ["json", "png", "jpg", "jpeg"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtKind {
    Frame,
    Animation,
}

/// One discovered piece of art.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtEntry {
    /// File stem or directory name (e.g. "valorant")
    pub name: String,
    pub path: PathBuf,
    pub kind: ArtKind,
    /// 1 for frames, number of frame files for animations
    pub frame_count: usize,
}

fn is_frame_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Sorted frame files directly inside `dir`.
pub fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if is_frame_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Scan `art_dir` for frames and animation directories, sorted by name.
///
/// A missing directory yields an empty list; directories without any frame
/// files are skipped.
pub fn list_art(art_dir: &Path) -> Vec<ArtEntry> {
    let mut entries = Vec::new();

    let read_dir = match fs::read_dir(art_dir) {
        Ok(rd) => rd,
        Err(_) => return entries,
    };

    for entry in read_dir.flatten() {
        let path = entry.path();
        let name = path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();

        if is_frame_file(&path) {
            entries.push(ArtEntry {
                name,
                path,
                kind: ArtKind::Frame,
                frame_count: 1,
            });
        } else if path.is_dir() {
            let frame_count = frame_paths(&path).map(|p| p.len()).unwrap_or(0);
            if frame_count > 0 {
                entries.push(ArtEntry {
                    name: path
                        .file_name()
                        .unwrap_or_default()
                        .to_string_lossy()
                        .into_owned(),
                    path,
                    kind: ArtKind::Animation,
                    frame_count,
                });
            }
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// Find art by name inside `art_dir`.
///
/// `name` may be a path relative to `art_dir` or a bare name, in which case
/// `name.json`, `name.png`, `name.jpg`, `name.jpeg` and the directory `name`
/// are tried in that order.
pub fn find_art(art_dir: &Path, name: &str) -> Result<PathBuf> {
    let direct = art_dir.join(name);
    if direct.is_file() {
        return Ok(direct);
    }
    FRAME_EXTENSIONS
        .iter()
        .map(|ext| art_dir.join(format!("{name}.{ext}")))
        .find(|p| p.is_file())
        .or_else(|| direct.is_dir().then(|| direct.clone()))
        .ok_or(LampError::NoArt(direct))
}

/// Convert a decoded image to a frame, column by column.
pub fn frame_from_image(img: &RgbImage) -> Frame {
    let mut columns = vec![Vec::with_capacity(img.height() as usize); img.width() as usize];
    for (x, _y, pixel) in img.enumerate_pixels() {
        columns[x as usize].push(Pixel::new(pixel[0], pixel[1], pixel[2]));
    }
    Frame::new(columns)
}

/// Load a single frame from a JSON or image file.
pub fn load_frame(path: &Path) -> Result<Frame> {
    if !path.is_file() {
        return Err(LampError::NoArt(path.to_path_buf()));
    }
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    } else {
        let img = ImageReader::open(path)?.decode()?.to_rgb8();
        Ok(frame_from_image(&img))
    }
}

/// Load an animation from a directory of frame files or a JSON list of frames.
pub fn load_animation(path: &Path) -> Result<Animation> {
    if path.is_dir() {
        let frames = frame_paths(path)?
            .iter()
            .map(|p| load_frame(p))
            .collect::<Result<Vec<_>>>()?;
        return Animation::new(frames);
    }
    if !path.is_file() {
        return Err(LampError::NoArt(path.to_path_buf()));
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
