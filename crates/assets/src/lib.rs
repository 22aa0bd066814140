//! Environment cube map assets.
//!
//! The scene uses one cube map as both background and reflection source.
//! It is either decoded from six face images on disk or generated as a
//! vertical gradient. Faces are always ordered `px, nx, py, ny, pz, nz`,
//! the layer order GPU cube textures expect.
//!
//! There is no retry or partial fallback here: a missing or malformed face
//! is an error for the caller to report.

use scrollscape_common::Rgba;
use std::path::{Path, PathBuf};

/// Face suffixes in cube layer order.
pub const CUBE_FACES: [&str; 6] = ["px", "nx", "py", "ny", "pz", "nz"];

/// Errors from environment map loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("face {path} is {width}x{height}, cube faces must be square")]
    NotSquare {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    #[error("face {path} is {actual}px wide, expected {expected}px like the first face")]
    SizeMismatch {
        path: PathBuf,
        expected: u32,
        actual: u32,
    },
}

/// Build the six face locations as `base + face + format`, e.g.
/// `cube_face_urls("https://host/pisa/", ".png")`.
pub fn cube_face_urls(base: &str, format: &str) -> [String; 6] {
    CUBE_FACES.map(|face| format!("{base}{face}{format}"))
}

/// Filesystem counterpart of [`cube_face_urls`].
pub fn cube_face_paths(dir: impl AsRef<Path>, format: &str) -> [PathBuf; 6] {
    let dir = dir.as_ref();
    CUBE_FACES.map(|face| dir.join(format!("{face}{format}")))
}

/// Six square RGBA8 faces of equal size.
#[derive(Debug, Clone)]
pub struct EnvironmentMap {
    pub face_size: u32,
    pub faces: [Vec<u8>; 6],
}

impl EnvironmentMap {
    /// Decode `px.png`, `nx.png`, ... (for `format = ".png"`) from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>, format: &str) -> Result<Self, AssetError> {
        let paths = cube_face_paths(dir, format);
        let mut face_size = None;
        let mut faces: [Vec<u8>; 6] = Default::default();

        for (slot, path) in faces.iter_mut().zip(paths.iter()) {
            let img = image::open(path)
                .map_err(|source| match source {
                    image::ImageError::IoError(e) => AssetError::Io(e),
                    source => AssetError::Decode {
                        path: path.clone(),
                        source,
                    },
                })?
                .to_rgba8();
            let (width, height) = img.dimensions();
            if width != height {
                return Err(AssetError::NotSquare {
                    path: path.clone(),
                    width,
                    height,
                });
            }
            match face_size {
                None => face_size = Some(width),
                Some(expected) if expected != width => {
                    return Err(AssetError::SizeMismatch {
                        path: path.clone(),
                        expected,
                        actual: width,
                    });
                }
                Some(_) => {}
            }
            *slot = img.into_raw();
        }

        let face_size = face_size.unwrap_or(0);
        tracing::debug!(face_size, "environment map loaded");
        Ok(Self { face_size, faces })
    }

    /// Vertical gradient from `ground` (straight down) to `sky` (straight up).
    pub fn procedural(face_size: u32, sky: Rgba, ground: Rgba) -> Self {
        let size = face_size.max(1);
        let faces = std::array::from_fn(|face| {
            let mut texels = Vec::with_capacity((size * size * 4) as usize);
            for y in 0..size {
                for x in 0..size {
                    let s = 2.0 * (x as f32 + 0.5) / size as f32 - 1.0;
                    let t = 2.0 * (y as f32 + 0.5) / size as f32 - 1.0;
                    let dir = face_direction(face, s, t);
                    let len = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
                    let k = (dir[1] / len) * 0.5 + 0.5;
                    let mix = |c: usize| {
                        let v = ground.0[c] + (sky.0[c] - ground.0[c]) * k;
                        (v.clamp(0.0, 1.0) * 255.0).round() as u8
                    };
                    texels.extend_from_slice(&[mix(0), mix(1), mix(2), 255]);
                }
            }
            texels
        });
        Self {
            face_size: size,
            faces,
        }
    }

    /// RGBA texel of a face at pixel `(x, y)`.
    pub fn texel(&self, face: usize, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.face_size + x) * 4) as usize;
        let f = &self.faces[face];
        [f[i], f[i + 1], f[i + 2], f[i + 3]]
    }
}

impl Default for EnvironmentMap {
    fn default() -> Self {
        Self::procedural(64, Rgba::rgb(0.78, 0.86, 0.95), Rgba::rgb(0.18, 0.2, 0.24))
    }
}

/// Unnormalized direction through face coordinates `(s, t)` in `[-1, 1]`,
/// `t` growing downwards, following the usual cube map face orientation.
fn face_direction(face: usize, s: f32, t: f32) -> [f32; 3] {
    match face {
        0 => [1.0, -t, -s],
        1 => [-1.0, -t, s],
        2 => [s, 1.0, t],
        3 => [s, -1.0, -t],
        4 => [s, -t, 1.0],
        _ => [-s, -t, -1.0],
    }
}

pub fn crate_info() -> &'static str {
    "scrollscape-assets v0.1.0"
}
