use std::fs::File;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{ImageReader, RgbImage};
use memmap2::Mmap;
use tracing::{debug, info, warn};

use crate::config::SourceConfig;
use crate::consts::OUTPUT_BYTES_PER_PIXEL;
use crate::error::{Result, ViewerError};
use crate::geometry::PixelRect;

use super::pnm::{probe_raw_layout, RawLayout};

/// An opened raster image that can hand out native-resolution regions.
///
/// Small and compressed images are decoded through `image` on demand.
/// Huge images stored as raw rows are memory-mapped and read one band at a
/// time, so the full bitmap is never materialized.
pub struct RasterSource {
    path: PathBuf,
    width: u32,
    height: u32,
    band_height: u32,
    filter: FilterType,
    backing: Backing,
}

enum Backing {
    Decoded,
    Banded(BandReader),
}

/// Raw-row access into a memory-mapped file.
struct BandReader {
    mmap: Mmap,
    layout: RawLayout,
    cursor: BandCursor,
}

/// Which rows the reader is currently pointed at. Re-targeted before every
/// band read.
#[derive(Clone, Copy, Debug, Default)]
struct BandCursor {
    offset: usize,
    rows: u32,
}

impl RasterSource {
    /// Open an image without decoding its pixels.
    pub fn open(path: &Path, config: &SourceConfig) -> Result<Self> {
        let open_error = |reason: String| ViewerError::ImageOpen {
            path: path.to_path_buf(),
            reason,
        };

        let reader = ImageReader::open(path)
            .map_err(|e| open_error(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| open_error(e.to_string()))?;
        if reader.format().is_none() {
            return Err(open_error("unrecognized image format".into()));
        }
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| open_error(e.to_string()))?;
        if width == 0 || height == 0 {
            return Err(ViewerError::ImageTooSmall { width, height });
        }

        let huge_limit = config.huge_size as u64 * config.huge_size as u64;
        let oversized = width as u64 * height as u64 > huge_limit;

        let backing = if oversized {
            match map_raw(path).map_err(|e| open_error(e.to_string()))? {
                Some((mmap, layout)) => {
                    if mmap.len() < layout.data_offset + layout.data_len() {
                        return Err(open_error(format!(
                            "raw data truncated: expected {} bytes, got {}",
                            layout.data_offset + layout.data_len(),
                            mmap.len()
                        )));
                    }
                    info!(
                        path = %path.display(),
                        width,
                        height,
                        band_height = config.band_height,
                        "Opened huge source with banded decoding"
                    );
                    Backing::Banded(BandReader {
                        mmap,
                        layout,
                        cursor: BandCursor::default(),
                    })
                }
                None => {
                    warn!(
                        path = %path.display(),
                        width,
                        height,
                        "Huge image is not stored as raw rows; decoding it whole"
                    );
                    Backing::Decoded
                }
            }
        } else {
            Backing::Decoded
        };

        if matches!(backing, Backing::Decoded) {
            debug!(path = %path.display(), width, height, "Opened source");
        }

        Ok(Self {
            path: path.to_path_buf(),
            width,
            height,
            band_height: config.band_height.max(1),
            filter: config.filter.filter_type(),
            backing,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn native_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether this source is read band by band.
    pub fn is_huge(&self) -> bool {
        matches!(self.backing, Backing::Banded(_))
    }

    pub fn band_height(&self) -> u32 {
        self.band_height
    }

    /// Bytes per pixel of every bitmap this source returns.
    pub fn bytes_per_pixel(&self) -> usize {
        OUTPUT_BYTES_PER_PIXEL
    }

    /// Decode `rect` at native resolution, clipped to the image.
    pub fn decode_region(&mut self, rect: PixelRect) -> Result<RgbImage> {
        let clip = rect
            .clipped(self.width, self.height)
            .ok_or(ViewerError::InvalidRegion {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                image_width: self.width,
                image_height: self.height,
            })?;

        let band_height = self.band_height;
        match &mut self.backing {
            Backing::Decoded => {
                let full = decode_whole(&self.path)?;
                let whole = clip.x == 0
                    && clip.y == 0
                    && clip.width == self.width
                    && clip.height == self.height;
                if whole {
                    return Ok(full);
                }
                Ok(imageops::crop_imm(&full, clip.x, clip.y, clip.width, clip.height).to_image())
            }
            Backing::Banded(reader) => {
                let mut out = RgbImage::new(clip.width, clip.height);
                let bottom = clip.y + clip.height;
                let mut top = clip.y;
                while top < bottom {
                    let rows = band_height.min(bottom - top);
                    let band = reader.read_band(clip.x, top, clip.width, rows);
                    imageops::replace(&mut out, &band, 0, (top - clip.y) as i64);
                    top += rows;
                }
                Ok(out)
            }
        }
    }

    /// Decode one full-width band starting at row `top`. The band is at most
    /// `band_height` rows tall.
    pub fn decode_band(&mut self, top: u32) -> Result<RgbImage> {
        let rows = self.band_height.min(self.height.saturating_sub(top));
        let rect = PixelRect::new(0, top as i64, self.width as i64, rows as i64);
        if let Backing::Banded(reader) = &mut self.backing {
            if rows == 0 {
                return Err(ViewerError::InvalidRegion {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    image_width: self.width,
                    image_height: self.height,
                });
            }
            return Ok(reader.read_band(0, top, self.width, rows));
        }
        self.decode_region(rect)
    }

    /// Resize the whole image to `target_w x target_h`.
    ///
    /// Huge sources are processed band by band into a pre-allocated
    /// destination, so peak memory is one source band plus the result.
    /// `progress` is called with `(bands_done, total_bands)`.
    pub fn downsample(
        &mut self,
        target_w: u32,
        target_h: u32,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<RgbImage> {
        let target_w = target_w.max(1);
        let target_h = target_h.max(1);

        if !self.is_huge() {
            let full = self.decode_region(PixelRect::new(
                0,
                0,
                self.width as i64,
                self.height as i64,
            ))?;
            progress(1, 1);
            if full.dimensions() == (target_w, target_h) {
                return Ok(full);
            }
            return Ok(imageops::resize(&full, target_w, target_h, self.filter));
        }

        let mut dest = RgbImage::new(target_w, target_h);
        let k = target_h as f64 / self.height as f64;
        let total = self.height.div_ceil(self.band_height) as usize;

        let mut top = 0u32;
        let mut done = 0usize;
        while top < self.height {
            let band = self.decode_band(top)?;
            let rows = band.height();
            // One extra row so rounding never leaves a gap between bands.
            let band_h = (rows as f64 * k) as u32 + 1;
            let resized = imageops::resize(&band, target_w, band_h, self.filter);
            imageops::replace(&mut dest, &resized, 0, (top as f64 * k) as i64);
            top += rows;
            done += 1;
            progress(done, total);
        }

        debug!(
            source_w = self.width,
            source_h = self.height,
            target_w,
            target_h,
            bands = done,
            "Banded downsample complete"
        );
        Ok(dest)
    }
}

impl BandReader {
    /// Point the cursor at `rows` rows starting at `top` and copy columns
    /// `x..x + width` out as RGB.
    fn read_band(&mut self, x: u32, top: u32, width: u32, rows: u32) -> RgbImage {
        let stride = self.layout.row_stride();
        self.cursor = BandCursor {
            offset: self.layout.data_offset + top as usize * stride,
            rows,
        };

        let channels = self.layout.channels;
        let row_bytes = width as usize * channels;
        let mut out = RgbImage::new(width, rows);
        let out_stride = width as usize * OUTPUT_BYTES_PER_PIXEL;
        let dst = out.as_mut();

        for row in 0..self.cursor.rows as usize {
            let start = self.cursor.offset + row * stride + x as usize * channels;
            let src = &self.mmap[start..start + row_bytes];
            let dst_row = &mut dst[row * out_stride..(row + 1) * out_stride];
            if channels == OUTPUT_BYTES_PER_PIXEL {
                dst_row.copy_from_slice(src);
            } else {
                for (px, &v) in dst_row.chunks_exact_mut(OUTPUT_BYTES_PER_PIXEL).zip(src) {
                    px.fill(v);
                }
            }
        }
        out
    }
}

/// Memory-map `path` if it stores raw rows.
fn map_raw(path: &Path) -> std::io::Result<Option<(Mmap, RawLayout)>> {
    let file = File::open(path)?;
    // The map is read-only and lives as long as the source that owns it.
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(probe_raw_layout(&mmap).map(|layout| (mmap, layout)))
}

fn decode_whole(path: &Path) -> Result<RgbImage> {
    let mut reader = ImageReader::open(path)?.with_guessed_format()?;
    reader.no_limits();
    Ok(reader.decode()?.to_rgb8())
}

/// Aspect-preserving size whose longer side is `max_side`.
pub fn proxy_size(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let side = max_side as f64;
    let aspect = width as f64 / height as f64;
    let (w, h) = if width == height {
        (side, side)
    } else if width > height {
        (side, side / aspect)
    } else {
        (side * aspect, side)
    };
    ((w as u32).max(1), (h as u32).max(1))
}
