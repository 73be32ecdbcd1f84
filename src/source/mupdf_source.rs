//! MuPDF-backed document source

use std::path::PathBuf;

use log::debug;
use mupdf::{Colorspace, Document, Matrix};

use super::{
    DocumentId, DocumentSource, PageInfo, PageSource, RasterSurface, RenderParams, SourceError,
};

/// Resolves document identifiers against a library directory and opens
/// them with MuPDF.
pub struct MupdfSource {
    library_dir: PathBuf,
}

impl MupdfSource {
    #[must_use]
    pub fn new(library_dir: PathBuf) -> Self {
        Self { library_dir }
    }
}

impl DocumentSource for MupdfSource {
    fn open(&self, id: &DocumentId) -> Result<Box<dyn PageSource>, SourceError> {
        let path = self.library_dir.join(id.as_str());
        if !path.exists() {
            return Err(SourceError::NotFound(id.to_string()));
        }

        let doc = Document::open(path.to_string_lossy().as_ref())
            .map_err(|e| SourceError::Decode(e.to_string()))?;
        let page_count = doc
            .page_count()
            .map_err(|e| SourceError::Decode(e.to_string()))? as u32;

        debug!("opened {id} with {page_count} pages");

        Ok(Box::new(MupdfPages { doc, page_count }))
    }
}

struct MupdfPages {
    doc: Document,
    page_count: u32,
}

impl MupdfPages {
    fn load_page(&self, number: u32) -> Result<mupdf::Page, SourceError> {
        if number < 1 || number > self.page_count {
            return Err(SourceError::Page {
                page: number,
                detail: "page out of range".to_string(),
            });
        }
        self.doc
            .load_page(number as i32 - 1)
            .map_err(|e| SourceError::Page {
                page: number,
                detail: e.to_string(),
            })
    }
}

impl PageSource for MupdfPages {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn page(&self, number: u32) -> Result<PageInfo, SourceError> {
        let page = self.load_page(number)?;
        let bounds = page.bounds().map_err(|e| SourceError::Page {
            page: number,
            detail: e.to_string(),
        })?;
        Ok(PageInfo {
            number,
            width: bounds.x1 - bounds.x0,
            height: bounds.y1 - bounds.y0,
        })
    }

    fn render(&mut self, number: u32, params: &RenderParams) -> Result<RasterSurface, SourceError> {
        let info = self.page(number)?;
        let page = self.load_page(number)?;

        // Raster at scale x density; the density factor only raises the
        // backing resolution, display size stays at scale.
        let mag = params.scale * params.density_factor;
        let transform = Matrix::new_scale(mag, mag);
        let rgb = Colorspace::device_rgb();
        let pixmap =
            page.to_pixmap(&transform, &rgb, false, false)
                .map_err(|e| SourceError::Render {
                    page: number,
                    detail: e.to_string(),
                })?;

        let pixels = pixmap_to_rgb(&pixmap).map_err(|detail| SourceError::Render {
            page: number,
            detail,
        })?;

        Ok(RasterSurface {
            page: number,
            pixels,
            width_px: pixmap.width(),
            height_px: pixmap.height(),
            display_width: info.width * params.scale,
            display_height: info.height * params.scale,
            scale: params.scale,
        })
    }
}

fn pixmap_to_rgb(pixmap: &mupdf::Pixmap) -> Result<Vec<u8>, String> {
    let n = pixmap.n() as usize;
    if n < 3 {
        return Err(format!("unsupported pixmap format: {n} channels"));
    }

    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let stride = pixmap.stride() as usize;
    let samples = pixmap.samples();
    let row_bytes = width * n;
    if samples.len() < stride.saturating_mul(height) || row_bytes > stride {
        return Err("pixmap buffer size mismatch".to_string());
    }

    let mut out = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        let row = &samples[y * stride..y * stride + row_bytes];
        if n == 3 {
            out.extend_from_slice(row);
        } else {
            for px in row.chunks_exact(n) {
                out.extend_from_slice(&px[..3]);
            }
        }
    }
    Ok(out)
}
