//! Scriptable document source for tests

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::source::{
    DocumentId, DocumentSource, LoadProgress, PageInfo, PageSource, RasterSurface, RenderParams,
    SourceError,
};

/// One recorded render call
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderCall {
    pub page: u32,
    pub scale: f32,
    pub density: f32,
}

/// A fake document source with a fixed page count and scripted failures
#[derive(Clone)]
pub struct FakeSource {
    page_count: u32,
    page_size: (f32, f32),
    fail_render: HashSet<u32>,
    fail_open: Option<&'static str>,
    missing: bool,
    renders: Arc<Mutex<Vec<RenderCall>>>,
}

impl FakeSource {
    /// A source whose documents have `page_count` US-letter pages
    #[must_use]
    pub fn with_pages(page_count: u32) -> Self {
        Self {
            page_count,
            page_size: (612.0, 792.0),
            fail_render: HashSet::new(),
            fail_open: None,
            missing: false,
            renders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Use a custom intrinsic page size
    #[must_use]
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_size = (width, height);
        self
    }

    /// Make renders of the given page fail
    #[must_use]
    pub fn failing_render(mut self, page: u32) -> Self {
        self.fail_render.insert(page);
        self
    }

    /// Make every open fail with a decode error
    #[must_use]
    pub fn failing_open(mut self, detail: &'static str) -> Self {
        self.fail_open = Some(detail);
        self
    }

    /// Make every open fail with not-found
    #[must_use]
    pub fn missing(mut self) -> Self {
        self.missing = true;
        self
    }

    /// All render calls made against documents from this source
    #[must_use]
    pub fn renders(&self) -> Vec<RenderCall> {
        self.renders.lock().unwrap().clone()
    }
}

impl DocumentSource for FakeSource {
    fn open(&self, id: &DocumentId) -> Result<Box<dyn PageSource>, SourceError> {
        if self.missing {
            return Err(SourceError::NotFound(id.to_string()));
        }
        if let Some(detail) = self.fail_open {
            return Err(SourceError::Decode(detail.to_string()));
        }
        Ok(Box::new(FakePages {
            page_count: self.page_count,
            page_size: self.page_size,
            fail_render: self.fail_render.clone(),
            renders: Arc::clone(&self.renders),
        }))
    }

    fn open_with_progress(
        &self,
        id: &DocumentId,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<Box<dyn PageSource>, SourceError> {
        progress(LoadProgress {
            loaded: 0,
            total: Some(100),
        });
        let doc = self.open(id)?;
        progress(LoadProgress {
            loaded: 100,
            total: Some(100),
        });
        Ok(doc)
    }
}

struct FakePages {
    page_count: u32,
    page_size: (f32, f32),
    fail_render: HashSet<u32>,
    renders: Arc<Mutex<Vec<RenderCall>>>,
}

impl PageSource for FakePages {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn page(&self, number: u32) -> Result<PageInfo, SourceError> {
        if number < 1 || number > self.page_count {
            return Err(SourceError::Page {
                page: number,
                detail: "page out of range".to_string(),
            });
        }
        Ok(PageInfo {
            number,
            width: self.page_size.0,
            height: self.page_size.1,
        })
    }

    fn render(&mut self, number: u32, params: &RenderParams) -> Result<RasterSurface, SourceError> {
        self.renders.lock().unwrap().push(RenderCall {
            page: number,
            scale: params.scale,
            density: params.density_factor,
        });

        if self.fail_render.contains(&number) {
            return Err(SourceError::Render {
                page: number,
                detail: "scripted failure".to_string(),
            });
        }

        let info = self.page(number)?;
        Ok(RasterSurface::sized_for(&info, params))
    }
}
