use serde::{Deserialize, Serialize};

/// A4 page heights at 96 DPI.
pub const PORTRAIT_PAGE_HEIGHT: f32 = 1123.0;
pub const LANDSCAPE_PAGE_HEIGHT: f32 = 794.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageFormat {
    #[default]
    PortraitA4,
    LandscapeA4,
    Continuous,
}

impl PageFormat {
    pub const ALL: [PageFormat; 3] = [
        PageFormat::PortraitA4,
        PageFormat::LandscapeA4,
        PageFormat::Continuous,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PageFormat::PortraitA4 => "Portrait A4",
            PageFormat::LandscapeA4 => "Landscape A4",
            PageFormat::Continuous => "Continuous",
        }
    }

    pub fn page_height(self) -> Option<f32> {
        match self {
            PageFormat::PortraitA4 => Some(PORTRAIT_PAGE_HEIGHT),
            PageFormat::LandscapeA4 => Some(LANDSCAPE_PAGE_HEIGHT),
            PageFormat::Continuous => None,
        }
    }

    /// Width of the page surface in the editor view.
    pub fn view_width(self) -> f32 {
        match self {
            PageFormat::LandscapeA4 => 1123.0,
            PageFormat::PortraitA4 | PageFormat::Continuous => 794.0,
        }
    }

    pub fn is_landscape(self) -> bool {
        self == PageFormat::LandscapeA4
    }

    /// Parses the settings/env spelling ("portrait-a4", "landscape-a4", "continuous").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait-a4" | "portrait" => Some(PageFormat::PortraitA4),
            "landscape-a4" | "landscape" => Some(PageFormat::LandscapeA4),
            "continuous" => Some(PageFormat::Continuous),
            _ => None,
        }
    }
}

/// Heuristic page count: rendered height over the page height, at least one.
pub fn estimate_pages(content_height: f32, format: PageFormat) -> usize {
    let Some(page_h) = format.page_height() else {
        return 1;
    };
    if !content_height.is_finite() || content_height <= 0.0 {
        return 1;
    }
    ((content_height / page_h).ceil() as usize).max(1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageCursor {
    pub current: usize,
    pub total: usize,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            current: 1,
            total: 1,
        }
    }
}

impl PageCursor {
    pub fn set_total(&mut self, total: usize) {
        self.total = total.max(1);
        self.current = self.current.clamp(1, self.total);
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1).max(1);
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1).min(self.total);
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }
}

/// Scale an image down so it fits the page; never scales up.
pub fn fit_image(width: u32, height: u32, format: PageFormat) -> (u32, u32) {
    let max_w = if format.is_landscape() { 800.0 } else { 600.0 };
    let max_h = if format == PageFormat::PortraitA4 { 800.0 } else { 500.0 };

    let mut w = width as f64;
    let mut h = height as f64;
    if w > max_w {
        h = h * max_w / w;
        w = max_w;
    }
    if h > max_h {
        w = w * max_h / h;
        h = max_h;
    }
    (w.round() as u32, h.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_estimate() {
        assert_eq!(estimate_pages(0.0, PageFormat::PortraitA4), 1);
        assert_eq!(estimate_pages(1123.0, PageFormat::PortraitA4), 1);
        assert_eq!(estimate_pages(1124.0, PageFormat::PortraitA4), 2);
        assert_eq!(estimate_pages(1600.0, PageFormat::LandscapeA4), 3);
        assert_eq!(estimate_pages(99_999.0, PageFormat::Continuous), 1);
        assert_eq!(estimate_pages(f32::NAN, PageFormat::PortraitA4), 1);
    }

    #[test]
    fn cursor_clamps() {
        let mut c = PageCursor::default();
        c.previous();
        assert_eq!(c.current, 1);
        c.set_total(3);
        c.next();
        c.next();
        c.next();
        assert_eq!(c.current, 3);
        assert!(!c.has_next());
        c.set_total(2);
        assert_eq!(c.current, 2);
        c.set_total(0);
        assert_eq!((c.current, c.total), (1, 1));
    }

    #[test]
    fn fit_keeps_small_images() {
        assert_eq!(fit_image(320, 240, PageFormat::PortraitA4), (320, 240));
    }

    #[test]
    fn fit_width_then_height() {
        // 1200x900 -> width 600 -> 600x450
        assert_eq!(fit_image(1200, 900, PageFormat::PortraitA4), (600, 450));
        // landscape: width 800 -> 800x600 -> height 500 -> 667x500
        assert_eq!(fit_image(1600, 1200, PageFormat::LandscapeA4), (667, 500));
        // tall portrait image
        assert_eq!(fit_image(400, 1600, PageFormat::PortraitA4), (200, 800));
    }

    #[test]
    fn parse_formats() {
        assert_eq!(PageFormat::parse("landscape-a4"), Some(PageFormat::LandscapeA4));
        assert_eq!(PageFormat::parse(" Continuous "), Some(PageFormat::Continuous));
        assert_eq!(PageFormat::parse("letter"), None);
    }
}
