use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use tracing::debug;

use crate::error::{Result, SarveilError};
use crate::render::compose::blend_premultiplied;

/// Text for the strip above the map: acquisition date, POI name, platform/pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderText {
    pub left: String,
    pub center: String,
    pub right: Option<String>,
}

/// Draws header text through usvg/resvg using a shared font database.
#[derive(Clone)]
pub struct Annotator {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for Annotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Annotator")
            .field("faces", &self.face_count())
            .finish()
    }
}

impl Annotator {
    /// System fonts plus every `.ttf`/`.otf`/`.ttc` in `font_dirs`.
    pub fn new(font_dirs: &[PathBuf]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in font_dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        let annotator = Self {
            fontdb: Arc::new(db),
        };
        debug!(faces = annotator.face_count(), "Loaded annotation fonts");
        annotator
    }

    /// An annotator without fonts; text is skipped.
    pub fn empty() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    pub fn face_count(&self) -> usize {
        self.fontdb.faces().count()
    }

    /// Whether text can actually be drawn.
    pub fn can_draw(&self) -> bool {
        self.face_count() > 0
    }

    /// Draw `text` into the top `header_height` rows of `canvas`.
    ///
    /// Returns `false` without touching the canvas when there are no fonts, no header,
    /// or no glyph could be rasterized.
    pub fn draw_header(
        &self,
        canvas: &mut RgbaImage,
        text: &HeaderText,
        header_height: u32,
    ) -> Result<bool> {
        if header_height == 0 || !self.can_draw() {
            return Ok(false);
        }
        let width = canvas.width();
        let svg = header_svg(text, width, header_height);

        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_resolver: header_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| SarveilError::Render(format!("parse header svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, header_height).ok_or(
            SarveilError::InvalidDimensions {
                width: width as usize,
                height: header_height as usize,
            },
        )?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::default(),
            &mut pixmap.as_mut(),
        );

        if pixmap.pixels().iter().all(|p| p.alpha() == 0) {
            debug!(faces = self.face_count(), "Header text produced no glyphs");
            return Ok(false);
        }
        blend_premultiplied(canvas, pixmap.data(), width, header_height);
        Ok(true)
    }
}

/// Resolves generic families against whatever is loaded, falling back to any face.
fn header_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => Family::Serif,
                    usvg::FontFamily::SansSerif => Family::SansSerif,
                    usvg::FontFamily::Cursive => Family::Cursive,
                    usvg::FontFamily::Fantasy => Family::Fantasy,
                    usvg::FontFamily::Monospace => Family::Monospace,
                    usvg::FontFamily::Named(name) => Family::Name(name.as_str()),
                })
                .collect();
            families.extend([Family::SansSerif, Family::Serif, Family::Monospace]);

            let style = match font.style() {
                usvg::FontStyle::Normal => Style::Normal,
                usvg::FontStyle::Italic => Style::Italic,
                usvg::FontStyle::Oblique => Style::Oblique,
            };
            let query = Query {
                families: &families,
                weight: Weight(font.weight()),
                stretch: Stretch::Normal,
                style,
            };

            // fontdb maps the generic families to fixed names (Arial, Times New
            // Roman) that may not be installed.
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

fn header_svg(text: &HeaderText, width: u32, height: u32) -> String {
    let font_size = (height as f32 * 0.5).max(1.0);
    let baseline = height as f32 * 0.68;
    let margin = (width as f32 * 0.01).max(4.0);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><g font-family="sans-serif" font-size="{font_size}" fill="white">"#
    );
    svg.push_str(&format!(
        r#"<text x="{margin}" y="{baseline}" text-anchor="start">{}</text>"#,
        escape_xml(&text.left)
    ));
    svg.push_str(&format!(
        r#"<text x="{}" y="{baseline}" text-anchor="middle" font-weight="bold">{}</text>"#,
        width as f32 / 2.0,
        escape_xml(&text.center)
    ));
    if let Some(ref right) = text.right {
        svg.push_str(&format!(
            r#"<text x="{}" y="{baseline}" text-anchor="end">{}</text>"#,
            width as f32 - margin,
            escape_xml(right)
        ));
    }
    svg.push_str("</g></svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        debug!(dir = %dir.display(), "Font directory not readable");
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc") {
            let _ = db.load_font_file(&path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
    }

    #[test]
    fn header_svg_skips_missing_right() {
        let text = HeaderText {
            left: "2024-01-01".into(),
            center: "Port".into(),
            right: None,
        };
        let svg = header_svg(&text, 200, 40);
        assert_eq!(svg.matches("<text").count(), 2);
        assert!(svg.contains("Port"));
    }

    #[test]
    fn system_fonts_draw_header_glyphs() {
        let annotator = Annotator::new(&[]);
        if annotator.face_count() == 0 {
            return;
        }
        let mut canvas = RgbaImage::new(400, 40);
        let text = HeaderText {
            left: "2024-01-01".into(),
            center: "Port".into(),
            right: Some("S-1A / ASCENDING".into()),
        };
        let drawn = annotator.draw_header(&mut canvas, &text, 40).unwrap();
        assert!(drawn);
        assert!(canvas.pixels().any(|p| p.0[3] > 0));
    }

    #[test]
    fn blank_header_text_reports_nothing_drawn() {
        let annotator = Annotator::new(&[]);
        if annotator.face_count() == 0 {
            return;
        }
        let mut canvas = RgbaImage::new(100, 20);
        let drawn = annotator
            .draw_header(&mut canvas, &HeaderText::default(), 20)
            .unwrap();
        assert!(!drawn);
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn empty_annotator_leaves_canvas() {
        let mut canvas = RgbaImage::new(10, 10);
        let drawn = Annotator::empty()
            .draw_header(&mut canvas, &HeaderText::default(), 5)
            .unwrap();
        assert!(!drawn);
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }
}
