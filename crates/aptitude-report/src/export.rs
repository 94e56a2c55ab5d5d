//! Paginated report export.
//!
//! Export runs in two awaited steps: capture the report view as an image,
//! then hand the image and its page placements to a document writer. Both
//! steps sit behind traits so another capture or document backend can be
//! swapped in. The defaults draw the view as an SVG card, rasterize it to
//! PNG with resvg, and write a print-ready HTML document that shows one
//! A4-sized slice of the raster per page.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use chrono::NaiveDate;

use aptitude_core::view::ReportView;

use crate::html_escape;
use crate::radar::radar_svg;

/// Fixed page geometry in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub margin_mm: f64,
}

impl PageLayout {
    /// A4 portrait with 10 mm margins.
    pub const A4: PageLayout = PageLayout {
        page_width_mm: 210.0,
        page_height_mm: 297.0,
        margin_mm: 10.0,
    };

    /// Width the image is scaled to.
    pub fn content_width_mm(&self) -> f64 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    /// Height of image shown on each page.
    pub fn content_height_mm(&self) -> f64 {
        self.page_height_mm - 2.0 * self.margin_mm
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::A4
    }
}

/// Which slice of the scaled image lands on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    /// 0-based page number.
    pub page: usize,
    /// Distance from the top of the scaled image to the top of this slice.
    pub offset_mm: f64,
    /// Height of this slice.
    pub height_mm: f64,
}

/// Split an image of `width_px` × `height_px` into page slices.
///
/// The image is scaled to the content width; each page shows at most one
/// content height of it. An image always yields at least one page.
pub fn paginate(layout: &PageLayout, width_px: u32, height_px: u32) -> Vec<PagePlacement> {
    if width_px == 0 || height_px == 0 {
        return vec![PagePlacement {
            page: 0,
            offset_mm: 0.0,
            height_mm: 0.0,
        }];
    }

    let image_height_mm =
        f64::from(height_px) * layout.content_width_mm() / f64::from(width_px);
    let slice = layout.content_height_mm();
    let pages = ((image_height_mm / slice).ceil() as usize).max(1);

    (0..pages)
        .map(|page| {
            let offset_mm = page as f64 * slice;
            PagePlacement {
                page,
                offset_mm,
                height_mm: (image_height_mm - offset_mm).min(slice),
            }
        })
        .collect()
}

/// A captured raster of the report view.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub width_px: u32,
    pub height_px: u32,
    /// PNG-encoded RGBA pixels.
    pub png: Vec<u8>,
}

/// Turns a report view into an image.
#[async_trait]
pub trait ViewCapture: Send + Sync {
    async fn capture(&self, view: &ReportView) -> Result<CapturedImage>;
}

/// Turns a captured image into a paginated document on disk.
#[async_trait]
pub trait DocumentWriter: Send + Sync {
    /// File extension of the documents this writer produces.
    fn extension(&self) -> &str;

    async fn write(
        &self,
        image: &CapturedImage,
        layout: &PageLayout,
        pages: &[PagePlacement],
        path: &Path,
    ) -> Result<()>;
}

/// `aptitude-report_{name}_{YYYYMMDD}.{ext}` with unsafe characters dropped.
pub fn export_file_name(display_name: &str, date: NaiveDate, extension: &str) -> String {
    let name: String = display_name
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    let name = name.trim();
    let name = if name.is_empty() { "report" } else { name };
    format!(
        "aptitude-report_{}_{}.{}",
        name.replace(' ', "-"),
        date.format("%Y%m%d"),
        extension
    )
}

/// Capture `view` and write it under `dir`. Returns the written path.
pub async fn export_report(
    view: &ReportView,
    capture: &dyn ViewCapture,
    writer: &dyn DocumentWriter,
    layout: &PageLayout,
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    let image = capture
        .capture(view)
        .await
        .context("failed to capture report view")?;
    let pages = paginate(layout, image.width_px, image.height_px);
    tracing::debug!(
        width = image.width_px,
        height = image.height_px,
        pages = pages.len(),
        "report captured"
    );

    let path = dir.join(export_file_name(
        &view.display_name,
        date,
        writer.extension(),
    ));
    writer
        .write(&image, layout, &pages, &path)
        .await
        .with_context(|| format!("failed to write report document {}", path.display()))?;

    tracing::info!(path = %path.display(), pages = pages.len(), "report exported");
    Ok(path)
}

/// Draws the report view as a tall SVG card and rasterizes it to PNG.
#[derive(Debug, Clone)]
pub struct PngCapture {
    /// Logical width of the card.
    pub width: u32,
    /// Pixel density multiplier.
    pub scale: u32,
}

impl Default for PngCapture {
    fn default() -> Self {
        Self {
            width: 600,
            scale: 2,
        }
    }
}

const LINE_HEIGHT: u32 = 22;
const PADDING: u32 = 32;
const RADAR_SIZE: u32 = 420;

/// Greedy word wrap to at most `max_chars` per line.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

impl PngCapture {
    /// Card markup plus its pixel size.
    fn render(&self, view: &ReportView) -> (u32, u32, String) {
        let width = self.width.max(RADAR_SIZE + 2 * PADDING);
        let max_chars = ((width - 2 * PADDING) / 9) as usize;
        let mut body = String::new();
        let mut y = PADDING + LINE_HEIGHT;

        let text = |body: &mut String, y: &mut u32, size: u32, weight: &str, content: &str| {
            body.push_str(&format!(
                "  <text x=\"{PADDING}\" y=\"{y}\" font-size=\"{size}\" font-weight=\"{weight}\">{}</text>\n",
                html_escape(content)
            ));
            *y += LINE_HEIGHT.max(size + 6);
        };

        text(&mut body, &mut y, 22, "bold", &format!("{}'s future potential", view.display_name));
        text(
            &mut body,
            &mut y,
            20,
            "bold",
            &format!("{} {}", view.primary.emoji, view.primary.name),
        );
        for line in wrap(&view.primary.description, max_chars) {
            text(&mut body, &mut y, 14, "normal", &line);
        }

        if !view.primary.careers.is_empty() {
            y += LINE_HEIGHT / 2;
            text(&mut body, &mut y, 16, "bold", "Possible careers");
            for line in wrap(&view.primary.careers.join(" · "), max_chars) {
                text(&mut body, &mut y, 14, "normal", &line);
            }
        }

        if !view.primary.suggestions.is_empty() {
            y += LINE_HEIGHT / 2;
            text(&mut body, &mut y, 16, "bold", "How to encourage it");
            for suggestion in &view.primary.suggestions {
                for (i, line) in wrap(suggestion, max_chars - 2).into_iter().enumerate() {
                    let prefix = if i == 0 { "• " } else { "  " };
                    text(&mut body, &mut y, 14, "normal", &format!("{prefix}{line}"));
                }
            }
        }

        if !view.secondary.is_empty() {
            y += LINE_HEIGHT / 2;
            text(&mut body, &mut y, 16, "bold", "Other potentials");
            for s in &view.secondary {
                text(
                    &mut body,
                    &mut y,
                    14,
                    "normal",
                    &format!("{} {} ({}%)", s.emoji, s.name, s.percentage),
                );
            }
        }

        let radar_x = (width - RADAR_SIZE) / 2;
        body.push_str(&format!("  <g transform=\"translate({radar_x},{y})\">\n"));
        body.push_str(&radar_svg(&view.radar, RADAR_SIZE));
        body.push_str("  </g>\n");
        y += RADAR_SIZE + PADDING;

        let height = y;
        let (width_px, height_px) = (width * self.scale, height * self.scale);
        let svg = format!(
            "<svg width=\"{width_px}\" height=\"{height_px}\" viewBox=\"0 0 {width} {height}\" xmlns=\"http://www.w3.org/2000/svg\" font-family=\"sans-serif\">\n  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n{body}</svg>\n",
        );
        (width_px, height_px, svg)
    }
}

/// Rasterize SVG markup into a `width` × `height` PNG.
fn rasterize(svg: &str, width: u32, height: u32) -> Result<Vec<u8>> {
    use png::{BitDepth, ColorType, Encoder};
    use resvg::tiny_skia::{Pixmap, Transform};
    use resvg::usvg::{Options, Tree};

    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = Tree::from_data(svg.as_bytes(), &options).context("failed to parse report SVG")?;
    let mut pixmap = Pixmap::new(width, height)
        .with_context(|| format!("failed to allocate a {width}x{height} raster"))?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

    let mut png = Vec::new();
    let mut encoder = Encoder::new(&mut png, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixmap.data())?;
    writer.finish()?;
    Ok(png)
}

#[async_trait]
impl ViewCapture for PngCapture {
    async fn capture(&self, view: &ReportView) -> Result<CapturedImage> {
        anyhow::ensure!(self.scale >= 1, "capture scale must be at least 1");
        let (width_px, height_px, svg) = self.render(view);
        let png = tokio::task::spawn_blocking(move || rasterize(&svg, width_px, height_px))
            .await
            .context("rasterizer task failed")??;
        Ok(CapturedImage {
            width_px,
            height_px,
            png,
        })
    }
}

/// Writes a print-ready HTML document, one A4 page per placement.
///
/// The raster is embedded once as a data URI; every page shows its slice
/// of it by offsetting the background.
#[derive(Debug, Clone, Default)]
pub struct HtmlPagesWriter;

impl HtmlPagesWriter {
    fn document(image: &CapturedImage, layout: &PageLayout, pages: &[PagePlacement]) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<title>Aptitude report</title>\n<style>\n");
        html.push_str(&format!(
            "@page {{ size: {w}mm {h}mm; margin: 0; }}\n\
             body {{ margin: 0; background: #e5e7eb; }}\n\
             .page {{ width: {w}mm; height: {h}mm; box-sizing: border-box; padding: {m}mm; margin: 0 auto 8mm; background: #fff; page-break-after: always; }}\n\
             .slice {{ width: {cw}mm; background-image: url(\"data:image/png;base64,{data}\"); background-repeat: no-repeat; background-size: {cw}mm auto; -webkit-print-color-adjust: exact; print-color-adjust: exact; }}\n\
             @media print {{ body {{ background: none; }} .page {{ margin: 0; }} }}\n",
            w = layout.page_width_mm,
            h = layout.page_height_mm,
            m = layout.margin_mm,
            cw = layout.content_width_mm(),
            data = base64::engine::general_purpose::STANDARD.encode(&image.png),
        ));
        html.push_str("</style>\n</head>\n<body>\n");

        for placement in pages {
            html.push_str(&format!(
                "<section class=\"page\" data-page=\"{}\">\n<div class=\"slice\" style=\"height: {:.2}mm; background-position: 0 -{:.2}mm\"></div>\n</section>\n",
                placement.page + 1,
                placement.height_mm,
                placement.offset_mm
            ));
        }

        html.push_str("</body>\n</html>");
        html
    }
}

#[async_trait]
impl DocumentWriter for HtmlPagesWriter {
    fn extension(&self) -> &str {
        "html"
    }

    async fn write(
        &self,
        image: &CapturedImage,
        layout: &PageLayout,
        pages: &[PagePlacement],
        path: &Path,
    ) -> Result<()> {
        let document = Self::document(image, layout, pages);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, document).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::report_view;

    #[test]
    fn a4_content_area() {
        let layout = PageLayout::A4;
        assert_eq!(layout.content_width_mm(), 190.0);
        assert_eq!(layout.content_height_mm(), 277.0);
    }

    #[test]
    fn short_image_fits_one_page() {
        // 1900 x 1000 px scales to 190 x 100 mm.
        let pages = paginate(&PageLayout::A4, 1900, 1000);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].offset_mm, 0.0);
        assert!((pages[0].height_mm - 100.0).abs() < 1e-9);
    }

    #[test]
    fn tall_image_spans_pages() {
        // 190 x 600 mm -> slices of 277, 277, 46.
        let pages = paginate(&PageLayout::A4, 190, 600);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].offset_mm, 277.0);
        assert_eq!(pages[2].offset_mm, 554.0);
        assert!((pages[2].height_mm - 46.0).abs() < 1e-9);
    }

    #[test]
    fn exact_fit_does_not_add_blank_page() {
        let pages = paginate(&PageLayout::A4, 190, 277);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn file_name_has_name_and_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(
            export_file_name("Mia Rose", date, "html"),
            "aptitude-report_Mia-Rose_20261017.html"
        );
        assert_eq!(
            export_file_name("../etc", date, "pdf"),
            "aptitude-report_..etc_20261017.pdf"
        );
        assert_eq!(
            export_file_name(" / ", date, "html"),
            "aptitude-report_report_20261017.html"
        );
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
        assert!(wrap("", 10).is_empty());
    }

    #[test]
    fn card_markup_carries_the_report() {
        let (width_px, height_px, svg) = PngCapture::default().render(&report_view("Mia"));
        assert_eq!(width_px, 1200);
        assert_eq!(height_px % 2, 0);
        assert!(svg.contains("Little Artist"));
        assert!(svg.contains("<svg class=\"radar\""));
    }

    #[tokio::test]
    async fn capture_produces_png_raster() {
        let image = PngCapture::default()
            .capture(&report_view("Mia"))
            .await
            .unwrap();
        assert_eq!(&image.png[..8], b"\x89PNG\r\n\x1a\n");

        let reader = png::Decoder::new(image.png.as_slice())
            .read_info()
            .unwrap();
        assert_eq!(reader.info().width, image.width_px);
        assert_eq!(reader.info().height, image.height_px);
    }

    #[test]
    fn pages_share_one_embedded_raster() {
        let image = CapturedImage {
            width_px: 190,
            height_px: 600,
            png: rasterize(
                "<svg width=\"190\" height=\"600\" xmlns=\"http://www.w3.org/2000/svg\"><rect width=\"190\" height=\"600\" fill=\"#fff\"/></svg>",
                190,
                600,
            )
            .unwrap(),
        };
        let pages = paginate(&PageLayout::A4, image.width_px, image.height_px);
        let html = HtmlPagesWriter::document(&image, &PageLayout::A4, &pages);

        assert_eq!(html.matches("data:image/png;base64,").count(), 1);
        assert_eq!(html.matches("class=\"page\"").count(), 3);
        assert!(html.contains("background-position: 0 -554.00mm"));
    }

    #[tokio::test]
    async fn export_writes_paginated_document() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();

        let path = export_report(
            &report_view("Mia"),
            &PngCapture::default(),
            &HtmlPagesWriter,
            &PageLayout::A4,
            dir.path(),
            date,
        )
        .await
        .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "aptitude-report_Mia_20260102.html"
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("@page { size: 210mm 297mm"));
        assert!(content.contains("data-page=\"1\""));
        assert!(content.contains("data:image/png;base64,iVBORw0KGgo"));
    }

    struct FailingCapture;

    #[async_trait]
    impl ViewCapture for FailingCapture {
        async fn capture(&self, _: &ReportView) -> Result<CapturedImage> {
            anyhow::bail!("canvas unavailable")
        }
    }

    #[tokio::test]
    async fn capture_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();

        let err = export_report(
            &report_view("Mia"),
            &FailingCapture,
            &HtmlPagesWriter,
            &PageLayout::A4,
            dir.path(),
            date,
        )
        .await
        .unwrap_err();

        assert!(format!("{err:#}").contains("canvas unavailable"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    struct FailingWriter;

    #[async_trait]
    impl DocumentWriter for FailingWriter {
        fn extension(&self) -> &str {
            "pdf"
        }

        async fn write(
            &self,
            _: &CapturedImage,
            _: &PageLayout,
            _: &[PagePlacement],
            _: &Path,
        ) -> Result<()> {
            anyhow::bail!("disk full")
        }
    }

    struct BlankCapture;

    #[async_trait]
    impl ViewCapture for BlankCapture {
        async fn capture(&self, _: &ReportView) -> Result<CapturedImage> {
            Ok(CapturedImage {
                width_px: 190,
                height_px: 277,
                png: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn writer_failure_surfaces_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();

        let err = export_report(
            &report_view("Mia"),
            &BlankCapture,
            &FailingWriter,
            &PageLayout::A4,
            dir.path(),
            date,
        )
        .await
        .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("failed to write report document"));
        assert!(message.contains("aptitude-report_Mia_20260102.pdf"));
        assert!(message.contains("disk full"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
