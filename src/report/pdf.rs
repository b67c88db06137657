//! PDF report rendering.
//!
//! Draws a [`ReportLayout`] with `genpdf`. The layout is reduced to
//! Latin-1 before drawing. Fonts come from the configured directory, then
//! from common system locations, then from the DejaVu Sans faces compiled
//! into the binary, so rendering never depends on the host.

use super::layout::{report_filename, ReportLayout, DEFAULT_TRUNCATE_CHARS};
use crate::models::ResultBundle;
use anyhow::{anyhow, Context, Result};
use genpdf::elements::{Break, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Style, StyledString};
use genpdf::{Alignment, Document, SimplePageDecorator};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Regular, bold, italic and bold-italic file names.
type VariantNames = [&'static str; 4];

const LIBERATION_SANS: VariantNames = [
    "LiberationSans-Regular.ttf",
    "LiberationSans-Bold.ttf",
    "LiberationSans-Italic.ttf",
    "LiberationSans-BoldItalic.ttf",
];

const DEJAVU_SANS: VariantNames = [
    "DejaVuSans.ttf",
    "DejaVuSans-Bold.ttf",
    "DejaVuSans-Oblique.ttf",
    "DejaVuSans-BoldOblique.ttf",
];

const ARIAL: VariantNames = [
    "Arial.ttf",
    "Arial Bold.ttf",
    "Arial Italic.ttf",
    "Arial Bold Italic.ttf",
];

/// System font families tried after the configured one.
const SYSTEM_FONTS: &[(&str, VariantNames)] = &[
    ("/usr/share/fonts/truetype/liberation", LIBERATION_SANS),
    ("/usr/share/fonts/liberation-sans", LIBERATION_SANS),
    ("/usr/share/fonts/truetype/dejavu", DEJAVU_SANS),
    ("/usr/share/fonts/dejavu-sans-fonts", DEJAVU_SANS),
    ("/Library/Fonts", ARIAL),
];

static BUNDLED_REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static BUNDLED_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Options for [`render`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Characters kept from science and clinical text.
    pub truncate_chars: usize,
    /// Directory holding `{family}-Regular.ttf` and its bold/italic variants.
    pub font_dir: PathBuf,
    /// Font family name used for metrics.
    pub font_family: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            truncate_chars: DEFAULT_TRUNCATE_CHARS,
            font_dir: PathBuf::from("/usr/share/fonts/truetype/liberation"),
            font_family: "LiberationSans".to_string(),
        }
    }
}

/// A rendered document and its suggested file name.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Render the bundle into a PDF document.
///
/// Nothing is written to disk; the caller decides where the bytes go.
pub fn render(
    drug: &str,
    disease: &str,
    bundle: &ResultBundle,
    options: &RenderOptions,
) -> Result<RenderedReport> {
    let layout = ReportLayout::build(drug, disease, bundle, options.truncate_chars).to_latin1();
    let bytes = write_pdf(&layout, load_fonts(options)?)?;
    info!("Rendered PDF report ({} bytes)", bytes.len());

    Ok(RenderedReport {
        bytes,
        filename: report_filename(drug, disease, "pdf"),
    })
}

/// Where the four variants of one font family live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FontFiles {
    dir: PathBuf,
    regular: String,
    bold: String,
    italic: String,
    bold_italic: String,
}

impl FontFiles {
    /// genpdf naming: `{family}-Regular.ttf`, `-Bold`, `-Italic`, `-BoldItalic`.
    fn conventional(dir: impl Into<PathBuf>, family: &str) -> Self {
        Self {
            dir: dir.into(),
            regular: format!("{}-Regular.ttf", family),
            bold: format!("{}-Bold.ttf", family),
            italic: format!("{}-Italic.ttf", family),
            bold_italic: format!("{}-BoldItalic.ttf", family),
        }
    }

    fn explicit(dir: impl Into<PathBuf>, names: VariantNames) -> Self {
        let [regular, bold, italic, bold_italic] = names;
        Self {
            dir: dir.into(),
            regular: regular.to_string(),
            bold: bold.to_string(),
            italic: italic.to_string(),
            bold_italic: bold_italic.to_string(),
        }
    }

    fn load(&self) -> Result<FontFamily<FontData>> {
        Ok(FontFamily {
            regular: load_font(&self.dir.join(&self.regular))?,
            bold: load_font(&self.dir.join(&self.bold))?,
            italic: load_font(&self.dir.join(&self.italic))?,
            bold_italic: load_font(&self.dir.join(&self.bold_italic))?,
        })
    }
}

fn load_font(path: &Path) -> Result<FontData> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read font file {}", path.display()))?;
    font_data(data, &path.display().to_string())
}

fn font_data(data: Vec<u8>, label: &str) -> Result<FontData> {
    FontData::new(data, None).map_err(|e| anyhow!("Invalid font {}: {}", label, e))
}

/// DejaVu Sans compiled into the binary. Italics reuse the upright faces.
fn bundled_fonts() -> Result<FontFamily<FontData>> {
    let regular = font_data(BUNDLED_REGULAR.to_vec(), "DejaVuSans (bundled)")?;
    let bold = font_data(BUNDLED_BOLD.to_vec(), "DejaVuSans-Bold (bundled)")?;

    Ok(FontFamily {
        italic: regular.clone(),
        bold_italic: bold.clone(),
        regular,
        bold,
    })
}

fn font_candidates(options: &RenderOptions) -> Vec<FontFiles> {
    std::iter::once(FontFiles::conventional(
        options.font_dir.clone(),
        &options.font_family,
    ))
    .chain(
        SYSTEM_FONTS
            .iter()
            .map(|(dir, names)| FontFiles::explicit(*dir, *names)),
    )
    .collect()
}

/// Load the first usable font family, falling back to the bundled one.
fn load_fonts(options: &RenderOptions) -> Result<FontFamily<FontData>> {
    for files in font_candidates(options) {
        match files.load() {
            Ok(family) => {
                debug!("Using font {} from {}", files.regular, files.dir.display());
                return Ok(family);
            }
            Err(e) => debug!("Font family not usable: {:#}", e),
        }
    }

    debug!("No system font found, using bundled DejaVu Sans");
    bundled_fonts()
}

fn write_pdf(layout: &ReportLayout, fonts: FontFamily<FontData>) -> Result<Vec<u8>> {
    let mut doc = Document::new(fonts);
    doc.set_title(layout.title.clone());
    doc.set_font_size(10);

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(15);
    doc.set_page_decorator(decorator);

    let title_style = Style::new().bold().with_font_size(16);
    let heading_style = Style::new().bold().with_font_size(12);
    let body_style = Style::new().with_font_size(10);

    doc.push(
        Paragraph::new(StyledString::new(layout.title.clone(), title_style))
            .aligned(Alignment::Center),
    );
    doc.push(Break::new(1));

    for section in &layout.sections {
        doc.push(Paragraph::new(StyledString::new(
            section.title.clone(),
            heading_style,
        )));
        doc.push(Break::new(0.3));

        for line in section.body.lines() {
            if line.trim().is_empty() {
                doc.push(Break::new(0.5));
            } else {
                doc.push(Paragraph::new(StyledString::new(line.to_string(), body_style)));
            }
        }
        doc.push(Break::new(1));
    }

    let mut bytes = Vec::new();
    doc.render(&mut bytes)
        .map_err(|e| anyhow!("Failed to render PDF: {}", e))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::workers::check_patent;
    use crate::models::{MarketRecord, SummarySource};
    use crate::providers::query_trade;

    fn bundle() -> ResultBundle {
        ResultBundle {
            summary: "STRATEGIC VERDICT: HIGH POTENTIAL.\n\nRecommended pathway: 505(b)(2)."
                .to_string(),
            market: MarketRecord {
                source: "IQVIA Analytics (Mock)".to_string(),
                market_size_global: "$3 Billion".to_string(),
                cagr_5yr: "4.05%".to_string(),
                top_competitor: "BigPharma Inc.".to_string(),
                market_saturation: "Medium-High".to_string(),
            },
            trade: query_trade("Metformin"),
            science: "Metformin \u{2192} AMPK activation \u{2713} ".repeat(40),
            clinical: "NCT01234567".to_string(),
            patent: check_patent("Metformin"),
            summary_source: SummarySource::Fallback,
        }
    }

    fn missing_fonts() -> RenderOptions {
        RenderOptions {
            font_dir: PathBuf::from("/nonexistent/fonts"),
            font_family: "NoSuchFont".to_string(),
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_render_options_default() {
        let options = RenderOptions::default();
        assert_eq!(options.truncate_chars, 500);
        assert_eq!(options.font_family, "LiberationSans");
    }

    #[test]
    fn test_render_produces_pdf() {
        let report = render(
            "Metformin",
            "Neurological Disorders",
            &bundle(),
            &RenderOptions::default(),
        )
        .unwrap();

        assert!(report.bytes.starts_with(b"%PDF"));
        assert_eq!(report.filename, "Metformin_Neurological Disorders_Report.pdf");
    }

    #[test]
    fn test_render_with_unknown_font_dir() {
        let report = render("Sildenafil", "ALS", &bundle(), &missing_fonts()).unwrap();
        assert!(report.bytes.starts_with(b"%PDF"));
        assert_eq!(report.filename, "Sildenafil_ALS_Report.pdf");
    }

    #[test]
    fn test_bundled_fonts_render() {
        let layout = ReportLayout::build("Metformin", "ALS", &bundle(), 500).to_latin1();
        let bytes = write_pdf(&layout, bundled_fonts().unwrap()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_font_file_names() {
        let files = FontFiles::conventional("/fonts", "LiberationSans");
        assert_eq!(files.regular, "LiberationSans-Regular.ttf");
        assert_eq!(files.bold_italic, "LiberationSans-BoldItalic.ttf");

        let dejavu = FontFiles::explicit("/fonts", DEJAVU_SANS);
        assert_eq!(dejavu.italic, "DejaVuSans-Oblique.ttf");
        assert_eq!(dejavu.bold_italic, "DejaVuSans-BoldOblique.ttf");

        let candidates = font_candidates(&missing_fonts());
        assert_eq!(candidates.len(), SYSTEM_FONTS.len() + 1);
        assert_eq!(candidates[0].regular, "NoSuchFont-Regular.ttf");
    }

    #[test]
    fn test_dejavu_layout_loads() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("DejaVuSans.ttf"), BUNDLED_REGULAR).unwrap();
        std::fs::write(dir.path().join("DejaVuSans-Oblique.ttf"), BUNDLED_REGULAR).unwrap();
        std::fs::write(dir.path().join("DejaVuSans-Bold.ttf"), BUNDLED_BOLD).unwrap();
        std::fs::write(dir.path().join("DejaVuSans-BoldOblique.ttf"), BUNDLED_BOLD).unwrap();

        let files = FontFiles::explicit(dir.path(), DEJAVU_SANS);
        assert!(files.load().is_ok());
        assert!(FontFiles::conventional(dir.path(), "DejaVuSans").load().is_err());
    }

    #[test]
    fn test_corrupt_font_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let files = FontFiles::conventional(dir.path(), "Broken");
        for name in [&files.regular, &files.bold, &files.italic, &files.bold_italic] {
            std::fs::write(dir.path().join(name), b"not a font").unwrap();
        }

        assert!(files.load().is_err());
    }
}
