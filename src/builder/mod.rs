//! Incremental report builder
//!
//! The builder owns an ordered [`BlockSequence`]. Most calls append a block;
//! tables and sections stay addressable through the handle returned when they
//! were opened, so rows, status badges and progress bars can be updated
//! after later content has been added. Nothing is rendered until
//! [`ReportBuilder::to_html`].

mod banner;
mod block;
mod section;
mod summary;
mod table;

pub use banner::{version_hue, NavItem, VersionBadge, DEFAULT_BADGE_HUE};
pub use block::{Block, BlockId, BlockSequence, TextLine};
pub use section::{clamp_percent, SectionBlock, SectionEnd, SectionHandle};
pub use summary::{ReportSummary, SectionSummary, TableSummary};
pub use table::{TableBlock, TableHandle, TableRow, TableSpec};

use crate::display::ReportDisplay;
use crate::error::{ReportError, Result};
use crate::evaluate::Evaluation;
use crate::image::{EncodedImage, Figure, ImageFormat, PlotSource};
use crate::reporter::HtmlReporter;
use crate::{LineStatus, SectionStatus, Theme};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Document-level settings fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub title: String,
    /// Keep the banner pinned while scrolling
    pub sticky_header: bool,
    /// Version of the producing script, shown as a colored badge
    pub version: Option<String>,
    /// Sections get a clickable header that hides their body
    pub collapsible: bool,
    pub default_theme: Theme,
    /// Base directory for relative `save` paths
    pub output_dir: Option<PathBuf>,
    /// Format assumed for plots added without an explicit one
    pub image_format: ImageFormat,
    /// Print the generation time in the footer
    pub timestamp: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Test Report".to_string(),
            sticky_header: false,
            version: None,
            collapsible: false,
            default_theme: Theme::Light,
            output_dir: None,
            image_format: ImageFormat::Png,
            timestamp: true,
        }
    }
}

impl ReportOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Builds one HTML test report through sequential calls.
///
/// Not synchronized: a builder belongs to a single caller.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    options: ReportOptions,
    version_badge: Option<VersionBadge>,
    nav_items: Vec<NavItem>,
    blocks: BlockSequence,
    current_table: Option<TableHandle>,
    current_section: Option<SectionHandle>,
    next_section_seq: usize,
    generated_at: DateTime<Local>,
}

impl ReportBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_options(ReportOptions::titled(title))
    }

    pub fn with_options(options: ReportOptions) -> Self {
        let version_badge = options.version.as_deref().map(VersionBadge::new);
        Self {
            options,
            version_badge,
            nav_items: Vec::new(),
            blocks: BlockSequence::new(),
            current_table: None,
            current_section: None,
            next_section_seq: 1,
            generated_at: Local::now(),
        }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn version_badge(&self) -> Option<&VersionBadge> {
        self.version_badge.as_ref()
    }

    pub fn nav_items(&self) -> &[NavItem] {
        &self.nav_items
    }

    pub fn blocks(&self) -> &BlockSequence {
        &self.blocks
    }

    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }

    /// Override the footer timestamp, e.g. for reproducible output
    pub fn set_generated_at(&mut self, at: DateTime<Local>) -> &mut Self {
        self.generated_at = at;
        self
    }

    // ─── Banner and header ───────────────────────────────────────────────

    /// Append a banner item; banner items are rendered at serialization
    pub fn add_header_item(&mut self, label: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.nav_items.push(NavItem::new(label, value));
        self
    }

    /// Append an inline panel of label/value pairs at the current position
    pub fn add_header<I, L, V>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = (L, V)>,
        L: Into<String>,
        V: Into<String>,
    {
        let items = items
            .into_iter()
            .map(|(label, value)| NavItem::new(label, value))
            .collect();
        self.blocks.append(Block::Header(items));
        self
    }

    // ─── Sections ────────────────────────────────────────────────────────

    /// Open a section with a `running` badge and an empty progress bar.
    ///
    /// A section that is still open is closed first.
    pub fn open_section(&mut self, title: impl Into<String>, collapsed: bool) -> SectionHandle {
        if let Some(open) = self.current_section {
            log::warn!("opening a section while #{} is open; closing it", open.0);
            self.push_section_end();
        }
        let seq = self.next_section_seq;
        self.next_section_seq += 1;
        let section = SectionBlock::new(seq, title.into(), self.options.collapsible, collapsed);
        let handle = SectionHandle(self.blocks.append(Block::SectionStart(section)));
        self.current_section = Some(handle);
        handle
    }

    /// Open a section whose color marker starts as `category` instead of the
    /// status color
    pub fn open_section_with_category(
        &mut self,
        title: impl Into<String>,
        collapsed: bool,
        category: impl Into<String>,
    ) -> SectionHandle {
        let handle = self.open_section(title, collapsed);
        let category = category.into();
        if let Some(Block::SectionStart(s)) = self.blocks.get_mut(handle.0) {
            s.category = category;
        }
        handle
    }

    /// Close the open section, optionally completing it with a final status.
    ///
    /// `close_section(Some(status))` is the same as setting progress to 100,
    /// setting `status`, then `close_section(None)`.
    pub fn close_section(&mut self, status: Option<SectionStatus>) -> Result<&mut Self> {
        let handle = self.current_section.ok_or(ReportError::NoOpenSection)?;
        if let Some(status) = status {
            self.set_section_progress(handle, 100)?;
            self.set_section_status(handle, status)?;
        }
        self.push_section_end();
        Ok(self)
    }

    fn push_section_end(&mut self) {
        self.current_section = None;
        self.blocks.append(Block::SectionEnd(SectionEnd {
            collapsible: self.options.collapsible,
        }));
    }

    pub fn current_section(&self) -> Option<SectionHandle> {
        self.current_section
    }

    pub fn section(&self, handle: SectionHandle) -> Option<&SectionBlock> {
        match self.blocks.get(handle.0) {
            Some(Block::SectionStart(s)) => Some(s),
            _ => None,
        }
    }

    fn section_mut(&mut self, handle: SectionHandle) -> Result<&mut SectionBlock> {
        match self.blocks.get_mut(handle.0) {
            Some(Block::SectionStart(s)) => Ok(s),
            _ => Err(ReportError::MalformedBlockState {
                id: handle.0.index(),
                expected: "section",
            }),
        }
    }

    /// Replace the status badge and category marker of a section
    pub fn set_section_status(&mut self, handle: SectionHandle, status: SectionStatus) -> Result<()> {
        let section = self.section_mut(handle)?;
        log::debug!("section {:?}: status {} -> {}", section.title, section.status, status);
        section.set_status(status);
        Ok(())
    }

    /// Set a section's progress bar, clamped to 0..=100
    pub fn set_section_progress(&mut self, handle: SectionHandle, percent: i32) -> Result<()> {
        let section = self.section_mut(handle)?;
        section.set_progress(percent);
        log::debug!("section {:?}: progress {}%", section.title, section.progress);
        Ok(())
    }

    /// First section, in document order, whose title is exactly `title`
    pub fn find_section(&self, title: &str) -> Option<SectionHandle> {
        self.blocks.iter().enumerate().find_map(|(i, block)| match block {
            Block::SectionStart(s) if s.title == title => {
                Some(SectionHandle(BlockId::from_index(i)))
            }
            _ => None,
        })
    }

    /// Title-addressed status update; no matching section is a logged no-op.
    /// Returns whether a section was updated.
    pub fn set_section_status_by_title(&mut self, title: &str, status: SectionStatus) -> bool {
        match self.find_section(title) {
            Some(handle) => self.set_section_status(handle, status).is_ok(),
            None => {
                log::warn!("no section titled {title:?}; status {status} not applied");
                false
            }
        }
    }

    /// Title-addressed progress update; no matching section is a logged no-op.
    /// Returns whether a section was updated.
    pub fn set_section_progress_by_title(&mut self, title: &str, percent: i32) -> bool {
        match self.find_section(title) {
            Some(handle) => self.set_section_progress(handle, percent).is_ok(),
            None => {
                log::warn!("no section titled {title:?}; progress not applied");
                false
            }
        }
    }

    // ─── Tables ──────────────────────────────────────────────────────────

    /// Append a table and make it the target of [`append_row`](Self::append_row).
    ///
    /// Fails if the spec columns configure both bound methods or only half
    /// of one.
    pub fn open_table(&mut self, spec: TableSpec) -> Result<TableHandle> {
        let table = TableBlock::open(spec)?;
        let handle = TableHandle(self.blocks.append(Block::Table(table)));
        self.current_table = Some(handle);
        Ok(handle)
    }

    /// Append a row to the most recently opened table
    pub fn append_row<I, S>(&mut self, cells: I) -> Result<Evaluation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let handle = self.current_table.ok_or(ReportError::NoActiveTable)?;
        self.append_row_to(handle, cells)
    }

    /// Append a row to a specific table
    pub fn append_row_to<I, S>(&mut self, handle: TableHandle, cells: I) -> Result<Evaluation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = match self.blocks.get_mut(handle.0) {
            Some(Block::Table(t)) => t,
            _ => {
                return Err(ReportError::MalformedBlockState {
                    id: handle.0.index(),
                    expected: "table",
                })
            }
        };
        Ok(table.push_row(cells.into_iter().map(Into::into).collect()))
    }

    pub fn current_table(&self) -> Option<TableHandle> {
        self.current_table
    }

    pub fn table(&self, handle: TableHandle) -> Option<&TableBlock> {
        match self.blocks.get(handle.0) {
            Some(Block::Table(t)) => Some(t),
            _ => None,
        }
    }

    // ─── Content ─────────────────────────────────────────────────────────

    /// Append a line of text (escaped)
    pub fn add_line(&mut self, text: impl Into<String>) -> &mut Self {
        self.blocks.append(Block::Line(TextLine {
            text: text.into(),
            status: None,
        }));
        self
    }

    /// Append a line of text emphasised with a pass/fail/warning color
    pub fn add_status_line(&mut self, text: impl Into<String>, status: LineStatus) -> &mut Self {
        self.blocks.append(Block::Line(TextLine {
            text: text.into(),
            status: Some(status),
        }));
        self
    }

    pub fn add_line_break(&mut self) -> &mut Self {
        self.blocks.append(Block::LineBreak);
        self
    }

    /// Append trusted markup verbatim
    pub fn add_html(&mut self, fragment: impl Into<String>) -> &mut Self {
        self.blocks.append(Block::Html(fragment.into()));
        self
    }

    /// Embed raw image bytes
    pub fn add_plot(&mut self, bytes: &[u8], title: Option<&str>, format: ImageFormat) -> &mut Self {
        self.push_figure(EncodedImage::from_bytes(bytes, format), None, title)
    }

    /// Embed an image that is already base64-encoded
    pub fn add_encoded_plot(
        &mut self,
        base64: impl Into<String>,
        title: Option<&str>,
        format: ImageFormat,
    ) -> &mut Self {
        self.push_figure(EncodedImage::from_base64(base64, format), None, title)
    }

    /// Embed one image per theme; the visible one follows the theme toggle
    pub fn add_dual_plot(&mut self, light: &[u8], dark: &[u8], title: Option<&str>) -> &mut Self {
        let format = self.options.image_format;
        self.push_figure(
            EncodedImage::from_bytes(light, format),
            Some(EncodedImage::from_bytes(dark, format)),
            title,
        )
    }

    /// Render a plot for both themes. If the source is unavailable a warning
    /// line is added instead of the figure.
    pub fn add_plot_from(&mut self, source: &dyn PlotSource, title: Option<&str>) -> &mut Self {
        let rendered = source
            .render(Theme::Light)
            .and_then(|light| source.render(Theme::Dark).map(|dark| (light, dark)));
        match rendered {
            Ok((light, dark)) => {
                let format = source.format();
                self.push_figure(
                    EncodedImage::from_bytes(&light, format),
                    Some(EncodedImage::from_bytes(&dark, format)),
                    title,
                )
            }
            Err(missing) => {
                log::warn!("{missing}; plot skipped");
                self.add_status_line(
                    format!("⚠️ {missing} - cannot add plot"),
                    LineStatus::Warning,
                )
            }
        }
    }

    fn push_figure(
        &mut self,
        light: EncodedImage,
        dark: Option<EncodedImage>,
        title: Option<&str>,
    ) -> &mut Self {
        self.blocks.append(Block::Figure(Figure {
            light,
            dark,
            title: title.map(str::to_string),
        }));
        self
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// Render the full document without consuming the builder
    pub fn to_html(&self) -> String {
        HtmlReporter::new().render(self)
    }

    /// Render the full document; the builder is done after this
    pub fn finalize(self) -> String {
        self.to_html()
    }

    /// Write the document as UTF-8. Relative paths resolve against
    /// `output_dir` when one is configured. Returns the written path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.resolve_output_path(path.as_ref());
        fs::write(&path, self.to_html())?;
        log::info!("report saved to {}", path.display());
        Ok(path)
    }

    fn resolve_output_path(&self, path: &Path) -> PathBuf {
        match &self.options.output_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Show the report on an interactive display. Unavailability is logged
    /// and reported as `false`, never raised.
    pub fn display(&self, display: &mut dyn ReportDisplay) -> bool {
        match display.show_html(&self.to_html()) {
            Ok(()) => true,
            Err(missing) => {
                log::warn!("{missing}; cannot display report");
                false
            }
        }
    }

    /// Section statuses and table verdict counts
    pub fn summary(&self) -> ReportSummary {
        let mut sections = Vec::new();
        let mut tables = Vec::new();
        for block in self.blocks.iter() {
            match block {
                Block::SectionStart(s) => sections.push(SectionSummary {
                    title: s.title.clone(),
                    status: s.status,
                    progress: s.progress,
                }),
                Block::Table(t) => tables.push(TableSummary {
                    title: t.title.clone(),
                    rows: t.rows().len(),
                    evaluated: t.evaluated(),
                    passed: t.passed(),
                    failed: t.failed(),
                }),
                _ => {}
            }
        }
        ReportSummary {
            title: self.options.title.clone(),
            version: self.options.version.clone(),
            sections,
            tables,
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::with_options(ReportOptions::default())
    }
}
