//! HTML reporter: serializes a report's blocks into one self-contained document
//!
//! Markup for each block is produced here and only here. The stylesheet and
//! the two small scripts (theme toggle, section collapse) are static strings.

use crate::builder::{
    Block, NavItem, ReportBuilder, SectionBlock, SectionEnd, TableBlock, TextLine, VersionBadge,
};
use crate::image::Figure;

/// Replaced once, at serialization, with the accumulated banner items
const NAV_PLACEHOLDER: &str = "<!--testlog:nav-items-->";

/// Escape text for element content and double-quoted attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reduce a free-form category name to a safe CSS class token
fn css_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

/// Reporter that renders a [`ReportBuilder`] as HTML
pub struct HtmlReporter;

impl HtmlReporter {
    pub fn new() -> Self {
        Self
    }

    /// Render the complete document
    pub fn render(&self, report: &ReportBuilder) -> String {
        let options = report.options();
        let mut html = String::with_capacity(16_384 + report.blocks().len() * 256);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\" data-theme=\"");
        html.push_str(options.default_theme.as_str());
        html.push_str("\">\n<head>\n<meta charset=\"UTF-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>");
        html.push_str(&escape_html(&options.title));
        html.push_str("</title>\n");
        html.push_str(Self::template_style());
        html.push_str(Self::template_script());
        html.push_str("</head>\n<body>\n");
        html.push_str(&Self::render_banner(
            &options.title,
            report.version_badge(),
            options.sticky_header,
        ));
        html.push_str("<div class=\"container\">\n");

        let mut unclosed = None;
        for block in report.blocks().iter() {
            match block {
                Block::SectionStart(s) => {
                    unclosed = Some(SectionEnd {
                        collapsible: s.collapsible,
                    })
                }
                Block::SectionEnd(_) => unclosed = None,
                _ => {}
            }
            html.push_str(&self.render_block(block));
        }
        // A section left open still gets its wrappers closed in the output;
        // the builder itself is not changed
        if let Some(end) = unclosed {
            log::debug!("closing markup of a section still open at render");
            html.push_str(&Self::render_section_end(&end));
        }

        html.push_str("</div>\n");
        if options.timestamp {
            html.push_str("<footer class=\"report-footer\">Generated ");
            html.push_str(&report.generated_at().format("%B %d, %Y %I:%M %p").to_string());
            html.push_str("</footer>\n");
        }
        html.push_str("</body>\n</html>\n");

        html.replacen(NAV_PLACEHOLDER, &Self::render_nav_items(report.nav_items()), 1)
    }

    /// Markup for a single block
    pub fn render_block(&self, block: &Block) -> String {
        match block {
            Block::Header(items) => Self::render_header(items),
            Block::SectionStart(section) => Self::render_section_start(section),
            Block::SectionEnd(end) => Self::render_section_end(end),
            Block::Line(line) => Self::render_line(line),
            Block::LineBreak => "<div class=\"line-break\"></div>\n".to_string(),
            Block::Table(table) => Self::render_table(table),
            Block::Figure(figure) => Self::render_figure(figure),
            Block::Html(fragment) => {
                let mut s = fragment.clone();
                if !s.ends_with('\n') {
                    s.push('\n');
                }
                s
            }
        }
    }

    fn render_banner(title: &str, badge: Option<&VersionBadge>, sticky: bool) -> String {
        let mut html = String::new();
        html.push_str("<div class=\"banner");
        if sticky {
            html.push_str(" sticky");
        }
        html.push('"');
        if let Some(b) = badge {
            html.push_str(&format!(
                " style=\"background:linear-gradient(135deg,hsl({},55%,32%) 0%,hsl({},55%,42%) 100%)\"",
                b.hue,
                b.accent_hue()
            ));
        }
        html.push_str(">\n  <div class=\"banner-title\">\n    <h1>");
        html.push_str(&escape_html(title));
        html.push_str("</h1>\n");
        if let Some(b) = badge {
            html.push_str("    <span class=\"version-badge\">v");
            html.push_str(&escape_html(b.version.trim_start_matches(['v', 'V'])));
            html.push_str("</span>\n");
        }
        html.push_str("  </div>\n  <div class=\"nav-items\">");
        html.push_str(NAV_PLACEHOLDER);
        html.push_str("</div>\n");
        html.push_str(
            "  <button class=\"theme-toggle\" onclick=\"toggleTheme()\">🌙 Dark Mode</button>\n</div>\n",
        );
        html
    }

    fn render_nav_items(items: &[NavItem]) -> String {
        items
            .iter()
            .map(|item| {
                format!(
                    "<span class=\"nav-item\"><span class=\"nav-label\">{}:</span> {}</span>",
                    escape_html(&item.label),
                    escape_html(&item.value)
                )
            })
            .collect()
    }

    fn render_header(items: &[NavItem]) -> String {
        let mut html = String::from("<div class=\"header\">\n");
        for item in items {
            html.push_str(&format!(
                "  <div class=\"header-item\"><span class=\"header-label\">{}:</span> {}</div>\n",
                escape_html(&item.label),
                escape_html(&item.value)
            ));
        }
        html.push_str("</div>\n");
        html
    }

    fn render_section_start(s: &SectionBlock) -> String {
        let id = s.dom_id();
        let category = css_token(&s.category);
        let mut html = format!("<div class=\"section category-{category}\" id=\"{id}\">\n");

        if s.collapsible {
            let open = if s.collapsed { "" } else { " open" };
            html.push_str(&format!(
                "  <div class=\"section-header collapsible{open}\" onclick=\"toggleSection('{id}')\">\n    <span class=\"chevron\">▶</span>\n"
            ));
        } else {
            html.push_str("  <div class=\"section-header\">\n");
        }
        html.push_str(&format!(
            "    <div class=\"section-title category-{category}\">{}</div>\n",
            escape_html(&s.title)
        ));
        html.push_str(&format!(
            "    <span class=\"status-badge status-{}\">{}</span>\n  </div>\n",
            s.status.as_str(),
            s.status.label()
        ));

        let bar_state = if s.is_complete() { "complete" } else { "in-progress" };
        html.push_str(&format!(
            "  <div class=\"progress-bar {bar_state}\"><div class=\"progress-fill\" style=\"width: {}%\"></div></div>\n",
            s.progress
        ));

        if s.collapsible {
            let collapsed = if s.collapsed { " collapsed" } else { "" };
            html.push_str(&format!(
                "  <div class=\"section-content{collapsed}\" id=\"{id}-content\">\n"
            ));
        }
        html
    }

    fn render_section_end(end: &SectionEnd) -> String {
        if end.collapsible {
            "  </div>\n</div>\n".to_string()
        } else {
            "</div>\n".to_string()
        }
    }

    fn render_line(line: &TextLine) -> String {
        match line.status {
            Some(status) => format!(
                "<div class=\"line status-{}\">{}</div>\n",
                status.as_str(),
                escape_html(&line.text)
            ),
            None => format!("<div class=\"line\">{}</div>\n", escape_html(&line.text)),
        }
    }

    fn render_table(table: &TableBlock) -> String {
        let mut html = String::new();
        if let Some(title) = &table.title {
            html.push_str(&format!(
                "<div class=\"table-title\">{}</div>\n",
                escape_html(title)
            ));
        }
        match &table.category {
            Some(c) => html.push_str(&format!("<table class=\"category-{}\">\n", css_token(c))),
            None => html.push_str("<table>\n"),
        }
        html.push_str("  <thead>\n    <tr>");
        for header in &table.headers {
            html.push_str(&format!("<th>{}</th>", escape_html(header)));
        }
        html.push_str("</tr>\n  </thead>\n  <tbody>\n");
        for row in table.rows() {
            html.push_str("    <tr>");
            for (i, cell) in row.cells.iter().enumerate() {
                match row.evaluation.marker_for(i) {
                    Some(true) => {
                        html.push_str(&format!("<td class=\"cell-pass\">{} ✓</td>", escape_html(cell)))
                    }
                    Some(false) => {
                        html.push_str(&format!("<td class=\"cell-fail\">{} ✗</td>", escape_html(cell)))
                    }
                    None => html.push_str(&format!("<td>{}</td>", escape_html(cell))),
                }
            }
            html.push_str("</tr>\n");
        }
        html.push_str("  </tbody>\n</table>\n");
        html
    }

    fn render_figure(figure: &Figure) -> String {
        let mut html = String::from("<div class=\"figure\">\n");
        match &figure.dark {
            Some(dark) => {
                html.push_str(&format!(
                    "  <img class=\"plot-light\" src=\"{}\" alt=\"Plot\">\n",
                    figure.light.data_uri()
                ));
                html.push_str(&format!(
                    "  <img class=\"plot-dark\" src=\"{}\" alt=\"Plot\">\n",
                    dark.data_uri()
                ));
            }
            None => html.push_str(&format!(
                "  <img src=\"{}\" alt=\"Plot\">\n",
                figure.light.data_uri()
            )),
        }
        if let Some(title) = &figure.title {
            html.push_str(&format!(
                "  <div class=\"figure-title\">{}</div>\n",
                escape_html(title)
            ));
        }
        html.push_str("</div>\n");
        html
    }

    // ─── HTML template pieces ────────────────────────────────────────────

    fn template_style() -> &'static str {
        r##"<style>
:root{--bg:#ffffff;--text:#333333;--banner:#2c3e50;--banner2:#34495e;--banner-text:#ffffff;--header-bg:#ecf0f1;--section-bg:#f8f9fa;--border:#dee2e6;--th-bg:#e9ecef;--muted:#7f8c8d;--blue:#3498db;--green:#27ae60;--red:#e74c3c;--orange:#f39c12;--purple:#8e44ad;--gray:#7f8c8d;--radius:8px}
[data-theme="dark"]{--bg:#1e1e1e;--text:#e0e0e0;--banner:#1a1a1a;--banner2:#2b2b2b;--header-bg:#2d2d2d;--section-bg:#252525;--border:#404040;--th-bg:#333333;--muted:#9a9a9a}
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:'Segoe UI',Tahoma,Geneva,Verdana,sans-serif;background:var(--bg);color:var(--text);line-height:1.6;transition:background-color .3s,color .3s}

/* ── Banner ── */
.banner{background:linear-gradient(135deg,var(--banner) 0%,var(--banner2) 100%);color:var(--banner-text);padding:16px 30px;display:flex;align-items:center;gap:24px;flex-wrap:wrap;box-shadow:0 2px 4px rgba(0,0,0,.1)}
.banner.sticky{position:sticky;top:0;z-index:100}
.banner-title{display:flex;align-items:center;gap:10px}
.banner h1{font-size:22px;font-weight:600}
.version-badge{font-size:12px;font-weight:600;padding:2px 8px;border-radius:10px;background:rgba(255,255,255,.2)}
.nav-items{display:flex;flex-wrap:wrap;gap:6px 18px;flex:1;font-size:13px}
.nav-label{opacity:.75}
.theme-toggle{background:rgba(255,255,255,.2);border:none;color:var(--banner-text);padding:8px 16px;border-radius:4px;cursor:pointer;font-size:14px;transition:background .3s}
.theme-toggle:hover{background:rgba(255,255,255,.3)}

/* ── Layout ── */
.container{max-width:1200px;margin:0 auto;padding:20px}
.header{background:var(--header-bg);padding:20px;border-radius:var(--radius);margin-bottom:20px;border-left:4px solid var(--blue)}
.header-item{margin:8px 0}
.header-label{font-weight:600;display:inline-block;min-width:150px}

/* ── Sections ── */
.section{background:var(--section-bg);padding:20px;margin-bottom:20px;border-radius:var(--radius);border:1px solid var(--border);border-left:4px solid var(--cat,var(--blue))}
.section-header{display:flex;align-items:center;gap:10px;margin-bottom:10px}
.section-header.collapsible{cursor:pointer;user-select:none}
.chevron{font-size:11px;color:var(--muted);transition:transform .2s;width:12px}
.section-header.open .chevron{transform:rotate(90deg)}
.section-title{font-size:20px;font-weight:600;flex:1;color:var(--cat,var(--text))}
.section-content.collapsed{display:none}
.status-badge{font-size:11px;font-weight:700;padding:3px 10px;border-radius:10px;color:#fff;letter-spacing:.5px}
.status-badge.status-running{background:var(--blue)}
.status-badge.status-pass{background:var(--green)}
.status-badge.status-fail{background:var(--red)}
.status-badge.status-warning{background:var(--orange)}
.status-badge.status-data{background:var(--purple)}
.status-badge.status-default{background:var(--gray)}
.progress-bar{height:4px;background:var(--border);border-radius:2px;overflow:hidden;margin-bottom:12px}
.progress-bar.complete{display:none}
.progress-fill{height:100%;background:var(--cat,var(--blue));transition:width .4s}
.progress-bar.in-progress .progress-fill{background-image:linear-gradient(45deg,rgba(255,255,255,.3) 25%,transparent 25%,transparent 50%,rgba(255,255,255,.3) 50%,rgba(255,255,255,.3) 75%,transparent 75%);background-size:16px 16px;animation:stripes 1s linear infinite}
@keyframes stripes{from{background-position:16px 0}to{background-position:0 0}}

/* ── Categories ── */
.category-running{--cat:var(--blue)}.category-pass{--cat:var(--green)}.category-fail{--cat:var(--red)}
.category-warning{--cat:var(--orange)}.category-data{--cat:var(--purple)}.category-default{--cat:var(--gray)}
.category-voltage{--cat:#3498db}.category-current{--cat:#e67e22}.category-connection{--cat:#9b59b6}
.category-temperature{--cat:#e74c3c}.category-power{--cat:#f39c12}.category-resistance{--cat:#16a085}
.category-frequency{--cat:#8e44ad}.category-digital{--cat:#2c3e50}.category-custom{--cat:#34495e}

/* ── Text ── */
.line{margin:8px 0}
.line-break{height:1px;background:var(--border);margin:15px 0}
.line.status-pass{color:var(--green);font-weight:600}
.line.status-fail{color:var(--red);font-weight:600}
.line.status-warning{color:var(--orange);font-weight:600}

/* ── Tables ── */
.table-title{font-weight:600;margin:15px 0 5px 0}
table{width:100%;border-collapse:collapse;margin:10px 0 15px 0;background:var(--bg)}
th{background:var(--th-bg);padding:10px 12px;text-align:left;font-weight:600;border:1px solid var(--border)}
table[class*="category-"] th{background:var(--cat);color:#fff}
td{padding:8px 12px;border:1px solid var(--border)}
tr:nth-child(even){background:var(--section-bg)}
.cell-pass{background:#d4edda!important;color:#155724;font-weight:600}
.cell-fail{background:#f8d7da!important;color:#721c24;font-weight:600}
[data-theme="dark"] .cell-pass{background:#1e4620!important;color:#4caf50}
[data-theme="dark"] .cell-fail{background:#5a1a1a!important;color:#ef5350}

/* ── Figures ── */
.figure{margin:20px 0;text-align:center}
.figure img{max-width:100%;height:auto;border:1px solid var(--border);border-radius:4px}
.figure-title{font-weight:600;margin-top:10px;font-size:14px;color:var(--muted)}
.plot-dark{display:none}
[data-theme="dark"] .plot-light{display:none}
[data-theme="dark"] .plot-dark{display:inline}

.report-footer{text-align:center;font-size:12px;color:var(--muted);padding:10px 0 24px}
</style>
"##
    }

    fn template_script() -> &'static str {
        r##"<script>
function toggleTheme(){
  const root=document.documentElement;
  const next=root.getAttribute('data-theme')==='dark'?'light':'dark';
  root.setAttribute('data-theme',next);
  const button=document.querySelector('.theme-toggle');
  if(button) button.textContent=next==='dark'?'☀️ Light Mode':'🌙 Dark Mode';
}
function toggleSection(id){
  const content=document.getElementById(id+'-content');
  const header=document.querySelector('#'+id+' > .section-header');
  if(!content) return;
  content.classList.toggle('collapsed');
  if(header) header.classList.toggle('open');
}
</script>
"##
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}
