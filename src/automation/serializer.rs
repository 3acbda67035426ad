use super::types::{Node, Snapshot, Window, WindowInfo};

/// Placeholder for missing or empty fields
pub const EMPTY_FIELD: &str = "-";

/// Appended to free-text fields cut at the configured length
pub const TRUNCATION_MARKER: &str = "...";

pub const HEADER: &str = "id\tclass\ttext\tdesc\tres_id\tbounds\tflags";

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Maximum characters kept from `text` and `desc` before the marker
    pub max_text_len: usize,
    /// Render every node, structural containers included
    pub include_detail: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_text_len: 100,
            include_detail: false,
        }
    }
}

/// Text rendering of a snapshot plus the number of data rows it contains
#[derive(Debug, Clone)]
pub struct RenderedSnapshot {
    pub text: String,
    pub row_count: usize,
}

/// Format a snapshot for LLM consumption.
///
/// Line-oriented, tab-separated; downstream agents parse columns positionally.
/// Example output:
/// ```text
/// note: one row per element, tab-separated columns, '-' marks an empty field
/// note: text and desc are single-line, cut at 100 characters ("..." marks a cut)
/// note: flags: on|off visibility, clk clickable, lclk long-clickable, foc focusable, scr scrollable, edt editable, ena enabled
/// window: id=1 type=application package=com.example title=- activity=- layer=0 focused=yes
/// screen: width=1080 height=2400 density=2.625 orientation=portrait
/// id	class	text	desc	res_id	bounds	flags
/// node_41742879	Button	OK	-	-	50,800,250,1000	on,clk,ena
/// ```
pub fn render(snapshot: &Snapshot, options: &RenderOptions) -> RenderedSnapshot {
    let mut lines = Vec::new();

    lines.push(
        "note: one row per element, tab-separated columns, '-' marks an empty field".to_string(),
    );
    lines.push(format!(
        "note: text and desc are single-line, cut at {} characters (\"{}\" marks a cut)",
        options.max_text_len, TRUNCATION_MARKER
    ));
    lines.push(
        "note: flags: on|off visibility, clk clickable, lclk long-clickable, foc focusable, \
         scr scrollable, edt editable, ena enabled"
            .to_string(),
    );
    if !options.include_detail {
        lines.push("note: layout containers without text, id or actions are omitted".to_string());
    }

    for window in &snapshot.windows {
        lines.push(format_window(&window.info, options.max_text_len));
    }
    if snapshot.windows.is_empty() {
        lines.push("window: (no windows available)".to_string());
    }

    let screen = &snapshot.screen;
    lines.push(format!(
        "screen: width={} height={} density={} orientation={}",
        screen.width,
        screen.height,
        screen.density,
        screen.orientation.as_str()
    ));

    lines.push(HEADER.to_string());

    let mut row_count = 0;
    for window in &snapshot.windows {
        row_count += push_rows(window, options, &mut lines);
    }

    RenderedSnapshot {
        text: lines.join("\n"),
        row_count,
    }
}

fn push_rows(window: &Window, options: &RenderOptions, lines: &mut Vec<String>) -> usize {
    let mut count = 0;
    let mut stack = vec![window.tree.as_ref()];
    while let Some(node) = stack.pop() {
        stack.extend(node.children.iter().rev().map(|c| c.as_ref()));
        if options.include_detail || node.is_meaningful() {
            lines.push(format_row(node, options.max_text_len));
            count += 1;
        }
    }
    count
}

/// Window metadata line
pub fn format_window(info: &WindowInfo, max_text_len: usize) -> String {
    format!(
        "window: id={} type={} package={} title={} activity={} layer={} focused={}",
        info.window_id,
        info.window_type.as_str(),
        plain_field(info.package_name.as_deref()),
        text_field(info.title.as_deref(), max_text_len),
        plain_field(info.activity_name.as_deref()),
        info.layer,
        if info.focused { "yes" } else { "no" }
    )
}

/// One tab-separated data row
pub fn format_row(node: &Node, max_text_len: usize) -> String {
    [
        node.id.clone(),
        plain_field(node.simple_class_name()),
        text_field(node.text.as_deref(), max_text_len),
        text_field(node.content_description.as_deref(), max_text_len),
        plain_field(node.resource_id.as_deref()),
        node.bounds.to_compact(),
        format_flags(node),
    ]
    .join("\t")
}

/// `on|off` followed by the capability tokens that are set
pub fn format_flags(node: &Node) -> String {
    let flags = &node.flags;
    let mut tokens = vec![if flags.visible { "on" } else { "off" }];

    for (set, token) in [
        (flags.clickable, "clk"),
        (flags.long_clickable, "lclk"),
        (flags.focusable, "foc"),
        (flags.scrollable, "scr"),
        (flags.editable, "edt"),
        (flags.enabled, "ena"),
    ] {
        if set {
            tokens.push(token);
        }
    }

    tokens.join(",")
}

/// Single-line, trimmed, truncated free text
pub fn text_field(value: Option<&str>, max_len: usize) -> String {
    let cleaned = single_line(value.unwrap_or(""));
    if cleaned.is_empty() {
        return EMPTY_FIELD.to_string();
    }
    truncate_str(&cleaned, max_len)
}

fn plain_field(value: Option<&str>) -> String {
    let cleaned = single_line(value.unwrap_or(""));
    if cleaned.is_empty() {
        EMPTY_FIELD.to_string()
    } else {
        cleaned
    }
}

fn single_line(value: &str) -> String {
    value
        .replace(['\t', '\n', '\r'], " ")
        .trim()
        .to_string()
}

/// Truncate to `max_len` characters, adding the marker if anything was cut
fn truncate_str(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        None => s.to_string(),
        Some((byte_index, _)) => format!("{}{}", &s[..byte_index], TRUNCATION_MARKER),
    }
}
