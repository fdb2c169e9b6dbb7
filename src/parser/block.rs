//! Block parsing for a single slide.
//!
//! The parser consumes the slide line by line and keeps an explicit stack of
//! open containers (blockquotes, lists, list items) instead of recursing, so
//! nesting depth is bounded by configuration rather than by the call stack.
//! Each line is handled in three steps:
//!
//! 1. Match the line against the open containers, stripping `>` markers and
//!    item indentation. Containers that do not continue are closed (unless
//!    the line is a lazy paragraph continuation).
//! 2. Open any new containers the remainder starts with.
//! 3. Classify what is left as a leaf: fenced code, ATX heading, table,
//!    thematic rule or paragraph text.
//!
//! Malformed constructs never abort the slide. They become
//! [`Block::Error`] nodes carrying the raw source and a 1-based line.

use super::inline::parse_inline;
use super::splitter::{is_rule_line, leading_spaces, parse_fence_open, Fence};
use super::ParseOptions;
use crate::model::{Alignment, Block, Inline, List, ListItem, Table, TableCell, TableRow};

/// Parse the text of one slide into blocks.
pub fn parse_blocks(text: &str, options: &ParseOptions) -> Vec<Block> {
    let mut parser = BlockParser::new(options);
    for (idx, line) in text.split('\n').enumerate() {
        let expanded = expand_tabs(line, options.tab_width);
        parser.process_line(&expanded, idx + 1);
    }
    parser.finish()
}

/// Follows fenced code through a document using the block parser's own
/// container rules, without building inline content.
///
/// The splitter consults it so a separator-shaped line is only treated as
/// code when [`parse_blocks`] would also put it inside a fence.
pub(crate) struct FenceScanner {
    parser: BlockParser,
    options: ParseOptions,
    line: usize,
}

impl FenceScanner {
    pub fn new(options: &ParseOptions) -> Self {
        Self {
            parser: BlockParser::scanner(options),
            options: options.clone(),
            line: 0,
        }
    }

    /// Check whether `line` would be body text of a fence opened earlier.
    pub fn inside_fence(&self, line: &str) -> bool {
        if !matches!(self.parser.leaf, Some(Leaf::Fence { .. })) {
            return false;
        }
        let expanded = expand_tabs(line, self.options.tab_width);
        let (rest, matched) = self.parser.match_containers(&expanded);
        match &self.parser.leaf {
            Some(Leaf::Fence { fence, .. }) => {
                matched == self.parser.stack.len() && !fence.is_closed_by(rest)
            }
            _ => false,
        }
    }

    pub fn feed(&mut self, line: &str) {
        self.line += 1;
        let expanded = expand_tabs(line, self.options.tab_width);
        self.parser.process_line(&expanded, self.line);
    }

    /// Start over for the next slide.
    pub fn reset(&mut self) {
        self.parser = BlockParser::scanner(&self.options);
        self.line = 0;
    }
}

/// Expand tabs to the next tab stop.
fn expand_tabs(line: &str, tab_width: usize) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let width = tab_width.max(1);
    let mut out = String::with_capacity(line.len() + width);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let spaces = width - column % width;
            out.extend(std::iter::repeat_n(' ', spaces));
            column += spaces;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

/// An open container.
#[derive(Debug)]
enum Frame {
    Root {
        blocks: Vec<Block>,
    },
    Quote {
        blocks: Vec<Block>,
    },
    List {
        list: List,
        marker: char,
        blank_pending: bool,
    },
    Item {
        blocks: Vec<Block>,
        content_indent: usize,
    },
}

/// The open leaf block, owned by the innermost frame.
#[derive(Debug)]
enum Leaf {
    Paragraph {
        lines: Vec<String>,
        start: usize,
    },
    Fence {
        fence: Fence,
        language: Option<String>,
        opening: String,
        lines: Vec<String>,
        start: usize,
    },
    Table(Table),
}

/// Why a leaf is being finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Close {
    /// Interrupted by another block or by its container closing
    Interrupted,
    /// End of the slide text
    EndOfSlide,
}

/// A list marker found at the start of a line.
#[derive(Debug, Clone, Copy)]
struct ListMarker {
    ordered: bool,
    /// `-`, `*`, `+` for bullets; `.` or `)` for ordered lists
    marker: char,
    start: u32,
    /// Bytes consumed up to the item content
    consumed: usize,
    /// Column of the item content relative to the line start
    content_indent: usize,
}

struct BlockParser {
    stack: Vec<Frame>,
    leaf: Option<Leaf>,
    max_depth: usize,
    /// Track structure only; inline content is left empty.
    scan_only: bool,
}

impl BlockParser {
    fn new(options: &ParseOptions) -> Self {
        Self {
            stack: vec![Frame::Root { blocks: Vec::new() }],
            leaf: None,
            max_depth: options.max_nesting_depth.max(1),
            scan_only: false,
        }
    }

    fn scanner(options: &ParseOptions) -> Self {
        Self {
            scan_only: true,
            ..Self::new(options)
        }
    }

    fn inline(&self, text: &str) -> Vec<Inline> {
        if self.scan_only {
            Vec::new()
        } else {
            parse_inline(text)
        }
    }

    fn row(&self, line: &str) -> TableRow {
        TableRow::new(
            split_row(line)
                .iter()
                .map(|c| TableCell::new(self.inline(c)))
                .collect(),
        )
    }

    /// Strip the markers of the open containers the line continues.
    ///
    /// Returns the remainder and how many stack frames (root included)
    /// the line matched.
    fn match_containers<'a>(&self, line: &'a str) -> (&'a str, usize) {
        let mut rest = line;
        let mut matched = 1;

        for frame in &self.stack[1..] {
            match frame {
                Frame::Quote { .. } => match strip_quote_marker(rest) {
                    Some(after) => rest = after,
                    None => break,
                },
                Frame::Root { .. } | Frame::List { .. } => {}
                Frame::Item { content_indent, .. } => {
                    if rest.trim().is_empty() {
                        rest = "";
                    } else if leading_spaces(rest) >= *content_indent {
                        rest = &rest[*content_indent..];
                    } else {
                        break;
                    }
                }
            }
            matched += 1;
        }
        (rest, matched)
    }

    fn process_line(&mut self, line: &str, number: usize) {
        let (rest, matched) = self.match_containers(line);
        let all_matched = matched == self.stack.len();

        if all_matched {
            if let Some(Leaf::Fence { fence, lines, .. }) = &mut self.leaf {
                if !fence.is_closed_by(rest) {
                    let strip = leading_spaces(rest).min(fence.indent);
                    lines.push(rest[strip..].to_string());
                    return;
                }
                self.close_leaf(Close::Interrupted);
                return;
            }
        } else if let Some(Leaf::Paragraph { lines, .. }) = &mut self.leaf {
            if !rest.trim().is_empty() && !starts_new_block(rest) {
                lines.push(rest.trim_start().to_string());
                return;
            }
        }

        while self.stack.len() > matched {
            self.close_frame();
        }

        let Some((rest, opened)) = self.open_containers(rest, line, number) else {
            self.settle_blank_lines();
            return;
        };

        if rest.trim().is_empty() {
            self.close_leaf(Close::Interrupted);
            if opened {
                // An empty list item is content, not a blank line.
                self.settle_blank_lines();
                return;
            }
            if self.leaf_frame_is_list() {
                self.close_frame();
            }
            for frame in &mut self.stack {
                if let Frame::List { blank_pending, .. } = frame {
                    *blank_pending = true;
                }
            }
            return;
        }

        if self.leaf_frame_is_list() {
            self.close_frame();
        }
        self.settle_blank_lines();
        self.add_leaf_line(rest, line, number);
    }

    /// Open blockquotes and list items the line starts with.
    ///
    /// Returns the remaining text and whether any container was opened, or
    /// `None` if the line was consumed by a nesting-depth error.
    fn open_containers<'a>(
        &mut self,
        mut rest: &'a str,
        line: &str,
        number: usize,
    ) -> Option<(&'a str, bool)> {
        let mut opened = false;
        loop {
            if let Some(after) = strip_quote_marker(rest) {
                self.close_leaf(Close::Interrupted);
                if self.leaf_frame_is_list() {
                    self.close_frame();
                }
                if !self.check_depth(line, number) {
                    return None;
                }
                self.stack.push(Frame::Quote { blocks: Vec::new() });
                rest = after;
                opened = true;
                continue;
            }

            if let Some(marker) = parse_list_marker(rest) {
                // A paragraph is only interrupted by a list that has content.
                let interrupts = !matches!(self.leaf, Some(Leaf::Paragraph { .. }))
                    || !rest[marker.consumed..].trim().is_empty();
                if interrupts {
                    self.close_leaf(Close::Interrupted);
                    self.open_item(marker, line, number)?;
                    rest = &rest[marker.consumed..];
                    opened = true;
                    continue;
                }
            }

            return Some((rest, opened));
        }
    }

    fn open_item(&mut self, marker: ListMarker, line: &str, number: usize) -> Option<()> {
        let compatible = matches!(
            self.stack.last(),
            Some(Frame::List { list, marker: m, .. }) if list.ordered == marker.ordered && *m == marker.marker
        );
        if !compatible && self.leaf_frame_is_list() {
            self.close_frame();
        }
        if !self.check_depth(line, number) {
            return None;
        }
        if !compatible {
            let list = if marker.ordered {
                List::numbered(marker.start)
            } else {
                List::bullet()
            };
            self.stack.push(Frame::List {
                list,
                marker: marker.marker,
                blank_pending: false,
            });
        }
        self.stack.push(Frame::Item {
            blocks: Vec::new(),
            content_indent: marker.content_indent,
        });
        Some(())
    }

    /// Emit an error instead of opening a container past the depth limit.
    fn check_depth(&mut self, line: &str, number: usize) -> bool {
        let depth = self
            .stack
            .iter()
            .filter(|f| matches!(f, Frame::Quote { .. } | Frame::Item { .. }))
            .count();
        if depth < self.max_depth {
            return true;
        }

        if !self.scan_only {
            log::warn!(
                "Nesting depth limit {} reached at slide line {}",
                self.max_depth,
                number
            );
        }
        if self.leaf_frame_is_list() {
            self.close_frame();
        }
        self.push_block(Block::error(
            line,
            format!("nesting depth exceeds limit of {}", self.max_depth),
            number,
        ));
        false
    }

    fn add_leaf_line(&mut self, rest: &str, line: &str, number: usize) {
        if matches!(self.leaf, Some(Leaf::Table(_))) {
            if has_unescaped_pipe(rest) && !starts_new_block(rest) {
                let row = self.row(rest);
                if let Some(Leaf::Table(table)) = &mut self.leaf {
                    table.add_row(row);
                }
                return;
            }
            self.close_leaf(Close::Interrupted);
        }

        if let Some((fence, info)) = parse_fence_open(rest) {
            self.close_leaf(Close::Interrupted);
            let language = info.split_whitespace().next().map(str::to_string);
            self.leaf = Some(Leaf::Fence {
                fence,
                language,
                opening: line.to_string(),
                lines: Vec::new(),
                start: number,
            });
            return;
        }

        if let Some((level, content)) = parse_atx_heading(rest) {
            self.close_leaf(Close::Interrupted);
            let content = self.inline(content);
            self.push_block(Block::Heading { level, content });
            return;
        }

        if self.try_table_header(rest, number) {
            return;
        }

        if is_rule_line(rest) {
            self.close_leaf(Close::Interrupted);
            self.push_block(Block::ThematicRule);
            return;
        }

        let text = rest.trim_start().to_string();
        match &mut self.leaf {
            Some(Leaf::Paragraph { lines, .. }) => lines.push(text),
            _ => {
                self.close_leaf(Close::Interrupted);
                self.leaf = Some(Leaf::Paragraph {
                    lines: vec![text],
                    start: number,
                });
            }
        }
    }

    /// Turn the last paragraph line into a table header if `rest` is a
    /// delimiter row. Returns true if the line was consumed.
    fn try_table_header(&mut self, rest: &str, number: usize) -> bool {
        let Some(Leaf::Paragraph { lines, start }) = &mut self.leaf else {
            return false;
        };
        let header_ok = lines.last().is_some_and(|l| has_unescaped_pipe(l));
        if !header_ok || !is_delimiter_shaped(rest) {
            return false;
        }

        let header_line = lines.pop().unwrap_or_default();
        let header_number = *start + lines.len();
        let header_cells = split_row(&header_line);
        let delimiter_cells = split_row(rest);
        let alignments: Option<Vec<Alignment>> =
            delimiter_cells.iter().map(|c| parse_alignment(c)).collect();

        if lines.is_empty() {
            self.leaf = None;
        } else {
            self.close_leaf(Close::Interrupted);
        }

        match alignments {
            Some(alignments) if alignments.len() == header_cells.len() => {
                let header = TableRow::new(
                    header_cells
                        .iter()
                        .map(|c| TableCell::new(self.inline(c)))
                        .collect(),
                );
                self.leaf = Some(Leaf::Table(Table::new(header, alignments)));
            }
            Some(alignments) => {
                self.push_block(Block::error(
                    format!("{}\n{}", header_line, rest.trim()),
                    format!(
                        "table header has {} columns but delimiter row has {}",
                        header_cells.len(),
                        alignments.len()
                    ),
                    header_number,
                ));
            }
            None => {
                self.push_block(Block::error(
                    format!("{}\n{}", header_line, rest.trim()),
                    "invalid table delimiter row",
                    header_number,
                ));
            }
        }
        log::trace!("Table header at slide line {}, delimiter at {}", header_number, number);
        true
    }

    /// Mark the deepest list that saw a blank line and is still open as loose.
    fn settle_blank_lines(&mut self) {
        let mut settled = false;
        for frame in self.stack.iter_mut().rev() {
            if let Frame::List {
                list,
                blank_pending,
                ..
            } = frame
            {
                if *blank_pending && !settled {
                    list.tight = false;
                    settled = true;
                }
                *blank_pending = false;
            }
        }
    }

    fn leaf_frame_is_list(&self) -> bool {
        matches!(self.stack.last(), Some(Frame::List { .. }))
    }

    fn push_block(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some(Frame::Root { blocks })
            | Some(Frame::Quote { blocks })
            | Some(Frame::Item { blocks, .. }) => blocks.push(block),
            Some(Frame::List { .. }) => {
                // Lists only hold items; close it and attach to the parent.
                self.close_frame();
                self.push_block(block);
            }
            None => self.stack.push(Frame::Root {
                blocks: vec![block],
            }),
        }
    }

    fn close_leaf(&mut self, reason: Close) {
        let Some(leaf) = self.leaf.take() else {
            return;
        };
        let block = match leaf {
            Leaf::Paragraph { lines, .. } => {
                let mut text = lines.join("\n");
                text.truncate(text.trim_end().len());
                Block::Paragraph {
                    content: self.inline(&text),
                }
            }
            Leaf::Fence {
                opening,
                lines,
                start,
                ..
            } if reason == Close::EndOfSlide => {
                let mut raw = vec![opening];
                raw.extend(lines);
                while raw.len() > 1 && raw.last().is_some_and(|l| l.trim().is_empty()) {
                    raw.pop();
                }
                Block::error(raw.join("\n"), "unclosed code fence", start)
            }
            Leaf::Fence {
                language, lines, ..
            } => {
                let mut code = lines.join("\n");
                if !lines.is_empty() {
                    code.push('\n');
                }
                Block::CodeBlock { language, code }
            }
            Leaf::Table(table) => Block::Table(table),
        };
        self.push_block(block);
    }

    fn close_frame(&mut self) {
        self.close_leaf(Close::Interrupted);
        if self.stack.len() <= 1 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Root { blocks } => self.stack.push(Frame::Root { blocks }),
            Frame::Quote { blocks } => self.push_block(Block::Blockquote { children: blocks }),
            Frame::List { list, .. } => self.push_block(Block::List(list)),
            Frame::Item { blocks, .. } => match self.stack.last_mut() {
                Some(Frame::List { list, .. }) => list.items.push(ListItem::new(blocks)),
                _ => blocks.into_iter().for_each(|b| self.push_block(b)),
            },
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.close_leaf(Close::EndOfSlide);
        while self.stack.len() > 1 {
            self.close_frame();
        }
        match self.stack.pop() {
            Some(Frame::Root { blocks }) => blocks,
            _ => Vec::new(),
        }
    }
}

/// Strip a blockquote marker (`>` plus one optional space).
fn strip_quote_marker(line: &str) -> Option<&str> {
    let indent = leading_spaces(line);
    if indent > 3 {
        return None;
    }
    let after = line[indent..].strip_prefix('>')?;
    Some(after.strip_prefix(' ').unwrap_or(after))
}

fn parse_list_marker(line: &str) -> Option<ListMarker> {
    let indent = leading_spaces(line);
    let rest = &line[indent..];
    let bytes = rest.as_bytes();

    let (ordered, marker, start, width) = match bytes.first()? {
        b'-' | b'*' | b'+' => (false, bytes[0] as char, 1, 1),
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 9 {
                return None;
            }
            let delimiter = *bytes.get(digits)?;
            if delimiter != b'.' && delimiter != b')' {
                return None;
            }
            let start = rest[..digits].parse().ok()?;
            (true, delimiter as char, start, digits + 1)
        }
        _ => return None,
    };

    let after = &rest[width..];
    if !after.is_empty() && !after.starts_with(' ') {
        return None;
    }

    let spaces = leading_spaces(after);
    let (consumed, padding) = if after.trim().is_empty() {
        (indent + width + spaces, 1)
    } else if spaces > 4 {
        (indent + width + 1, 1)
    } else {
        (indent + width + spaces, spaces)
    };

    Some(ListMarker {
        ordered,
        marker,
        start,
        consumed,
        content_indent: indent + width + padding,
    })
}

/// Check whether a line would start a block other than paragraph text.
fn starts_new_block(line: &str) -> bool {
    strip_quote_marker(line).is_some()
        || parse_list_marker(line).is_some_and(|m| !line[m.consumed..].trim().is_empty())
        || parse_atx_heading(line).is_some()
        || parse_fence_open(line).is_some()
        || is_rule_line(line)
}

/// Parse an ATX heading, returning the level and content.
fn parse_atx_heading(line: &str) -> Option<(u8, &str)> {
    let indent = leading_spaces(line);
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let level = rest.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let after = &rest[level..];
    if !after.is_empty() && !after.starts_with([' ', '\t']) {
        return None;
    }

    let mut content = after.trim();
    let without_hashes = content.trim_end_matches('#');
    if without_hashes.is_empty() {
        content = "";
    } else if without_hashes.ends_with([' ', '\t']) {
        content = without_hashes.trim_end();
    }
    Some((level as u8, content))
}

/// Check for a `|` not preceded by a backslash.
fn has_unescaped_pipe(line: &str) -> bool {
    let mut escaped = false;
    for c in line.chars() {
        match c {
            '\\' if !escaped => escaped = true,
            '|' if !escaped => return true,
            _ => escaped = false,
        }
    }
    false
}

/// Check whether a line looks like a table delimiter row.
fn is_delimiter_shaped(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('|')
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

fn parse_alignment(cell: &str) -> Option<Alignment> {
    let cell = cell.trim();
    let left = cell.starts_with(':');
    let right = cell.len() > 1 && cell.ends_with(':');
    let dashes = cell.trim_start_matches(':').trim_end_matches(':');
    if dashes.is_empty() || !dashes.chars().all(|c| c == '-') {
        return None;
    }
    Some(match (left, right) {
        (true, true) => Alignment::Center,
        (true, false) => Alignment::Left,
        (false, true) => Alignment::Right,
        (false, false) => Alignment::None,
    })
}

/// Split a table row into trimmed cell texts, dropping outer pipes.
fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for c in line.trim().chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => {
                current.push(c);
                escaped = true;
            }
            '|' => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);

    let trimmed = line.trim();
    if trimmed.starts_with('|') && !cells.is_empty() {
        cells.remove(0);
    }
    if trimmed.len() > 1 && trimmed.ends_with('|') && !trimmed.ends_with("\\|") {
        cells.pop();
    }
    cells.into_iter().map(|c| c.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<Block> {
        parse_blocks(text, &ParseOptions::default())
    }

    fn list(block: &Block) -> &List {
        match block {
            Block::List(list) => list,
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_heading() {
        assert_eq!(parse("# Title"), vec![Block::heading(1, "Title")]);
        assert_eq!(parse("### Deep ###"), vec![Block::heading(3, "Deep")]);
        assert_eq!(parse("#NoSpace"), vec![Block::paragraph("#NoSpace")]);
        assert_eq!(parse("####### seven"), vec![Block::paragraph("####### seven")]);
        assert_eq!(parse("# C#"), vec![Block::heading(1, "C#")]);
    }

    #[test]
    fn test_paragraphs() {
        let blocks = parse("first line\nsecond line\n\nnext");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            Block::Paragraph {
                content: vec![
                    Inline::text("first line"),
                    Inline::SoftBreak,
                    Inline::text("second line")
                ]
            }
        );
        assert!(parse("").is_empty());
        assert!(parse("\n   \n").is_empty());
    }

    #[test]
    fn test_fenced_code() {
        let blocks = parse("```rust\nfn main() {}\n\n---\n```");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                language: Some("rust".into()),
                code: "fn main() {}\n\n---\n".into(),
            }]
        );
    }

    #[test]
    fn test_fence_keeps_markdown_literal() {
        let blocks = parse("~~~\n# not a heading\n*x*\n~~~");
        match &blocks[0] {
            Block::CodeBlock { language, code } => {
                assert!(language.is_none());
                assert_eq!(code, "# not a heading\n*x*\n");
            }
            other => panic!("expected code block, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_fence_is_error() {
        let blocks = parse("intro\n\n```js\nlet a = 1;");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[1],
            Block::error("```js\nlet a = 1;", "unclosed code fence", 3)
        );
    }

    #[test]
    fn test_bullet_list() {
        let blocks = parse("- one\n- two\n- three");
        let list = list(&blocks[0]);
        assert!(!list.ordered);
        assert!(list.tight);
        assert_eq!(list.items.len(), 3);
        assert_eq!(list.items[1].children, vec![Block::paragraph("two")]);
    }

    #[test]
    fn test_ordered_list_start() {
        let blocks = parse("3. three\n4. four");
        let list = list(&blocks[0]);
        assert!(list.ordered);
        assert_eq!(list.start, 3);
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn test_nested_list() {
        let blocks = parse("- a\n  - b\n- c");
        assert_eq!(blocks.len(), 1);
        let outer = list(&blocks[0]);
        assert_eq!(outer.items.len(), 2);
        let inner = outer.items[0].nested_list().expect("nested list");
        assert_eq!(inner.items.len(), 1);
        assert_eq!(inner.items[0].children, vec![Block::paragraph("b")]);
        assert_eq!(outer.items[1].children, vec![Block::paragraph("c")]);
    }

    #[test]
    fn test_shallower_indent_closes_nested() {
        let blocks = parse("- a\n  - b\n    - c\n  - d\n- e");
        let outer = list(&blocks[0]);
        assert_eq!(outer.items.len(), 2);
        let middle = outer.items[0].nested_list().expect("middle");
        assert_eq!(middle.items.len(), 2);
        assert!(middle.items[0].nested_list().is_some());
    }

    #[test]
    fn test_marker_change_starts_new_list() {
        let blocks = parse("- a\n+ b\n1. c");
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn test_empty_item_keeps_list_tight() {
        let blocks = parse("-\n- b");
        let list = list(&blocks[0]);
        assert!(list.tight);
        assert_eq!(list.items.len(), 2);
        assert!(list.items[0].children.is_empty());
    }

    #[test]
    fn test_loose_list() {
        let blocks = parse("- a\n\n- b");
        let list = list(&blocks[0]);
        assert!(!list.tight);
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn test_list_item_continuation() {
        let blocks = parse("- item\n  more text\nlazy");
        let list = list(&blocks[0]);
        match &list.items[0].children[0] {
            Block::Paragraph { content } => assert_eq!(content.len(), 5),
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_line_ends_list() {
        let blocks = parse("- a\n\nafter");
        assert_eq!(blocks.len(), 2);
        assert!(list(&blocks[0]).tight);
        assert_eq!(blocks[1], Block::paragraph("after"));
    }

    #[test]
    fn test_blockquote() {
        let blocks = parse("> quoted\n> # heading\nlazy line");
        match &blocks[0] {
            Block::Blockquote { children } => {
                assert_eq!(children.len(), 2);
                assert!(matches!(children[0], Block::Paragraph { .. }));
                assert_eq!(children[1], Block::heading(1, "heading"));
            }
            other => panic!("expected blockquote, got {:?}", other),
        }
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_quote_with_list() {
        let blocks = parse("> - a\n> - b");
        match &blocks[0] {
            Block::Blockquote { children } => assert_eq!(list(&children[0]).items.len(), 2),
            other => panic!("expected blockquote, got {:?}", other),
        }
    }

    #[test]
    fn test_thematic_rule_inside_slide() {
        let blocks = parse("above\n\n***\n\nbelow");
        assert_eq!(blocks[1], Block::ThematicRule);
    }

    #[test]
    fn test_table() {
        let blocks = parse("intro\n| Name | Age |\n|:-----|----:|\n| Alice | 30 |\n| Bob |");
        assert_eq!(blocks.len(), 2);
        match &blocks[1] {
            Block::Table(table) => {
                assert_eq!(table.column_count(), 2);
                assert_eq!(table.alignments, vec![Alignment::Left, Alignment::Right]);
                assert_eq!(table.row_count(), 2);
                assert_eq!(table.rows[1].plain_text(), "Bob\t");
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_table_column_mismatch_is_error() {
        let blocks = parse("| a | b |\n|---|");
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::Error { raw, line, message } => {
                assert_eq!(raw, "| a | b |\n|---|");
                assert_eq!(*line, 1);
                assert!(message.contains("columns"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_delimiter_row_is_error() {
        let blocks = parse("text\n| a | b |\n| -:- | --- |");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[1],
            Block::error("| a | b |\n| -:- | --- |", "invalid table delimiter row", 2)
        );
    }

    #[test]
    fn test_pipe_without_delimiter_is_paragraph() {
        assert_eq!(parse("a | b"), vec![Block::paragraph("a | b")]);
    }

    #[test]
    fn test_escaped_pipe_in_cell() {
        let blocks = parse("| a \\| b |\n|---|");
        match &blocks[0] {
            Block::Table(table) => assert_eq!(table.header.plain_text(), "a | b"),
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_nesting_depth_limit() {
        let options = ParseOptions::default().with_max_nesting_depth(3);
        let blocks = parse_blocks(">>>> deep", &options);

        fn find_error(blocks: &[Block]) -> Option<&Block> {
            blocks.iter().find_map(|b| match b {
                Block::Error { .. } => Some(b),
                Block::Blockquote { children } => find_error(children),
                _ => None,
            })
        }
        match find_error(&blocks) {
            Some(Block::Error { message, line, .. }) => {
                assert_eq!(message, "nesting depth exceeds limit of 3");
                assert_eq!(*line, 1);
            }
            other => panic!("expected depth error, got {:?}", other),
        }
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let input = "> ".repeat(10_000) + "x";
        let blocks = parse(&input);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_tabs_expand() {
        let blocks = parse("-\tone\n\t-\ttwo");
        let outer = list(&blocks[0]);
        assert!(outer.items[0].nested_list().is_some());
    }

    #[test]
    fn test_list_marker_requires_space() {
        assert_eq!(parse("-not a list"), vec![Block::paragraph("-not a list")]);
        assert_eq!(parse("1.5 million"), vec![Block::paragraph("1.5 million")]);
    }

    #[test]
    fn test_code_inside_list_item() {
        let blocks = parse("- item\n\n  ```\n  code\n  ```");
        let list = list(&blocks[0]);
        assert_eq!(
            list.items[0].children[1],
            Block::CodeBlock {
                language: None,
                code: "code\n".into()
            }
        );
    }
}
