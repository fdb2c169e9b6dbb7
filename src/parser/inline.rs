//! Inline parsing for the text of headings, paragraphs and table cells.
//!
//! Parsing runs in two passes. The first scans characters left to right,
//! producing finished nodes (text, code spans, breaks) and emphasis delimiter
//! runs. Brackets go on a bracket stack; a `]` followed by a destination
//! turns everything since its opener into a link or image. The second pass
//! pairs delimiter runs with left/right flanking rules. Unmatched delimiters
//! and brackets fall back to literal text, so `*bold text` stays `*bold text`.
//!
//! Both passes are linear in the input: a `]` only ever looks at the top of
//! the bracket stack, and paired emphasis is spliced into a linked list
//! instead of shifting a vector.

use crate::model::Inline;

/// Maximum nesting of emphasis/link nodes. Deeper pairs stay literal.
const MAX_INLINE_NESTING: usize = 32;

/// Parse inline markdown into a sequence of nodes.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    InlineParser::new(text).parse()
}

/// An emphasis delimiter run awaiting pairing.
#[derive(Debug, Clone)]
struct Delimiter {
    ch: char,
    count: usize,
    can_open: bool,
    can_close: bool,
}

#[derive(Debug, Clone)]
enum Piece {
    /// Finished node with its nesting depth
    Node(Inline, usize),
    Delim(Delimiter),
    /// `[` or `![` still waiting for its `]`
    Bracket { image: bool },
}

struct InlineParser {
    chars: Vec<char>,
    pos: usize,
    pieces: Vec<Piece>,
    text: String,
    /// Indices into `pieces` of open brackets, innermost last
    brackets: Vec<usize>,
    /// `[` openers at stack positions below this can no longer form a link,
    /// since a link was already closed inside them.
    inactive_below: usize,
}

impl InlineParser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            pieces: Vec::new(),
            text: String::new(),
            brackets: Vec::new(),
            inactive_below: 0,
        }
    }

    fn parse(mut self) -> Vec<Inline> {
        while let Some(c) = self.peek(0) {
            match c {
                '\\' => self.parse_backslash(),
                '\n' => self.parse_newline(),
                '`' => self.parse_code_span(),
                '!' if self.peek(1) == Some('[') => self.open_bracket(true),
                '[' => self.open_bracket(false),
                ']' => self.close_bracket(),
                '*' | '_' => self.parse_delimiter_run(c),
                _ => {
                    self.text.push(c);
                    self.pos += 1;
                }
            }
        }
        self.flush_text();

        let pieces = std::mem::take(&mut self.pieces);
        into_nodes(process_emphasis(pieces)).0
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.pieces.push(Piece::Node(Inline::Text { text }, 0));
        }
    }

    fn push_node(&mut self, node: Inline, depth: usize) {
        self.flush_text();
        self.pieces.push(Piece::Node(node, depth));
    }

    fn skip_spaces(&mut self) {
        while self.peek(0) == Some(' ') {
            self.pos += 1;
        }
    }

    fn parse_backslash(&mut self) {
        match self.peek(1) {
            Some('\n') => {
                trim_trailing_spaces(&mut self.text);
                self.push_node(Inline::LineBreak, 0);
                self.pos += 2;
                self.skip_spaces();
            }
            Some(next) if next.is_ascii_punctuation() => {
                self.text.push(next);
                self.pos += 2;
            }
            _ => {
                self.text.push('\\');
                self.pos += 1;
            }
        }
    }

    fn parse_newline(&mut self) {
        let trailing = self.text.len() - self.text.trim_end_matches(' ').len();
        trim_trailing_spaces(&mut self.text);
        let node = if trailing >= 2 {
            Inline::LineBreak
        } else {
            Inline::SoftBreak
        };
        self.push_node(node, 0);
        self.pos += 1;
        self.skip_spaces();
    }

    fn parse_code_span(&mut self) {
        let run = count_run(&self.chars, self.pos, '`');
        match find_closing_backticks(&self.chars, self.pos + run, run) {
            Some(close) => {
                let raw: String = self.chars[self.pos + run..close].iter().collect();
                self.push_node(Inline::code(normalize_code_span(&raw)), 0);
                self.pos = close + run;
            }
            None => {
                self.text.extend(std::iter::repeat_n('`', run));
                self.pos += run;
            }
        }
    }

    fn parse_delimiter_run(&mut self, ch: char) {
        let count = count_run(&self.chars, self.pos, ch);
        let before = if self.pos == 0 {
            None
        } else {
            self.chars.get(self.pos - 1).copied()
        };
        let after = self.chars.get(self.pos + count).copied();

        let left = is_left_flanking(before, after);
        let right = is_right_flanking(before, after);
        let (can_open, can_close) = if ch == '_' {
            (
                left && (!right || before.is_some_and(is_punctuation)),
                right && (!left || after.is_some_and(is_punctuation)),
            )
        } else {
            (left, right)
        };

        self.flush_text();
        self.pieces.push(Piece::Delim(Delimiter {
            ch,
            count,
            can_open,
            can_close,
        }));
        self.pos += count;
    }

    fn open_bracket(&mut self, image: bool) {
        self.flush_text();
        self.brackets.push(self.pieces.len());
        self.pieces.push(Piece::Bracket { image });
        self.pos += if image { 2 } else { 1 };
    }

    /// Close the innermost bracket at `]`, forming a link or image when a
    /// `(dest "title")` tail follows. Otherwise the `]` is literal.
    fn close_bracket(&mut self) {
        self.pos += 1;
        let Some(open) = self.brackets.pop() else {
            self.text.push(']');
            return;
        };
        let depth_in_stack = self.brackets.len();
        let image = matches!(self.pieces[open], Piece::Bracket { image: true });
        let active = image || depth_in_stack >= self.inactive_below;
        self.inactive_below = self.inactive_below.min(depth_in_stack);

        let tail = if active {
            parse_link_tail(&self.chars, self.pos)
        } else {
            None
        };
        let Some((href, title, end)) = tail else {
            self.text.push(']');
            return;
        };

        self.flush_text();
        let label = self.pieces.split_off(open + 1);
        self.pieces.truncate(open);
        let (children, depth) = into_nodes(process_emphasis(label));

        if image {
            let alt = children.iter().map(Inline::plain_text).collect();
            self.pieces.push(Piece::Node(
                Inline::Image {
                    src: href,
                    alt,
                    title,
                },
                0,
            ));
        } else if depth >= MAX_INLINE_NESTING {
            // Too deep to wrap: keep the label content between literal brackets.
            self.pieces.push(Piece::Node(Inline::text("["), 0));
            self.pieces
                .extend(children.into_iter().map(|node| Piece::Node(node, depth)));
            self.text.push(']');
            return;
        } else {
            self.pieces.push(Piece::Node(
                Inline::Link {
                    href,
                    title,
                    children,
                },
                depth + 1,
            ));
            self.inactive_below = self.brackets.len();
        }
        self.pos = end;
    }
}

fn trim_trailing_spaces(text: &mut String) {
    let len = text.trim_end_matches(' ').len();
    text.truncate(len);
}

fn count_run(chars: &[char], start: usize, ch: char) -> usize {
    chars[start..].iter().take_while(|&&c| c == ch).count()
}

/// Find a backtick run of exactly `len` starting at or after `from`.
fn find_closing_backticks(chars: &[char], from: usize, len: usize) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        if chars[i] == '`' {
            let run = count_run(chars, i, '`');
            if run == len {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

fn normalize_code_span(raw: &str) -> String {
    let code = raw.replace('\n', " ");
    if code.len() >= 2
        && code.starts_with(' ')
        && code.ends_with(' ')
        && !code.chars().all(|c| c == ' ')
    {
        code[1..code.len() - 1].to_string()
    } else {
        code
    }
}

fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}

/// Parse `(dest "title")` starting at `start`; returns href, title and the
/// index after the closing paren.
fn parse_link_tail(chars: &[char], start: usize) -> Option<(String, Option<String>, usize)> {
    if chars.get(start) != Some(&'(') {
        return None;
    }
    let mut i = skip_whitespace(chars, start + 1);
    let mut href = String::new();

    if chars.get(i) == Some(&'<') {
        i += 1;
        loop {
            match *chars.get(i)? {
                '>' => {
                    i += 1;
                    break;
                }
                '\n' | '<' => return None,
                '\\' if chars.get(i + 1).is_some_and(|c| c.is_ascii_punctuation()) => {
                    href.push(chars[i + 1]);
                    i += 2;
                }
                c => {
                    href.push(c);
                    i += 1;
                }
            }
        }
    } else {
        let mut parens = 0usize;
        while let Some(&c) = chars.get(i) {
            match c {
                '\\' if chars.get(i + 1).is_some_and(|c| c.is_ascii_punctuation()) => {
                    href.push(chars[i + 1]);
                    i += 2;
                    continue;
                }
                '(' => parens += 1,
                ')' if parens == 0 => break,
                ')' => parens -= 1,
                c if c.is_whitespace() || c.is_control() => break,
                _ => {}
            }
            href.push(c);
            i += 1;
        }
        if parens != 0 {
            return None;
        }
    }

    let after_dest = i;
    i = skip_whitespace(chars, i);
    let mut title = None;
    if i > after_dest {
        if let Some(&quote) = chars.get(i).filter(|&&c| c == '"' || c == '\'' || c == '(') {
            let closing = if quote == '(' { ')' } else { quote };
            let mut text = String::new();
            i += 1;
            loop {
                match *chars.get(i)? {
                    '\\' if chars.get(i + 1).is_some_and(|c| c.is_ascii_punctuation()) => {
                        text.push(chars[i + 1]);
                        i += 2;
                    }
                    c if c == closing => {
                        i += 1;
                        break;
                    }
                    c => {
                        text.push(c);
                        i += 1;
                    }
                }
            }
            title = Some(text);
            i = skip_whitespace(chars, i);
        }
    }

    if chars.get(i) != Some(&')') {
        return None;
    }
    Some((href, title, i + 1))
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || (!c.is_ascii() && !c.is_alphanumeric() && !c.is_whitespace())
}

fn is_space(c: Option<char>) -> bool {
    c.is_none_or(char::is_whitespace)
}

fn is_left_flanking(before: Option<char>, after: Option<char>) -> bool {
    if is_space(after) {
        return false;
    }
    let after_punct = after.is_some_and(is_punctuation);
    !after_punct || is_space(before) || before.is_some_and(is_punctuation)
}

fn is_right_flanking(before: Option<char>, after: Option<char>) -> bool {
    if is_space(before) {
        return false;
    }
    let before_punct = before.is_some_and(is_punctuation);
    !before_punct || is_space(after) || after.is_some_and(is_punctuation)
}

/// Pair delimiter runs into emphasis and strong nodes.
///
/// Pieces are kept in a doubly linked list over their original slots. A
/// wrapped range collapses into the slot of its first piece, so slot order
/// always matches text order and nothing is shifted.
fn process_emphasis(pieces: Vec<Piece>) -> Vec<Piece> {
    let len = pieces.len();
    let mut slots: Vec<Option<Piece>> = pieces.into_iter().map(Some).collect();
    // `len` stands for the end of the list.
    let mut next: Vec<usize> = (1..=len).collect();
    let mut prev: Vec<Option<usize>> = (0..len).map(|i| i.checked_sub(1)).collect();
    let mut head = 0usize;

    // Per character (`*`, `_`), the slot below which no opener can match.
    let mut bottoms = [0usize; 2];
    let mut closer = head;

    while closer < len {
        let (ch, closer_count) = match &slots[closer] {
            Some(Piece::Delim(d)) if d.can_close && d.count > 0 => (d.ch, d.count),
            _ => {
                closer = next[closer];
                continue;
            }
        };
        let kind = usize::from(ch == '_');

        let mut opener = None;
        let mut cursor = prev[closer];
        while let Some(i) = cursor.filter(|&i| i >= bottoms[kind]) {
            if matches!(&slots[i], Some(Piece::Delim(d)) if d.ch == ch && d.can_open && d.count > 0)
            {
                opener = Some(i);
                break;
            }
            cursor = prev[i];
        }

        let mut inner_depth = 0;
        if let Some(opener) = opener {
            let mut i = next[opener];
            while i != closer {
                if let Some(Piece::Node(_, d)) = &slots[i] {
                    inner_depth = inner_depth.max(*d);
                }
                i = next[i];
            }
        }

        // An opener further back would enclose the same too-deep content.
        let opener = opener.filter(|&o| inner_depth < MAX_INLINE_NESTING && next[o] != closer);
        let Some(opener) = opener else {
            bottoms[kind] = closer;
            closer = next[closer];
            continue;
        };
        let first = next[opener];

        let opener_count = match &slots[opener] {
            Some(Piece::Delim(d)) => d.count,
            _ => 0,
        };
        let used = if opener_count >= 2 && closer_count >= 2 {
            2
        } else {
            1
        };

        let mut inner = Vec::new();
        let mut i = first;
        while i != closer {
            inner.extend(slots[i].take());
            i = next[i];
        }
        let (children, _) = into_nodes(inner);
        let node = if used == 2 {
            Inline::Strong { children }
        } else {
            Inline::Emphasis { children }
        };
        slots[first] = Some(Piece::Node(node, inner_depth + 1));
        next[first] = closer;
        prev[closer] = Some(first);

        for at in [opener, closer] {
            if let Some(Piece::Delim(d)) = &mut slots[at] {
                d.count -= used;
            }
        }

        // Unlink exhausted runs so their neighbours become adjacent.
        let mut resume = closer;
        for at in [closer, opener] {
            if !matches!(&slots[at], Some(Piece::Delim(d)) if d.count == 0) {
                continue;
            }
            slots[at] = None;
            let (before, after) = (prev[at], next[at]);
            match before {
                Some(b) => next[b] = after,
                None => head = after,
            }
            if after < len {
                prev[after] = before;
            }
            if at == closer {
                resume = after;
            }
        }
        closer = resume;
    }

    let mut out = Vec::with_capacity(len);
    let mut i = head;
    while i < len {
        out.extend(slots[i].take());
        i = next[i];
    }
    out
}

/// Convert pieces to nodes, turning leftover delimiters into text and
/// merging adjacent text.
fn into_nodes(pieces: Vec<Piece>) -> (Vec<Inline>, usize) {
    let mut nodes: Vec<Inline> = Vec::with_capacity(pieces.len());
    let mut max_depth = 0;

    for piece in pieces {
        let node = match piece {
            Piece::Node(node, depth) => {
                max_depth = max_depth.max(depth);
                node
            }
            Piece::Delim(d) if d.count == 0 => continue,
            Piece::Delim(d) => Inline::Text {
                text: std::iter::repeat_n(d.ch, d.count).collect(),
            },
            Piece::Bracket { image } => Inline::text(if image { "![" } else { "[" }),
        };

        match (nodes.last_mut(), node) {
            (Some(Inline::Text { text: prev }), Inline::Text { text }) => prev.push_str(&text),
            (_, node) => nodes.push(node),
        }
    }

    (nodes, max_depth)
}
