//! Splitting a document into raw slides.
//!
//! A separator is a line holding nothing but a run of three or more
//! identical `-`, `*` or `_` characters (surrounding spaces allowed). The
//! separator itself belongs to neither neighbour. A separator-shaped line
//! inside an open fenced code block is ordinary content. Fence state is
//! tracked with the block parser's container rules, so a fence opened inside
//! a list item or blockquote protects its body the same way, and a line
//! indented four or more columns past its container never opens one.

use super::block::FenceScanner;
use super::ParseOptions;
use crate::model::RawSlide;

/// An opening code fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence {
    /// `` ` `` or `~`
    pub ch: char,
    /// Length of the opening run
    pub len: usize,
    /// Spaces before the opening run
    pub indent: usize,
}

impl Fence {
    /// Check whether `line` closes this fence.
    pub fn is_closed_by(&self, line: &str) -> bool {
        let indent = leading_spaces(line);
        if indent > 3 {
            return false;
        }
        let rest = &line[indent..];
        let run = rest.chars().take_while(|&c| c == self.ch).count();
        run >= self.len && rest[run..].trim().is_empty()
    }
}

/// Count leading ASCII spaces.
pub(crate) fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

/// Check for a run of 3+ identical `-`, `*` or `_` with only blanks around it.
pub(crate) fn is_rule_line(line: &str) -> bool {
    let trimmed = line.trim_matches(|c| c == ' ' || c == '\t');
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first @ ('-' | '*' | '_')) => trimmed.len() >= 3 && chars.all(|c| c == first),
        _ => false,
    }
}

/// Parse an opening fence, returning it with the trimmed info string.
pub(crate) fn parse_fence_open(line: &str) -> Option<(Fence, &str)> {
    let indent = leading_spaces(line);
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let ch = rest.chars().next().filter(|&c| c == '`' || c == '~')?;
    let len = rest.chars().take_while(|&c| c == ch).count();
    if len < 3 {
        return None;
    }
    let info = rest[len..].trim();
    if ch == '`' && info.contains('`') {
        return None;
    }
    Some((Fence { ch, len, indent }, info))
}

/// Split normalized text into raw slides with default parse options.
///
/// Always returns at least one slide; `k` separators produce `k + 1` slides,
/// empty ones included.
pub fn split(text: &str) -> Vec<RawSlide> {
    split_with_options(text, &ParseOptions::default())
}

/// Split normalized text into raw slides.
///
/// `options` must match the ones the slides are later parsed with, so that
/// both passes agree on where fenced code starts and ends.
pub fn split_with_options(text: &str, options: &ParseOptions) -> Vec<RawSlide> {
    let mut slides = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut start_line = 1;
    let mut scanner = FenceScanner::new(options);

    for (idx, line) in text.split('\n').enumerate() {
        let number = idx + 1;

        if is_rule_line(line) && !scanner.inside_fence(line) {
            slides.push(RawSlide::new(start_line, current.join("\n")));
            current.clear();
            start_line = number + 1;
            scanner.reset();
            continue;
        }

        scanner.feed(line);
        current.push(line);
    }

    slides.push(RawSlide::new(start_line, current.join("\n")));
    log::debug!("Split document into {} slides", slides.len());
    slides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(text: &str) -> Vec<String> {
        split(text).into_iter().map(|s| s.source).collect()
    }

    #[test]
    fn test_three_slides() {
        assert_eq!(sources("A\n---\nB\n---\nC"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_no_separator() {
        let slides = split("# Only\n\ntext");
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].start_line, 1);
    }

    #[test]
    fn test_empty_input() {
        let slides = split("");
        assert_eq!(slides.len(), 1);
        assert!(slides[0].is_blank());
    }

    #[test]
    fn test_adjacent_separators_keep_empty_slides() {
        assert_eq!(sources("---\n---"), vec!["", "", ""]);
    }

    #[test]
    fn test_separator_variants() {
        assert_eq!(split("a\n***\nb\n  ___  \nc\n-----\nd").len(), 4);
        assert_eq!(split("a\n--\nb").len(), 1);
        assert_eq!(split("a\n- - -\nb").len(), 1);
        assert_eq!(split("a\n-*-\nb").len(), 1);
    }

    #[test]
    fn test_separator_inside_fence() {
        let text = "```\n---\n```";
        assert_eq!(sources(text), vec![text]);
    }

    #[test]
    fn test_fence_closed_by_longer_run_only() {
        let text = "````\n```\n---\n````\n---\nnext";
        let slides = split(text);
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[1].source, "next");
    }

    #[test]
    fn test_tilde_fence_not_closed_by_backticks() {
        assert_eq!(split("~~~\n```\n---\n~~~").len(), 1);
    }

    #[test]
    fn test_unclosed_fence_swallows_rest() {
        assert_eq!(split("```\ncode\n---\nmore").len(), 1);
    }

    #[test]
    fn test_separator_inside_fence_in_list_item() {
        let text = "- ```\n  ---\n  ```";
        assert_eq!(sources(text), vec![text]);
    }

    #[test]
    fn test_separator_inside_fence_in_blockquote() {
        let text = "> ```\n> ---\n> ```\n---\nnext";
        assert_eq!(sources(text), vec!["> ```\n> ---\n> ```", "next"]);
    }

    #[test]
    fn test_fence_ends_with_its_list_item() {
        // The unindented separator closes the item and with it the fence.
        assert_eq!(sources("- ```\n  code\n---\nnext"), vec!["- ```\n  code", "next"]);
    }

    #[test]
    fn test_indented_backticks_do_not_open_fence() {
        assert_eq!(sources("A\n\n    ```\n---\nB\n---\nC"), vec!["A\n\n    ```", "B", "C"]);
    }

    #[test]
    fn test_deeply_indented_fence_in_item() {
        let text = "1. item\n\n   ```\n   ***\n   ```";
        assert_eq!(split(text).len(), 1);
    }

    #[test]
    fn test_start_lines() {
        let slides = split("a\nb\n---\n\nc\n---\nd");
        let starts: Vec<_> = slides.iter().map(|s| s.start_line).collect();
        assert_eq!(starts, vec![1, 4, 7]);
    }

    #[test]
    fn test_fence_open_rules() {
        assert!(parse_fence_open("```rust").is_some());
        assert!(parse_fence_open("   ~~~").is_some());
        assert!(parse_fence_open("    ```").is_none());
        assert!(parse_fence_open("``").is_none());
        assert!(parse_fence_open("``` a`b").is_none());
        assert_eq!(parse_fence_open("~~~ py thon").map(|(_, info)| info), Some("py thon"));
    }
}
