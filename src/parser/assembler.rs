//! Assembling parsed slides into a deck.

use rayon::prelude::*;

use crate::model::{Block, RawSlide, Slide, SlideDeck};

/// Parse raw slides with `parse`, in document order.
///
/// Slide indices are assigned 0-based in input order; each slide keeps the
/// document line it started on.
pub fn assemble<F>(raw: Vec<RawSlide>, parse: F) -> SlideDeck
where
    F: Fn(&str) -> Vec<Block>,
{
    let slides: Vec<Slide> = raw
        .into_iter()
        .enumerate()
        .map(|(index, slide)| build_slide(index, slide, &parse))
        .collect();

    log::debug!("Assembled deck with {} slides", slides.len());
    SlideDeck { slides }
}

/// Parallel variant of [`assemble`] on the rayon pool.
///
/// Slides are independent once split, so the result is identical to the
/// sequential version.
pub fn assemble_parallel<F>(raw: Vec<RawSlide>, parse: F) -> SlideDeck
where
    F: Fn(&str) -> Vec<Block> + Sync,
{
    let slides: Vec<Slide> = raw
        .into_par_iter()
        .enumerate()
        .map(|(index, slide)| build_slide(index, slide, &parse))
        .collect();

    log::debug!("Assembled deck with {} slides in parallel", slides.len());
    SlideDeck { slides }
}

fn build_slide<F>(index: usize, raw: RawSlide, parse: &F) -> Slide
where
    F: Fn(&str) -> Vec<Block>,
{
    let blocks = parse(&raw.source);
    log::trace!("Slide {} parsed into {} blocks", index, blocks.len());
    Slide::new(index, raw.start_line, blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_blocks, split, ParseOptions};

    fn parse(text: &str) -> Vec<Block> {
        parse_blocks(text, &ParseOptions::default())
    }

    #[test]
    fn test_indices_and_order() {
        let deck = assemble(split("# A\n---\n# B\n---\n# C"), parse);
        assert_eq!(deck.slide_count(), 3);
        for (i, slide) in deck.slides.iter().enumerate() {
            assert_eq!(slide.index, i);
        }
        assert_eq!(deck.slides[2].blocks, vec![Block::heading(1, "C")]);
        assert_eq!(deck.slides[1].start_line, 3);
    }

    #[test]
    fn test_parse_fn_is_pluggable() {
        let deck = assemble(split("a\n---\nb"), |text| vec![Block::paragraph(text.to_uppercase())]);
        assert_eq!(deck.slides[1].blocks, vec![Block::paragraph("B")]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let text = (0..40)
            .map(|i| format!("# Slide {}\n\n- item *{}*\n\n```\ncode\n```", i, i))
            .collect::<Vec<_>>()
            .join("\n---\n");

        let parallel = assemble_parallel(split(&text), parse);
        let sequential = assemble(split(&text), parse);
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.slide_count(), 40);
    }

    #[test]
    fn test_empty_slides_kept() {
        let deck = assemble(split("---\n---"), parse);
        assert_eq!(deck.slide_count(), 3);
        assert!(deck.slides.iter().all(Slide::is_empty));
    }
}
