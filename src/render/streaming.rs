//! Streaming renderer that yields markup one piece at a time.
//!
//! Instead of building the whole fragment, the streaming renderer produces
//! a sequence of events: the deck opening, each slide boundary and each
//! top-level block. Concatenating [`RenderEvent::markup`] over all events
//! gives exactly the output of [`to_html`](super::to_html).
//!
//! # Example
//!
//! ```
//! use mdslides::parser::{parse_deck, ParseOptions};
//! use mdslides::render::{RenderEvent, StreamingRenderer};
//!
//! let deck = parse_deck("# One\n---\n# Two", &ParseOptions::default());
//! for event in StreamingRenderer::new(&deck, Default::default()) {
//!     if let RenderEvent::SlideStart { index, .. } = event {
//!         println!("slide {}", index);
//!     }
//! }
//! ```

use crate::model::SlideDeck;

use super::html::HtmlRenderer;
use super::RenderOptions;

/// Events emitted during streaming rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// Deck opening markup.
    DeckStart {
        /// Number of slides that will follow
        slide_count: usize,
        /// Opening `<div>` markup
        markup: String,
    },

    /// A slide is starting.
    SlideStart {
        /// 0-based slide index
        index: usize,
        /// Opening `<section>` markup
        markup: String,
    },

    /// Markup of one top-level block.
    Block(String),

    /// A slide has finished.
    SlideEnd {
        /// 0-based slide index
        index: usize,
        /// Closing markup
        markup: String,
    },

    /// Deck closing markup.
    DeckEnd(String),
}

impl RenderEvent {
    /// Markup carried by this event.
    pub fn markup(&self) -> &str {
        match self {
            RenderEvent::DeckStart { markup, .. }
            | RenderEvent::SlideStart { markup, .. }
            | RenderEvent::SlideEnd { markup, .. } => markup,
            RenderEvent::Block(markup) | RenderEvent::DeckEnd(markup) => markup,
        }
    }

    /// Check if this is a block content event.
    pub fn has_content(&self) -> bool {
        matches!(self, RenderEvent::Block(_))
    }

    /// Check if this is a deck boundary event.
    pub fn is_deck_boundary(&self) -> bool {
        matches!(self, RenderEvent::DeckStart { .. } | RenderEvent::DeckEnd(_))
    }

    /// Check if this is a slide boundary event.
    pub fn is_slide_boundary(&self) -> bool {
        matches!(
            self,
            RenderEvent::SlideStart { .. } | RenderEvent::SlideEnd { .. }
        )
    }
}

/// Internal state for the streaming renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    /// Before any output
    Initial,
    /// About to open the slide at this index
    BeforeSlide(usize),
    /// Inside a slide, next block to render
    InSlide { slide: usize, block: usize },
    /// All slides rendered, waiting to emit deck end
    SlidesComplete,
    /// Rendering complete
    Done,
}

/// Streaming renderer that yields [`RenderEvent`]s as an iterator.
pub struct StreamingRenderer<'a> {
    deck: &'a SlideDeck,
    renderer: HtmlRenderer<'static>,
    state: StreamState,
}

impl<'a> StreamingRenderer<'a> {
    /// Create a new streaming renderer.
    pub fn new(deck: &'a SlideDeck, options: RenderOptions) -> Self {
        Self {
            deck,
            renderer: HtmlRenderer::new(options),
            state: StreamState::Initial,
        }
    }

    /// Get the number of slides in the deck.
    pub fn slide_count(&self) -> usize {
        self.deck.slide_count()
    }

    /// Check if rendering is complete.
    pub fn is_done(&self) -> bool {
        self.state == StreamState::Done
    }

    fn after_slides(&self, next: usize) -> StreamState {
        if next < self.deck.slides.len() {
            StreamState::BeforeSlide(next)
        } else {
            StreamState::SlidesComplete
        }
    }
}

impl Iterator for StreamingRenderer<'_> {
    type Item = RenderEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            StreamState::Initial => {
                self.state = self.after_slides(0);
                Some(RenderEvent::DeckStart {
                    slide_count: self.deck.slide_count(),
                    markup: self.renderer.deck_open(self.deck),
                })
            }
            StreamState::BeforeSlide(index) => {
                let slide = &self.deck.slides[index];
                self.state = StreamState::InSlide {
                    slide: index,
                    block: 0,
                };
                Some(RenderEvent::SlideStart {
                    index,
                    markup: self.renderer.slide_open(slide),
                })
            }
            StreamState::InSlide { slide, block } => {
                let current = &self.deck.slides[slide];
                match current.blocks.get(block) {
                    Some(node) => {
                        self.state = StreamState::InSlide {
                            slide,
                            block: block + 1,
                        };
                        let mut markup = String::new();
                        self.renderer.render_block(&mut markup, node);
                        Some(RenderEvent::Block(markup))
                    }
                    None => {
                        self.state = self.after_slides(slide + 1);
                        Some(RenderEvent::SlideEnd {
                            index: slide,
                            markup: self.renderer.slide_close(current),
                        })
                    }
                }
            }
            StreamState::SlidesComplete => {
                self.state = StreamState::Done;
                Some(RenderEvent::DeckEnd(self.renderer.deck_close().to_string()))
            }
            StreamState::Done => None,
        }
    }
}

/// Concatenate the markup of all events.
pub fn collect_markup<I>(events: I) -> String
where
    I: IntoIterator<Item = RenderEvent>,
{
    events.into_iter().fold(String::new(), |mut out, event| {
        out.push_str(event.markup());
        out
    })
}
