//! Slide deck model types.
//!
//! This module defines the intermediate representation that bridges
//! markdown parsing and HTML rendering. Every tree is built fresh per
//! compile call and owned exclusively by its parent node.

mod block;
mod deck;
mod inline;
mod table;

pub use block::{Block, List, ListItem};
pub use deck::{Diagnostic, RawSlide, Slide, SlideDeck};
pub use inline::Inline;
pub use table::{Alignment, Table, TableCell, TableRow};
