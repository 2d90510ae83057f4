#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Item, stimulus and wordlist document access
//!
//! Every identity in a package has a primary document shaped like
//! `itemrelease/item` or `itemrelease/passage`. This crate loads those
//! documents from a [`PackageTree`](tabulator_tree::PackageTree), exposes the
//! handful of fields the tabulator reads, and extracts glossary term
//! references from the HTML fragments embedded in `content` elements.

mod document;
mod release;
mod terms;

pub use document::{child, children, inner_text, SourceDocument};
pub use release::{DocumentKind, Release, Tutorial};
pub use terms::{trim_term, TermFinding, TermReference, TermScan, TermScanner};
