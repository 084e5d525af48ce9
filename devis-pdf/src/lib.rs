//! PDF rendering of Devis quotes.
//!
//! [`QuoteDocument`] turns a computed [`devis_core::Quote`] into a two-page
//! A4 document using the standard Helvetica fonts.

pub mod branding;
pub mod canvas;
pub mod document;
pub mod fonts;
mod layout;
mod writer;

pub use branding::Branding;
pub use document::{DocumentError, QuoteDocument};
