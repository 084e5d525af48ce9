//! Quote document: layout, serialization and saving.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use devis_core::{Quote, ServiceConfiguration};
use thiserror::Error;
use tracing::{debug, info};

use crate::branding::Branding;
use crate::canvas::Page;
use crate::layout::layout;
use crate::writer::write_pdf;

/// Errors raised while producing the quote document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A page body ran into its footer.
    #[error("page {page} content overflows into the footer")]
    PageOverflow { page: usize },

    /// The document could not be written to disk.
    #[error("failed to write quote document to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A quote ready to be rendered, with everything printed around it.
///
/// The document only reads the quote; rendering twice gives identical pages.
#[derive(Debug, Clone, Copy)]
pub struct QuoteDocument<'a> {
    quote: &'a Quote,
    config: &'a ServiceConfiguration,
    branding: &'a Branding,
    date: NaiveDate,
}

impl<'a> QuoteDocument<'a> {
    pub fn new(
        quote: &'a Quote,
        config: &'a ServiceConfiguration,
        branding: &'a Branding,
        date: NaiveDate,
    ) -> Self {
        Self {
            quote,
            config,
            branding,
            date,
        }
    }

    pub fn quote(&self) -> &'a Quote {
        self.quote
    }

    pub fn config(&self) -> &'a ServiceConfiguration {
        self.config
    }

    pub fn branding(&self) -> &'a Branding {
        self.branding
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Date as printed on the document, `dd/mm/yyyy`.
    pub fn formatted_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }

    /// File name the document is saved under.
    pub fn filename(&self) -> String {
        self.branding.filename(self.date)
    }

    /// Lays out the pages without serializing them.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::PageOverflow`] if the content does not fit.
    pub fn pages(&self) -> Result<Vec<Page>, DocumentError> {
        layout(self)
    }

    /// Renders the document to PDF bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use devis_core::{QuoteEngine, ServiceConfiguration};
    /// use devis_pdf::{Branding, QuoteDocument};
    ///
    /// let config = ServiceConfiguration::default();
    /// let quote = QuoteEngine::default().calculate(&config).unwrap();
    /// let branding = Branding::default();
    /// let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    ///
    /// let bytes = QuoteDocument::new(&quote, &config, &branding, date).render().unwrap();
    ///
    /// assert!(bytes.starts_with(b"%PDF"));
    /// ```
    pub fn render(&self) -> Result<Vec<u8>, DocumentError> {
        let pages = self.pages()?;
        let bytes = write_pdf(&pages);

        debug!(pages = pages.len(), bytes = bytes.len(), "quote document rendered");
        Ok(bytes)
    }

    /// Renders the document and writes it into `dir` under [`Self::filename`].
    ///
    /// Returns the path of the written file.
    pub fn save(
        &self,
        dir: &Path,
    ) -> Result<PathBuf, DocumentError> {
        let bytes = self.render()?;
        let path = dir.join(self.filename());

        fs::write(&path, &bytes).map_err(|source| DocumentError::Io {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), bytes = bytes.len(), "quote document saved");
        Ok(path)
    }
}
