//! Company identity printed on the quote document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Who issues the quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    /// Name shown in the header band and the document title.
    pub company_name: String,

    /// Short line under the company name.
    pub tagline: String,

    /// Lowercase slug used in the document filename.
    pub product: String,

    /// Contact details printed in the page 2 footer.
    pub contact_lines: Vec<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            company_name: "Creatio".to_string(),
            tagline: "Conception de supports de formation".to_string(),
            product: "creatio".to_string(),
            contact_lines: vec![
                "contact@creatio.fr".to_string(),
                "www.creatio.fr".to_string(),
            ],
        }
    }
}

impl Branding {
    /// Document title, e.g. `DEVIS CREATIO`.
    pub fn title(&self) -> String {
        format!("DEVIS {}", self.company_name.to_uppercase())
    }

    /// Download name, e.g. `devis-creatio-2025-03-14.pdf`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use devis_pdf::Branding;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    /// assert_eq!(Branding::default().filename(date), "devis-creatio-2025-03-14.pdf");
    /// ```
    pub fn filename(
        &self,
        date: NaiveDate,
    ) -> String {
        format!("devis-{}-{}.pdf", slug(&self.product), date.format("%Y-%m-%d"))
    }
}

/// Keeps the filename portable: lowercase ASCII alphanumerics and dashes.
fn slug(product: &str) -> String {
    let slug: String = product
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "quote".to_string()
    } else {
        slug.to_string()
    }
}
