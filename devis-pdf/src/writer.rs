//! Serializes laid-out pages into a PDF file.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use crate::canvas::{Color, Op, PAGE_HEIGHT, PAGE_WIDTH, Page};
use crate::fonts::{Font, encode_win_ansi};

/// Writes `pages` as a PDF document using the standard Helvetica fonts.
pub fn write_pdf(pages: &[Page]) -> Vec<u8> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let regular_id = alloc.bump();
    let bold_id = alloc.bump();

    let page_ids: Vec<(Ref, Ref)> = pages
        .iter()
        .map(|_| (alloc.bump(), alloc.bump()))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);

    for (page, &(page_id, content_id)) in pages.iter().zip(&page_ids) {
        let mut writer = pdf.page(page_id);
        writer.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        writer.parent(page_tree_id);
        writer.contents(content_id);
        writer
            .resources()
            .fonts()
            .pair(Name(Font::Regular.resource_name()), regular_id)
            .pair(Name(Font::Bold.resource_name()), bold_id);
        writer.finish();

        pdf.stream(content_id, &content_stream(page));
    }

    for (id, font) in [(regular_id, Font::Regular), (bold_id, Font::Bold)] {
        pdf.type1_font(id)
            .base_font(Name(font.base_font()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    pdf.finish()
}

fn content_stream(page: &Page) -> Vec<u8> {
    let mut content = Content::new();

    for op in page.ops() {
        match op {
            Op::Text { x, y, style, text } => {
                set_fill(&mut content, style.color);
                content.begin_text();
                content.set_font(Name(style.font.resource_name()), style.size);
                content.next_line(*x, *y);
                content.show(Str(&encode_win_ansi(text)));
                content.end_text();
            }
            Op::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                set_fill(&mut content, *color);
                content.rect(*x, *y, *width, *height);
                content.fill_nonzero();
            }
            Op::Rule {
                x1,
                x2,
                y,
                width,
                color,
            } => {
                content.save_state();
                content.set_stroke_rgb(color.r, color.g, color.b);
                content.set_line_width(*width);
                content.move_to(*x1, *y);
                content.line_to(*x2, *y);
                content.stroke();
                content.restore_state();
            }
        }
    }

    content.finish()
}

fn set_fill(
    content: &mut Content,
    color: Color,
) {
    content.set_fill_rgb(color.r, color.g, color.b);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Align, TextStyle};

    fn count(
        haystack: &[u8],
        needle: &[u8],
    ) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn writes_a_pdf_header_and_one_page_object_per_page() {
        let pages = vec![Page::new(), Page::new()];

        let bytes = write_pdf(&pages);

        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(count(&bytes, b"/Type /Page\n"), 2);
        assert_eq!(count(&bytes, b"/Count 2"), 1);
    }

    #[test]
    fn references_both_standard_fonts() {
        let bytes = write_pdf(&[Page::new()]);

        assert_eq!(count(&bytes, b"/BaseFont /Helvetica\n"), 1);
        assert_eq!(count(&bytes, b"/BaseFont /Helvetica-Bold"), 1);
        assert_eq!(count(&bytes, b"/WinAnsiEncoding"), 2);
    }

    #[test]
    fn ascii_text_is_written_verbatim() {
        let mut page = Page::new();
        page.text("TOTAL HT", 50.0, 700.0, TextStyle::bold(12.0), Align::Left);

        let bytes = write_pdf(&[page]);

        assert_eq!(count(&bytes, b"(TOTAL HT) Tj"), 1);
    }
}
