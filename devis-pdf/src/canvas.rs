//! Page model the layout draws into.
//!
//! A [`Page`] records drawing operations in PDF user space (origin at the
//! bottom-left corner, y growing upwards). Keeping the operations as data lets
//! the layout be inspected before it is serialized.

use crate::fonts::Font;

/// A4 portrait, in points.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

pub const MARGIN: f32 = 50.0;
pub const RIGHT: f32 = PAGE_WIDTH - MARGIN;
pub const CONTENT_WIDTH: f32 = RIGHT - MARGIN;

/// Lowest baseline the body may use; below is the footer.
pub const BODY_BOTTOM: f32 = 110.0;

/// RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(
        r: u8,
        g: u8,
        b: u8,
    ) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }
}

pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const BRAND: Color = Color::rgb(138, 92, 246);
pub const BRAND_LIGHT: Color = Color::rgb(243, 238, 254);
pub const MID_GRAY: Color = Color::rgb(100, 100, 100);
pub const LIGHT_GRAY: Color = Color::rgb(150, 150, 150);
pub const RULE_GRAY: Color = Color::rgb(210, 210, 210);
pub const STRIPE: Color = Color::rgb(248, 247, 252);
pub const SUCCESS: Color = Color::rgb(22, 163, 74);

/// Horizontal anchoring of a text run relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Text appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f32,
    pub color: Color,
}

impl TextStyle {
    pub fn regular(size: f32) -> Self {
        Self {
            font: Font::Regular,
            size,
            color: BLACK,
        }
    }

    pub fn bold(size: f32) -> Self {
        Self {
            font: Font::Bold,
            size,
            color: BLACK,
        }
    }

    pub fn color(
        mut self,
        color: Color,
    ) -> Self {
        self.color = color;
        self
    }
}

/// One drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Text with its left edge at `x` and baseline at `y`.
    Text {
        x: f32,
        y: f32,
        style: TextStyle,
        text: String,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
        color: Color,
    },
}

/// Drawing operations of a single page, in painting order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    ops: Vec<Op>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Text runs of the page, in painting order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            Op::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether some text run on the page contains `needle`.
    pub fn contains_text(
        &self,
        needle: &str,
    ) -> bool {
        self.texts().any(|text| text.contains(needle))
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        style: TextStyle,
        align: Align,
    ) {
        let text = text.into();
        let width = style.font.text_width(&text, style.size);
        let x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        self.ops.push(Op::Text { x, y, style, text });
    }

    pub fn fill_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    ) {
        self.ops.push(Op::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    pub fn rule(
        &mut self,
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
        color: Color,
    ) {
        self.ops.push(Op::Rule {
            x1,
            x2,
            y,
            width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn right_aligned_text_ends_at_anchor() {
        let mut page = Page::new();
        let style = TextStyle::regular(10.0);

        page.text("1000", RIGHT, 700.0, style, Align::Right);

        let Op::Text { x, .. } = &page.ops()[0] else {
            panic!("expected a text op");
        };
        let end = *x + Font::Regular.text_width("1000", 10.0);
        assert!((end - RIGHT).abs() < 0.001);
    }

    #[test]
    fn centered_text_straddles_anchor() {
        let mut page = Page::new();

        page.text("DEVIS", 300.0, 700.0, TextStyle::bold(20.0), Align::Center);

        let Op::Text { x, .. } = &page.ops()[0] else {
            panic!("expected a text op");
        };
        let width = Font::Bold.text_width("DEVIS", 20.0);
        assert!((*x - (300.0 - width / 2.0)).abs() < 0.001);
    }

    #[test]
    fn texts_skip_graphics() {
        let mut page = Page::new();
        page.fill_rect(0.0, 0.0, 10.0, 10.0, BRAND);
        page.text("TOTAL", 0.0, 20.0, TextStyle::regular(9.0), Align::Left);
        page.rule(0.0, 10.0, 5.0, 0.5, RULE_GRAY);

        let texts: Vec<&str> = page.texts().collect();

        assert_eq!(texts, vec!["TOTAL"]);
        assert!(page.contains_text("TOT"));
        assert_eq!(page.ops().len(), 3);
    }
}
