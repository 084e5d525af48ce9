//! Two-page quote layout.
//!
//! Page 1 carries the price breakdown, page 2 the payment scenarios and the
//! legal notice. Every section is a `draw_*` function that takes the baseline
//! to start from and returns the baseline below what it drew.

use devis_core::format::format_decimal;
use devis_core::{
    DeliveryFormat, LineItem, Quote, ServiceConfiguration, SurchargeKind, Urgency, format_eur,
    format_percent, format_rate,
};
use rust_decimal::Decimal;

use crate::canvas::{
    Align, BODY_BOTTOM, BRAND, BRAND_LIGHT, CONTENT_WIDTH, LIGHT_GRAY, MARGIN, MID_GRAY, PAGE_HEIGHT,
    PAGE_WIDTH, Page, RIGHT, RULE_GRAY, STRIPE, SUCCESS, TextStyle, WHITE,
};
use crate::document::{DocumentError, QuoteDocument};
use crate::fonts::{Font, wrap_text};

const HEADER_HEIGHT: f32 = 60.0;
const ROW_HEIGHT: f32 = 15.0;
const PAGE_COUNT: usize = 2;

/// Column anchors of the tier table: label, quantity × price, amount.
const TIER_QTY_X: f32 = MARGIN + 150.0;
const TIER_AMOUNT_X: f32 = RIGHT - 8.0;

/// Column anchors of the installment table.
const MONTHLY_EXCL_X: f32 = MARGIN + 300.0;
const MONTHLY_INCL_X: f32 = RIGHT - 8.0;

/// Lays out both pages of the quote.
///
/// # Errors
///
/// Returns [`DocumentError::PageOverflow`] if a page body runs into its
/// footer.
pub fn layout(doc: &QuoteDocument<'_>) -> Result<Vec<Page>, DocumentError> {
    Ok(vec![breakdown_page(doc)?, payment_page(doc)?])
}

fn breakdown_page(doc: &QuoteDocument<'_>) -> Result<Page, DocumentError> {
    let quote = doc.quote();
    let mut page = Page::new();

    draw_header(&mut page, doc);
    let mut y = draw_title(&mut page, doc);
    y = draw_total_panel(&mut page, quote, y);
    y = draw_service(&mut page, quote, y);

    if let Some(hours) = quote.course_hours {
        y = draw_course_hours(&mut page, quote, hours, y);
        if !quote.slide_pricing.is_empty() {
            y = draw_tiers(&mut page, quote, y);
        }
    }
    if let Some(modules) = &quote.modules {
        y = draw_line_item(&mut page, "Modules de programme", "module", modules, y);
    }
    if let Some(evaluations) = &quote.evaluations {
        y = draw_line_item(&mut page, "Évaluations", "évaluation", evaluations, y);
    }

    y = draw_options(&mut page, quote, doc.config(), y);
    y = draw_totals(&mut page, quote, y);

    check_body(y, 1)?;
    draw_page_footer(&mut page, doc, 1);

    Ok(page)
}

fn payment_page(doc: &QuoteDocument<'_>) -> Result<Page, DocumentError> {
    let quote = doc.quote();
    let mut page = Page::new();

    draw_header(&mut page, doc);

    page.text(
        "Modalités de paiement",
        MARGIN,
        PAGE_HEIGHT - HEADER_HEIGHT - 40.0,
        TextStyle::bold(18.0).color(BRAND),
        Align::Left,
    );
    let mut y = PAGE_HEIGHT - HEADER_HEIGHT - 70.0;

    y = draw_discount(&mut page, quote, y);
    y = draw_installments(&mut page, quote, y);
    y = draw_legal(&mut page, quote, y);

    check_body(y, 2)?;
    draw_closing_footer(&mut page, doc);
    draw_page_footer(&mut page, doc, 2);

    Ok(page)
}

fn check_body(
    y: f32,
    page: usize,
) -> Result<(), DocumentError> {
    if y < BODY_BOTTOM {
        return Err(DocumentError::PageOverflow { page });
    }
    Ok(())
}

// ── header ──────────────────────────────────────────────────────────────────

fn draw_header(
    page: &mut Page,
    doc: &QuoteDocument<'_>,
) {
    let branding = doc.branding();
    let top = PAGE_HEIGHT - HEADER_HEIGHT;

    page.fill_rect(0.0, top, PAGE_WIDTH, HEADER_HEIGHT, BRAND);
    page.text(
        branding.company_name.as_str(),
        MARGIN,
        top + 32.0,
        TextStyle::bold(18.0).color(WHITE),
        Align::Left,
    );
    page.text(
        branding.tagline.as_str(),
        MARGIN,
        top + 16.0,
        TextStyle::regular(9.0).color(WHITE),
        Align::Left,
    );
    page.text(
        format!("Généré le {}", doc.formatted_date()),
        RIGHT,
        top + 26.0,
        TextStyle::regular(10.0).color(WHITE),
        Align::Right,
    );
}

fn draw_title(
    page: &mut Page,
    doc: &QuoteDocument<'_>,
) -> f32 {
    let y = PAGE_HEIGHT - HEADER_HEIGHT - 40.0;

    page.text(
        doc.branding().title(),
        PAGE_WIDTH / 2.0,
        y,
        TextStyle::bold(20.0).color(BRAND),
        Align::Center,
    );
    page.text(
        format!("Date : {}", doc.formatted_date()),
        PAGE_WIDTH / 2.0,
        y - 18.0,
        TextStyle::regular(11.0).color(MID_GRAY),
        Align::Center,
    );

    y - 32.0
}

// ── total panel ─────────────────────────────────────────────────────────────

fn draw_total_panel(
    page: &mut Page,
    quote: &Quote,
    y: f32,
) -> f32 {
    let height = 62.0;
    let bottom = y - height;

    page.fill_rect(MARGIN, bottom, CONTENT_WIDTH, height, BRAND_LIGHT);
    page.text(
        "TOTAL HT",
        MARGIN + 15.0,
        bottom + 36.0,
        TextStyle::bold(14.0).color(BRAND),
        Align::Left,
    );
    page.text(
        format_eur(quote.total_excluding_tax),
        RIGHT - 15.0,
        bottom + 34.0,
        TextStyle::bold(22.0).color(BRAND),
        Align::Right,
    );
    page.text(
        "Soit TTC",
        MARGIN + 15.0,
        bottom + 13.0,
        TextStyle::regular(10.0).color(MID_GRAY),
        Align::Left,
    );
    page.text(
        format_eur(quote.total_including_tax),
        RIGHT - 15.0,
        bottom + 13.0,
        TextStyle::regular(12.0).color(MID_GRAY),
        Align::Right,
    );

    bottom - 26.0
}

// ── service and quantities ──────────────────────────────────────────────────

fn section_title(
    page: &mut Page,
    title: &str,
    y: f32,
) -> f32 {
    page.text(title, MARGIN, y, TextStyle::bold(13.0), Align::Left);
    y - 16.0
}

fn draw_service(
    page: &mut Page,
    quote: &Quote,
    y: f32,
) -> f32 {
    let y = section_title(page, "Type de service :", y);
    page.text(
        quote.service_type.label(),
        MARGIN,
        y,
        TextStyle::regular(12.0),
        Align::Left,
    );
    y - 24.0
}

fn draw_course_hours(
    page: &mut Page,
    quote: &Quote,
    hours: u32,
    y: f32,
) -> f32 {
    let mut y = section_title(page, "Heures de cours :", y);
    page.text(
        format!("{hours}h de cours ({} slides)", quote.slide_count),
        MARGIN,
        y,
        TextStyle::regular(12.0),
        Align::Left,
    );

    if quote.module_split_count > 1 {
        y -= 15.0;
        page.text(
            format!(
                "Répartition : {hours}h ÷ {} modules = {}h par module ({} slides par module)",
                quote.module_split_count,
                format_decimal(quote.hours_per_module),
                quote.slides_per_module
            ),
            MARGIN,
            y,
            TextStyle::regular(10.0).color(MID_GRAY),
            Align::Left,
        );
    }

    y - 22.0
}

fn draw_tiers(
    page: &mut Page,
    quote: &Quote,
    y: f32,
) -> f32 {
    let pricing = &quote.slide_pricing;
    let mut y = y;

    page.text(
        "Calcul par paliers :",
        MARGIN,
        y,
        TextStyle::bold(11.0).color(MID_GRAY),
        Align::Left,
    );
    y -= 18.0;

    let header = TextStyle::bold(9.0).color(MID_GRAY);
    page.fill_rect(MARGIN, y - 4.0, CONTENT_WIDTH, ROW_HEIGHT, BRAND_LIGHT);
    page.text("Palier (slides)", MARGIN + 8.0, y, header, Align::Left);
    page.text("Quantité × prix unitaire", TIER_QTY_X, y, header, Align::Left);
    page.text("Montant", TIER_AMOUNT_X, y, header, Align::Right);

    let row = TextStyle::regular(9.0);
    for (i, tier) in pricing.tiers.iter().enumerate() {
        y -= ROW_HEIGHT;
        if i % 2 == 1 {
            page.fill_rect(MARGIN, y - 4.0, CONTENT_WIDTH, ROW_HEIGHT, STRIPE);
        }
        page.text(tier.range_label.as_str(), MARGIN + 8.0, y, row, Align::Left);
        page.text(
            format!("{} × {}", tier.units_in_tier, format_eur(tier.unit_price)),
            TIER_QTY_X,
            y,
            row,
            Align::Left,
        );
        page.text(format_eur(tier.tier_amount), TIER_AMOUNT_X, y, row, Align::Right);
    }

    y -= ROW_HEIGHT + 2.0;
    page.rule(MARGIN, RIGHT, y + 11.0, 0.5, RULE_GRAY);
    page.text(
        "Total slides",
        MARGIN + 8.0,
        y,
        TextStyle::bold(9.0),
        Align::Left,
    );
    page.text(
        format_eur(pricing.total_price),
        TIER_AMOUNT_X,
        y,
        TextStyle::bold(9.0),
        Align::Right,
    );

    y - 24.0
}

fn draw_line_item(
    page: &mut Page,
    title: &str,
    unit: &str,
    item: &LineItem,
    y: f32,
) -> f32 {
    let y = section_title(page, &format!("{title} :"), y);
    let plural = if item.quantity > 1 { "s" } else { "" };

    page.text(
        format!(
            "{} {unit}{plural} × {}",
            item.quantity,
            format_eur(item.unit_price)
        ),
        MARGIN,
        y,
        TextStyle::regular(12.0),
        Align::Left,
    );
    page.text(
        format_eur(item.amount),
        TIER_AMOUNT_X,
        y,
        TextStyle::regular(12.0),
        Align::Right,
    );

    y - 24.0
}

// ── options and totals ──────────────────────────────────────────────────────

/// Rate the quote applied for an option, zero when it added nothing.
fn applied_rate(
    quote: &Quote,
    matches: impl Fn(&SurchargeKind) -> bool,
) -> Decimal {
    quote
        .surcharges
        .iter()
        .find(|s| matches(&s.kind))
        .map_or(Decimal::ZERO, |s| s.rate)
}

fn draw_options(
    page: &mut Page,
    quote: &Quote,
    config: &ServiceConfiguration,
    y: f32,
) -> f32 {
    let mut y = section_title(page, "Options :", y);

    let delivery_rate = applied_rate(quote, |k| matches!(k, SurchargeKind::Format(_)));
    let urgency_rate = applied_rate(quote, |k| matches!(k, SurchargeKind::Urgency(_)));
    let update_rate = applied_rate(quote, |k| matches!(k, SurchargeKind::AnnualUpdate));

    let lines = [
        (format_line(config.delivery_format), delivery_rate),
        (urgency_line(config.urgency), urgency_rate),
        (
            format!(
                "Mise à jour annuelle : {}",
                if config.annual_update { "Oui" } else { "Non" }
            ),
            update_rate,
        ),
    ];

    let style = TextStyle::regular(11.0);
    for (label, rate) in lines {
        page.text(label, MARGIN, y, style, Align::Left);
        page.text(
            format_percent(rate),
            TIER_AMOUNT_X,
            y,
            style.color(if rate.is_zero() { LIGHT_GRAY } else { BRAND }),
            Align::Right,
        );
        y -= ROW_HEIGHT;
    }

    y - 12.0
}

fn format_line(format: DeliveryFormat) -> String {
    format!("Format : {}", format.label())
}

fn urgency_line(urgency: Urgency) -> String {
    format!("Délai : {} ({})", urgency.label(), urgency.lead_time())
}

fn draw_totals(
    page: &mut Page,
    quote: &Quote,
    y: f32,
) -> f32 {
    let label_x = MARGIN + 250.0;
    let mut y = y;

    page.rule(label_x, RIGHT, y + 12.0, 0.5, RULE_GRAY);

    let regular = TextStyle::regular(11.0).color(MID_GRAY);
    page.text("Base HT", label_x, y, regular, Align::Left);
    page.text(
        format_eur(quote.base_excluding_tax),
        TIER_AMOUNT_X,
        y,
        regular,
        Align::Right,
    );

    y -= 18.0;
    let total = TextStyle::bold(13.0).color(BRAND);
    page.text("TOTAL HT :", label_x, y, total, Align::Left);
    page.text(
        format_eur(quote.total_excluding_tax),
        TIER_AMOUNT_X,
        y,
        total,
        Align::Right,
    );

    y -= 16.0;
    page.text(
        format!("TVA ({}) :", format_rate(quote.tax_rate)),
        label_x,
        y,
        regular,
        Align::Left,
    );
    page.text(
        format_eur(quote.tax_amount),
        TIER_AMOUNT_X,
        y,
        regular,
        Align::Right,
    );

    y -= 8.0;
    page.rule(label_x, RIGHT, y, 1.0, BRAND);

    y -= 16.0;
    let grand = TextStyle::bold(13.0);
    page.text("TOTAL TTC :", label_x, y, grand, Align::Left);
    page.text(
        format_eur(quote.total_including_tax),
        TIER_AMOUNT_X,
        y,
        grand,
        Align::Right,
    );

    y - 20.0
}

// ── payment scenarios ───────────────────────────────────────────────────────

fn selected_marker(
    page: &mut Page,
    text: &str,
    y: f32,
) {
    page.text(
        text,
        RIGHT - 12.0,
        y,
        TextStyle::bold(10.0).color(SUCCESS),
        Align::Right,
    );
}

fn draw_discount(
    page: &mut Page,
    quote: &Quote,
    y: f32,
) -> f32 {
    let discount = &quote.discount;
    let rate = format_rate(discount.discount_rate);
    let explanation = format!(
        "En cas de règlement en une seule fois à la signature, une remise de {rate} est appliquée sur le montant HT global."
    );
    let lines = wrap_text(&explanation, Font::Regular, 10.0, CONTENT_WIDTH - 24.0);

    let height = 92.0 + lines.len() as f32 * 13.0;
    let bottom = y - height;
    page.fill_rect(MARGIN, bottom, CONTENT_WIDTH, height, BRAND_LIGHT);

    let mut line_y = y - 22.0;
    page.text(
        format!("Paiement comptant (remise de {rate})"),
        MARGIN + 12.0,
        line_y,
        TextStyle::bold(13.0).color(BRAND),
        Align::Left,
    );
    if !quote.payment_plan.is_installments() {
        selected_marker(page, "Option choisie", line_y);
    }

    for line in lines {
        line_y -= 13.0;
        page.text(
            line,
            MARGIN + 12.0,
            line_y,
            TextStyle::regular(10.0).color(MID_GRAY),
            Align::Left,
        );
    }

    let amounts = [
        ("Montant HT après remise", discount.excluding_tax, TextStyle::bold(12.0)),
        ("Montant TTC", discount.including_tax, TextStyle::regular(11.0)),
        (
            "Économie réalisée (HT)",
            discount.savings(quote.total_excluding_tax),
            TextStyle::regular(11.0).color(SUCCESS),
        ),
    ];
    line_y -= 6.0;
    for (label, amount, style) in amounts {
        line_y -= 16.0;
        page.text(label, MARGIN + 12.0, line_y, style, Align::Left);
        page.text(format_eur(amount), RIGHT - 12.0, line_y, style, Align::Right);
    }

    bottom - 28.0
}

fn draw_installments(
    page: &mut Page,
    quote: &Quote,
    y: f32,
) -> f32 {
    let mut y = y;

    page.text(
        "Paiement échelonné (sans remise)",
        MARGIN,
        y,
        TextStyle::bold(13.0).color(BRAND),
        Align::Left,
    );
    if quote.payment_plan.is_installments() {
        selected_marker(
            page,
            &format!("Option choisie : {} mois", quote.installment.months),
            y,
        );
    }

    y -= 16.0;
    page.text(
        "Mensualités calculées sur le montant total, hors remise.",
        MARGIN,
        y,
        TextStyle::regular(10.0).color(MID_GRAY),
        Align::Left,
    );

    y -= 22.0;
    let header = TextStyle::bold(9.0).color(MID_GRAY);
    page.fill_rect(MARGIN, y - 4.0, CONTENT_WIDTH, ROW_HEIGHT, BRAND_LIGHT);
    page.text("Durée", MARGIN + 8.0, y, header, Align::Left);
    page.text("Mensualité HT", MONTHLY_EXCL_X, y, header, Align::Right);
    page.text("Mensualité TTC", MONTHLY_INCL_X, y, header, Align::Right);

    let selected_months = quote
        .payment_plan
        .is_installments()
        .then_some(quote.installment.months);

    let mut plans: Vec<_> = quote.installment_presets.iter().collect();
    let selected_is_preset = plans.iter().any(|p| Some(p.months) == selected_months);
    if selected_months.is_some() && !selected_is_preset {
        plans.push(&quote.installment);
    }

    for plan in plans {
        y -= ROW_HEIGHT + 3.0;
        let selected = selected_months == Some(plan.months);
        let style = if selected {
            TextStyle::bold(10.0).color(SUCCESS)
        } else {
            TextStyle::regular(10.0)
        };

        page.text(format!("{} mois", plan.months), MARGIN + 8.0, y, style, Align::Left);
        page.text(
            format!("{} / mois", format_eur(plan.excluding_tax_per_month)),
            MONTHLY_EXCL_X,
            y,
            style,
            Align::Right,
        );
        page.text(
            format!("{} / mois", format_eur(plan.including_tax_per_month)),
            MONTHLY_INCL_X,
            y,
            style,
            Align::Right,
        );
        page.rule(MARGIN, RIGHT, y - 6.0, 0.25, RULE_GRAY);
    }

    y - 36.0
}

fn draw_legal(
    page: &mut Page,
    quote: &Quote,
    y: f32,
) -> f32 {
    let mut y = y;
    page.text("TVA et conditions", MARGIN, y, TextStyle::bold(11.0), Align::Left);

    let notices = [
        format!(
            "Chaque facture mensuelle comprend la TVA légale ({}).",
            format_rate(quote.tax_rate)
        ),
        format!(
            "La remise de {} s'applique uniquement sur la base HT avant calcul de la TVA.",
            format_rate(quote.discount.discount_rate)
        ),
        "Montants exprimés en euros.".to_string(),
    ];

    for notice in notices {
        for line in wrap_text(&notice, Font::Regular, 9.0, CONTENT_WIDTH) {
            y -= 13.0;
            page.text(line, MARGIN, y, TextStyle::regular(9.0).color(MID_GRAY), Align::Left);
        }
    }

    y - 20.0
}

// ── footers ─────────────────────────────────────────────────────────────────

fn draw_closing_footer(
    page: &mut Page,
    doc: &QuoteDocument<'_>,
) {
    let center = PAGE_WIDTH / 2.0;
    let style = TextStyle::regular(10.0).color(LIGHT_GRAY);

    page.rule(MARGIN, RIGHT, 100.0, 0.75, BRAND);
    page.text(
        "Ce devis est une estimation calculée en temps réel.",
        center,
        84.0,
        style,
        Align::Center,
    );
    page.text(
        "Un devis personnalisé sera établi après analyse de vos besoins.",
        center,
        70.0,
        style,
        Align::Center,
    );

    let contact = doc.branding().contact_lines.join("  •  ");
    if !contact.is_empty() {
        page.text(
            contact,
            center,
            54.0,
            TextStyle::bold(9.0).color(BRAND),
            Align::Center,
        );
    }
}

fn draw_page_footer(
    page: &mut Page,
    doc: &QuoteDocument<'_>,
    number: usize,
) {
    let style = TextStyle::regular(8.0).color(LIGHT_GRAY);

    page.text(
        doc.branding().company_name.as_str(),
        MARGIN,
        30.0,
        style,
        Align::Left,
    );
    page.text(
        format!("Page {number}/{PAGE_COUNT}"),
        RIGHT,
        30.0,
        style,
        Align::Right,
    );
}
