//! Text rendering of the live quote breakdown.

use std::fmt;

use devis_core::format::format_decimal;
use devis_core::{Quote, ServiceConfiguration, format_eur, format_percent, format_rate};

/// Live breakdown as printed after every recomputation.
pub struct Breakdown<'a> {
    quote: &'a Quote,
    config: &'a ServiceConfiguration,
}

impl<'a> Breakdown<'a> {
    pub fn new(
        quote: &'a Quote,
        config: &'a ServiceConfiguration,
    ) -> Self {
        Self { quote, config }
    }

    fn write_components(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let quote = self.quote;

        if let Some(hours) = quote.course_hours {
            writeln!(f, "Heures de cours :    {hours}h ({} slides)", quote.slide_count)?;
            if quote.module_split_count > 1 {
                writeln!(
                    f,
                    "Répartition :        {hours}h ÷ {} modules = {}h par module ({} slides par module)",
                    quote.module_split_count,
                    format_decimal(quote.hours_per_module),
                    quote.slides_per_module
                )?;
            }
            for tier in &quote.slide_pricing.tiers {
                writeln!(
                    f,
                    "  {:<12} {:>6} × {:>8} = {:>12}",
                    tier.range_label,
                    tier.units_in_tier,
                    format_eur(tier.unit_price),
                    format_eur(tier.tier_amount)
                )?;
            }
            writeln!(
                f,
                "Slides :             {}",
                format_eur(quote.slide_pricing.total_price)
            )?;
        }

        if let Some(modules) = &quote.modules {
            writeln!(
                f,
                "Modules :            {} × {} = {}",
                modules.quantity,
                format_eur(modules.unit_price),
                format_eur(modules.amount)
            )?;
        }

        if let Some(evaluations) = &quote.evaluations {
            writeln!(
                f,
                "Évaluations :        {} × {} = {}",
                evaluations.quantity,
                format_eur(evaluations.unit_price),
                format_eur(evaluations.amount)
            )?;
        }

        Ok(())
    }

    fn write_payment(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let quote = self.quote;
        let installments = quote.payment_plan.is_installments();
        let marker = |selected: bool| if selected { "  [choisi]" } else { "" };

        writeln!(
            f,
            "Comptant (-{}) :     {} HT / {} TTC{}",
            format_rate(quote.discount.discount_rate),
            format_eur(quote.discount.excluding_tax),
            format_eur(quote.discount.including_tax),
            marker(!installments)
        )?;
        write!(
            f,
            "En {} mois :         {} HT / {} TTC par mois{}",
            quote.installment.months,
            format_eur(quote.installment.excluding_tax_per_month),
            format_eur(quote.installment.including_tax_per_month),
            marker(installments)
        )
    }
}

impl fmt::Display for Breakdown<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let quote = self.quote;
        let config = self.config;

        writeln!(f, "Type de service :    {}", quote.service_type.label())?;
        self.write_components(f)?;

        writeln!(f, "Format :             {}", config.delivery_format.label())?;
        writeln!(
            f,
            "Délai :              {} ({})",
            config.urgency.label(),
            config.urgency.lead_time()
        )?;
        writeln!(
            f,
            "Mise à jour annuelle : {}",
            if config.annual_update { "Oui" } else { "Non" }
        )?;
        for surcharge in &quote.surcharges {
            writeln!(
                f,
                "  {:<40} {:>6}",
                surcharge.kind.label(),
                format_percent(surcharge.rate)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Base HT :            {}", format_eur(quote.base_excluding_tax))?;
        writeln!(f, "TOTAL HT :           {}", format_eur(quote.total_excluding_tax))?;
        writeln!(
            f,
            "TVA ({}) :          {}",
            format_rate(quote.tax_rate),
            format_eur(quote.tax_amount)
        )?;
        writeln!(f, "TOTAL TTC :          {}", format_eur(quote.total_including_tax))?;
        writeln!(f)?;

        self.write_payment(f)
    }
}

#[cfg(test)]
mod tests {
    use devis_core::{DeliveryFormat, QuoteEngine, ServiceType, Urgency};

    use super::*;

    fn render(config: &ServiceConfiguration) -> String {
        let quote = QuoteEngine::default().calculate(config).unwrap();
        Breakdown::new(&quote, config).to_string()
    }

    #[test]
    fn default_breakdown_shows_totals_and_tiers() {
        let text = render(&ServiceConfiguration::default());

        assert!(text.contains("Création de slides"));
        assert!(text.contains("20h (100 slides)"));
        assert!(text.contains("1 - 100"));
        assert!(text.contains("TOTAL HT :           1\u{a0}210\u{a0}€"));
        assert!(text.contains("TOTAL TTC :          1\u{a0}452\u{a0}€"));
        assert!(text.contains("1\u{a0}028,50\u{a0}€ HT"));
        assert!(text.contains("+10%"));
    }

    #[test]
    fn split_line_shows_hours_and_slides_per_module() {
        let config = ServiceConfiguration {
            course_hours: 30,
            module_split_count: 4,
            ..Default::default()
        };

        let text = render(&config);

        // 30 h ÷ 4 = 7.5 h, 37.5 slides
        assert!(text.contains("30h ÷ 4 modules = 7,5h par module (38 slides par module)"));
    }

    #[test]
    fn selected_payment_is_marked() {
        let config = ServiceConfiguration {
            installment_payment: true,
            installment_months: 6,
            ..Default::default()
        };

        let text = render(&config);

        assert!(text.contains("En 6 mois"));
        assert!(text.ends_with("par mois  [choisi]"));
    }

    #[test]
    fn program_breakdown_has_no_slide_lines() {
        let config = ServiceConfiguration {
            service_type: ServiceType::ProgramCreation,
            module_count: 2,
            delivery_format: DeliveryFormat::Both,
            urgency: Urgency::Urgent,
            annual_update: true,
            ..Default::default()
        };

        let text = render(&config);

        assert!(!text.contains("Heures de cours"));
        assert!(text.contains("Modules :            2 × 500\u{a0}€ = 1\u{a0}000\u{a0}€"));
        assert!(text.contains("TOTAL HT :           1\u{a0}980\u{a0}€"));
        assert!(text.contains("Délai Urgent (1-2 semaines)"));
    }
}
