//! End-to-end pricing scenarios through the public API.
//!
//! Each scenario starts from a configuration as a customer would fill it in
//! and checks the figures shown on the quote.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use devis_core::{
    DeliveryFormat, PaymentPlan, QuoteEngine, ServiceConfiguration, ServiceType, Tariff, Urgency,
    format_eur,
};

fn quote(config: &ServiceConfiguration) -> devis_core::Quote {
    QuoteEngine::default()
        .calculate(config)
        .expect("default tariff prices every configuration")
}

#[test]
fn test_default_configuration_quote() {
    let q = quote(&ServiceConfiguration::default());

    // 20 h × 5 = 100 slides at 11, both formats +10%
    assert_eq!(q.slide_count, 100);
    assert_eq!(q.total_excluding_tax, dec!(1210));
    assert_eq!(q.total_including_tax, dec!(1452));
    assert_eq!(format_eur(q.discount.excluding_tax), "1\u{a0}028,50\u{a0}€");
    assert_eq!(q.payment_plan, PaymentPlan::Upfront);
}

#[test]
fn test_full_service_rush_with_updates() {
    let config = ServiceConfiguration {
        service_type: ServiceType::FullService,
        module_count: 4,
        course_hours: 60,
        module_split_count: 4,
        evaluation_count: 8,
        annual_update: true,
        delivery_format: DeliveryFormat::Both,
        urgency: Urgency::Express,
        installment_payment: true,
        installment_months: 10,
    };

    let q = quote(&config);

    // modules 2000, 300 slides = 1100 + 1000 + 800 = 2900, evaluations 640
    assert_eq!(q.base_excluding_tax, dec!(5540));
    // 5540 × 1.1 × 1.25 × 1.2 = 9141
    assert_eq!(q.total_excluding_tax, dec!(9141));
    assert_eq!(q.total_including_tax, dec!(10969.2));
    assert_eq!(q.hours_per_module, dec!(15));
    assert_eq!(q.installment.months, 10);
    assert_eq!(q.installment.excluding_tax_per_month, dec!(914.1));
    assert_eq!(q.installment.including_tax_per_month, dec!(1096.92));
    assert_eq!(q.surcharges.len(), 3);
}

#[test]
fn test_tax_amount_is_always_the_difference() {
    for hours in [0_u32, 1, 3, 7, 19, 41, 333, 1200] {
        let config = ServiceConfiguration {
            course_hours: hours,
            urgency: Urgency::Express,
            ..Default::default()
        };

        let q = quote(&config);

        assert_eq!(
            q.tax_amount,
            q.total_including_tax - q.total_excluding_tax,
            "{hours} hours"
        );
        assert!(q.total_including_tax >= q.total_excluding_tax);
        assert!(q.discount.excluding_tax <= q.total_excluding_tax);
    }
}

#[test]
fn test_totals_are_whole_cents() {
    for hours in 0..=120_u32 {
        let config = ServiceConfiguration {
            course_hours: hours,
            delivery_format: DeliveryFormat::Both,
            urgency: Urgency::Express,
            annual_update: true,
            ..Default::default()
        };

        let q = quote(&config);

        for amount in [
            q.total_excluding_tax,
            q.total_including_tax,
            q.discount.excluding_tax,
            q.discount.including_tax,
            q.installment.excluding_tax_per_month,
        ] {
            assert_eq!(amount, amount.round_dp(2), "{hours} hours");
        }
    }
}

#[test]
fn test_more_hours_never_cost_less() {
    let mut previous = Decimal::ZERO;

    for hours in 0..=1_200_u32 {
        let total = quote(&ServiceConfiguration {
            course_hours: hours,
            ..Default::default()
        })
        .total_excluding_tax;

        assert!(total >= previous, "total dropped at {hours} hours");
        previous = total;
    }
}

#[test]
fn test_custom_tariff_is_honoured() {
    let tariff = Tariff {
        module_price: dec!(650),
        tax_rate: dec!(0.055),
        ..Tariff::default()
    };
    let config = ServiceConfiguration {
        service_type: ServiceType::ProgramCreation,
        module_count: 2,
        delivery_format: DeliveryFormat::Pdf,
        ..Default::default()
    };

    let q = QuoteEngine::new(tariff).calculate(&config).unwrap();

    assert_eq!(q.total_excluding_tax, dec!(1300));
    assert_eq!(q.total_including_tax, dec!(1371.5));
}

#[test]
fn test_quote_serializes_for_machine_output() {
    let q = quote(&ServiceConfiguration::default());

    let json = serde_json::to_value(&q).unwrap();

    assert_eq!(json["service_type"], "slide-creation");
    assert_eq!(json["payment_plan"]["mode"], "upfront");
    assert_eq!(json["surcharges"][0]["kind"]["kind"], "format");
}

#[test]
fn test_machine_output_amounts_share_cent_scale() {
    let q = quote(&ServiceConfiguration::default());

    let json = serde_json::to_value(&q).unwrap();

    assert_eq!(json["base_excluding_tax"], "1100.00");
    assert_eq!(json["slide_pricing"]["total_price"], "1100.00");
    assert_eq!(json["slide_pricing"]["tiers"][0]["unit_price"], "11.00");
    assert_eq!(json["slide_pricing"]["tiers"][0]["tier_amount"], "1100.00");
    assert_eq!(json["total_excluding_tax"], "1210.00");
    assert_eq!(json["tax_amount"], "242.00");
    assert_eq!(json["total_including_tax"], "1452.00");
    assert_eq!(json["discount"]["excluding_tax"], "1028.50");
    assert_eq!(json["installment_presets"][0]["excluding_tax_per_month"], "302.50");
}

#[test]
fn test_machine_output_without_surcharges_keeps_cents() {
    let config = ServiceConfiguration {
        service_type: ServiceType::ProgramCreation,
        module_count: 2,
        delivery_format: DeliveryFormat::Pdf,
        ..Default::default()
    };
    let q = quote(&config);

    let json = serde_json::to_value(&q).unwrap();

    assert_eq!(json["modules"]["unit_price"], "500.00");
    assert_eq!(json["modules"]["amount"], "1000.00");
    assert_eq!(json["base_excluding_tax"], "1000.00");
    assert_eq!(json["total_excluding_tax"], "1000.00");
    assert_eq!(json["slide_pricing"]["total_price"], "0.00");
}
