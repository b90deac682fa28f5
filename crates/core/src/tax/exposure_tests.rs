#[cfg(test)]
mod tests {
    use crate::assets::{Asset, AssetType};
    use crate::portfolio::holdings::Holding;
    use crate::portfolio::lots::{LotDisposal, LotKind, LotType, TaxLot};
    use crate::settings::TaxSettings;
    use crate::tax::{
        build_lot_breakdown, calculate_tax_exposure, detect_aging_lots, estimate_liability,
        summarize_realized_gains, DispositionStatus, HoldingPeriod, PriceMap, TaxContext,
    };
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn days_ago(days: i64) -> NaiveDate {
        reference() - Duration::days(days)
    }

    fn holding(asset_id: &str, lots: Vec<TaxLot>, mark: Decimal) -> Holding {
        let mut holding = Holding::new(
            "p1",
            asset_id,
            Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap(),
        );
        holding.lots = lots;
        holding.recalculate_aggregates();
        holding.revalue(mark);
        holding
    }

    fn asset(id: &str, price: Option<Decimal>) -> Asset {
        Asset {
            id: id.to_string(),
            symbol: format!("{}-SYM", id),
            asset_type: AssetType::Stock,
            currency: "USD".to_string(),
            current_price: price,
            ..Default::default()
        }
    }

    fn context() -> TaxContext {
        TaxContext::new(TaxSettings::new(dec!(0.30), dec!(0.15)).unwrap(), reference())
    }

    #[test]
    fn test_exposure_buckets_and_liability() {
        let holdings = vec![
            holding(
                "AAA",
                vec![
                    // short gain: 10 × (150 - 100) = 500
                    TaxLot::new("a1", dec!(10), dec!(100), days_ago(100)),
                    // long gain: 10 × (150 - 50) = 1000
                    TaxLot::new("a2", dec!(10), dec!(50), days_ago(500)),
                ],
                dec!(150),
            ),
            holding(
                "BBB",
                vec![
                    // short loss: 5 × (80 - 100) = -100
                    TaxLot::new("b1", dec!(5), dec!(100), days_ago(30)),
                    // long loss: 5 × (80 - 120) = -200
                    TaxLot::new("b2", dec!(5), dec!(120), days_ago(700)),
                ],
                dec!(80),
            ),
        ];
        let prices = PriceMap::from([
            ("AAA".to_string(), dec!(150)),
            ("BBB".to_string(), dec!(80)),
        ]);
        let metrics = calculate_tax_exposure(&holdings, &prices, &context());

        assert_eq!(metrics.short_term_gains, dec!(500));
        assert_eq!(metrics.short_term_losses, dec!(-100));
        assert_eq!(metrics.long_term_gains, dec!(1000));
        assert_eq!(metrics.long_term_losses, dec!(-200));
        assert_eq!(metrics.net_short_term, dec!(400));
        assert_eq!(metrics.net_long_term, dec!(800));
        assert_eq!(metrics.total_unrealized_gain, dec!(1200));
        // 400 × 0.30 + 800 × 0.15
        assert_eq!(metrics.estimated_liability, dec!(240));
        assert_eq!(metrics.effective_tax_rate, dec!(0.2));
        assert_eq!(metrics.aging_lot_count, 0);
    }

    #[test]
    fn test_net_losses_generate_no_liability() {
        let holdings = vec![holding(
            "AAA",
            vec![
                TaxLot::new("a1", dec!(10), dec!(100), days_ago(10)),
                TaxLot::new("a2", dec!(10), dec!(10), days_ago(900)),
            ],
            dec!(50),
        )];
        let metrics = calculate_tax_exposure(&holdings, &PriceMap::new(), &context());
        assert_eq!(metrics.net_short_term, dec!(-500));
        assert_eq!(metrics.net_long_term, dec!(400));
        // Short-term loss does not offset the long-term gain.
        assert_eq!(metrics.estimated_liability, dec!(60));
        assert_eq!(metrics.effective_tax_rate, Decimal::ZERO);
        assert_eq!(
            estimate_liability(dec!(-10), dec!(-10), &TaxSettings::default()),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_missing_price_falls_back_to_stored_value() {
        let holdings = vec![holding(
            "AAA",
            vec![TaxLot::new("a1", dec!(10), dec!(100), days_ago(10))],
            dec!(120),
        )];
        let metrics = calculate_tax_exposure(&holdings, &PriceMap::new(), &context());
        assert_eq!(metrics.total_unrealized_gain, dec!(200));
    }

    #[test]
    fn test_exhausted_lots_are_ignored() {
        let mut sold = TaxLot::new("a1", dec!(10), dec!(1), days_ago(10));
        sold.consume(dec!(10));
        let holdings = vec![holding(
            "AAA",
            vec![sold, TaxLot::new("a2", dec!(1), dec!(100), days_ago(10))],
            dec!(100),
        )];
        let prices = PriceMap::from([("AAA".to_string(), dec!(1000))]);
        let metrics = calculate_tax_exposure(&holdings, &prices, &context());
        assert_eq!(metrics.short_term_gains, dec!(900));
    }

    #[test]
    fn test_exposure_is_idempotent() {
        let holdings = vec![holding(
            "AAA",
            vec![
                TaxLot::new("a1", dec!(3.3), dec!(101.7), days_ago(340)),
                TaxLot::new("a2", dec!(7.1), dec!(99.01), days_ago(800)),
            ],
            dec!(103.33),
        )];
        let prices = PriceMap::new();
        let first = calculate_tax_exposure(&holdings, &prices, &context());
        let second = calculate_tax_exposure(&holdings, &prices, &context());
        assert_eq!(first, second);
        assert_eq!(first.aging_lot_count, 1);
    }

    #[test]
    fn test_detect_aging_lots_window() {
        let holdings = vec![holding(
            "AAA",
            vec![
                TaxLot::new("inside", dec!(10), dec!(100), days_ago(350)),
                TaxLot::new("edge", dec!(10), dec!(100), days_ago(335)),
                TaxLot::new("outside", dec!(10), dec!(100), days_ago(334)),
                TaxLot::new("crossed", dec!(10), dec!(100), days_ago(365)),
            ],
            dec!(100),
        )];
        let assets = vec![asset("AAA", Some(dec!(110)))];
        let aging = detect_aging_lots(&holdings, &assets, 30, reference());

        let ids: Vec<&str> = aging.iter().map(|a| a.lot_id.as_str()).collect();
        assert_eq!(ids, vec!["inside", "edge"]);

        let inside = &aging[0];
        assert_eq!(inside.symbol, "AAA-SYM");
        assert_eq!(inside.days_held, 350);
        assert_eq!(inside.days_remaining, 15);
        assert_eq!(inside.long_term_date, reference() + Duration::days(15));
        assert_eq!(inside.current_value, dec!(1100));
        assert_eq!(inside.unrealized_gain, dec!(100));
    }

    #[test]
    fn test_detect_aging_lots_price_fallback_and_unknown_asset() {
        let holdings = vec![
            holding("AAA", vec![TaxLot::new("a1", dec!(10), dec!(100), days_ago(350))], dec!(90)),
            holding("ZZZ", vec![TaxLot::new("z1", dec!(10), dec!(100), days_ago(350))], dec!(90)),
        ];
        let assets = vec![asset("AAA", None)];
        let aging = detect_aging_lots(&holdings, &assets, 30, reference());
        assert_eq!(aging.len(), 1);
        assert_eq!(aging[0].unrealized_gain, dec!(-100));
    }

    #[test]
    fn test_lot_breakdown_with_espp_disposition() {
        let espp = TaxLot::new("e1", dec!(10), dec!(85), days_ago(200)).with_kind(LotKind::Espp {
            grant_date: days_ago(380),
            discount_percent: dec!(15),
            market_price_at_purchase: dec!(100),
            bargain_element: dec!(15),
        });
        let standard = TaxLot::new("s1", dec!(5), dec!(100), days_ago(400));
        let h = holding("AAA", vec![espp, standard], dec!(120));

        let rows = build_lot_breakdown(&h, Some(dec!(120)), reference()).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].lot_type, LotType::Espp);
        assert_eq!(rows[0].unrealized_gain, dec!(350));
        assert_eq!(rows[0].holding_period, HoldingPeriod::Short);
        assert_eq!(rows[0].days_until_long_term, Some(165));
        let disposition = rows[0].espp_disposition.as_ref().unwrap();
        assert_eq!(disposition.status, DispositionStatus::Disqualifying);

        assert_eq!(rows[1].holding_period, HoldingPeriod::Long);
        assert_eq!(rows[1].days_until_long_term, None);
        assert_eq!(rows[1].unrealized_gain_pct, dec!(20));
        assert!(rows[1].espp_disposition.is_none());
    }

    fn disposal(gain: Decimal, period: HoldingPeriod, sale_date: NaiveDate) -> LotDisposal {
        LotDisposal {
            lot_id: "l".to_string(),
            lot_type: LotType::Standard,
            quantity: dec!(1),
            purchase_price: dec!(100),
            purchase_date: sale_date - Duration::days(10),
            sale_price: dec!(100) + gain,
            sale_date,
            cost_basis: dec!(100),
            proceeds: dec!(100) + gain,
            realized_gain: gain,
            holding_period: period,
        }
    }

    #[test]
    fn test_summarize_realized_gains_by_year() {
        let mut h = holding("AAA", vec![], Decimal::ZERO);
        let d2023 = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        let d2024 = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        h.disposals = vec![
            disposal(dec!(300), HoldingPeriod::Short, d2024),
            disposal(dec!(-50), HoldingPeriod::Short, d2024),
            disposal(dec!(200), HoldingPeriod::Long, d2024),
            disposal(dec!(1000), HoldingPeriod::Long, d2023),
        ];
        let settings = TaxSettings::new(dec!(0.30), dec!(0.15)).unwrap();

        let summary = summarize_realized_gains(&[h.clone()], &settings, Some(2024));
        assert_eq!(summary.disposal_count, 3);
        assert_eq!(summary.net_short_term, dec!(250));
        assert_eq!(summary.short_term_losses, dec!(-50));
        assert_eq!(summary.net_long_term, dec!(200));
        assert_eq!(summary.total_realized_gain, dec!(450));
        assert_eq!(summary.estimated_liability, dec!(105));

        let all = summarize_realized_gains(&[h], &settings, None);
        assert_eq!(all.disposal_count, 4);
        assert_eq!(all.total_realized_gain, dec!(1450));
    }
}
