#[cfg(test)]
mod tests {
    use crate::portfolio::lots::TaxLot;
    use crate::tax::{
        classify, classify_mixed, days_held, days_until_long_term, long_term_date, HoldingPeriod,
    };
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn lot_days_ago(id: &str, days: i64) -> TaxLot {
        TaxLot::new(id, dec!(10), dec!(100), reference() - Duration::days(days))
    }

    #[test]
    fn test_classify_boundary() {
        let r = reference();
        assert_eq!(classify(r - Duration::days(365), r), HoldingPeriod::Long);
        assert_eq!(classify(r - Duration::days(364), r), HoldingPeriod::Short);
        assert_eq!(classify(r, r), HoldingPeriod::Short);
    }

    #[test]
    fn test_classify_uses_calendar_days_across_leap_year() {
        // 2024 is a leap year: one calendar year is 366 days here.
        let purchase = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
        assert_eq!(days_held(purchase, reference()), 365);
        assert_eq!(classify(purchase, reference()), HoldingPeriod::Long);
    }

    #[test]
    fn test_future_purchase_is_short() {
        let r = reference();
        assert_eq!(classify(r + Duration::days(3), r), HoldingPeriod::Short);
        assert_eq!(days_held(r + Duration::days(3), r), -3);
    }

    #[test]
    fn test_classify_mixed() {
        let r = reference();
        let short = vec![lot_days_ago("a", 10), lot_days_ago("b", 200)];
        let long = vec![lot_days_ago("c", 400), lot_days_ago("d", 365)];
        let mixed = vec![lot_days_ago("e", 10), lot_days_ago("f", 800)];

        assert_eq!(classify_mixed(&short, r), HoldingPeriod::Short);
        assert_eq!(classify_mixed(&long, r), HoldingPeriod::Long);
        assert_eq!(classify_mixed(&mixed, r), HoldingPeriod::Mixed);
        assert_eq!(classify_mixed(&Vec::<TaxLot>::new(), r), HoldingPeriod::Short);
    }

    #[test]
    fn test_days_until_long_term() {
        let r = reference();
        assert_eq!(days_until_long_term(r - Duration::days(350), r), 15);
        assert_eq!(days_until_long_term(r - Duration::days(365), r), 0);
        assert_eq!(days_until_long_term(r - Duration::days(400), r), -35);
    }

    #[test]
    fn test_long_term_date() {
        let purchase = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        let crossover = long_term_date(purchase);
        assert_eq!(crossover, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(classify(purchase, crossover), HoldingPeriod::Long);
        assert_eq!(
            classify(purchase, crossover - Duration::days(1)),
            HoldingPeriod::Short
        );
    }
}
