#[cfg(test)]
mod tests {
    use crate::errors::{Error, LotError};
    use crate::portfolio::lots::{
        available_quantity, available_quantity_on, consume_lots, CostBasisMethod, LotSelection,
        SaleRequest, TaxLot,
    };
    use crate::tax::HoldingPeriod;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn two_lots() -> Vec<TaxLot> {
        vec![
            TaxLot::new("lot-1", dec!(50), dec!(140), date(2023, 1, 15)),
            TaxLot::new("lot-2", dec!(50), dec!(160), date(2023, 6, 20)),
        ]
    }

    fn sale(quantity: Decimal, method: CostBasisMethod) -> SaleRequest {
        SaleRequest {
            quantity,
            price: dec!(180),
            date: date(2024, 3, 1),
            method,
        }
    }

    #[test]
    fn test_fifo_consumes_oldest_first() {
        let lots = two_lots();
        let outcome = consume_lots("h1", &lots, &sale(dec!(60), CostBasisMethod::Fifo)).unwrap();

        assert_eq!(outcome.lots[0].remaining_quantity, dec!(0));
        assert_eq!(outcome.lots[0].sold_quantity, dec!(50));
        assert_eq!(outcome.lots[1].remaining_quantity, dec!(40));
        assert_eq!(outcome.disposals.len(), 2);
        assert_eq!(outcome.disposals[0].lot_id, "lot-1");
        assert_eq!(outcome.disposals[0].quantity, dec!(50));
        assert_eq!(outcome.disposals[1].lot_id, "lot-2");
        assert_eq!(outcome.disposals[1].quantity, dec!(10));

        // (180 - 140) * 50 + (180 - 160) * 10
        assert_eq!(outcome.realized_gain, dec!(2200));
        assert_eq!(outcome.cost_basis, dec!(8600));
        assert_eq!(outcome.proceeds, dec!(10800));
    }

    #[test]
    fn test_fifo_orders_by_purchase_date_not_storage_order() {
        let mut lots = two_lots();
        lots.reverse();
        let outcome = consume_lots("h1", &lots, &sale(dec!(10), CostBasisMethod::Fifo)).unwrap();
        assert_eq!(outcome.disposals[0].lot_id, "lot-1");
    }

    #[test]
    fn test_lifo_consumes_newest_first() {
        let lots = two_lots();
        let outcome = consume_lots("h1", &lots, &sale(dec!(60), CostBasisMethod::Lifo)).unwrap();

        assert_eq!(outcome.lots[1].remaining_quantity, dec!(0));
        assert_eq!(outcome.lots[0].remaining_quantity, dec!(40));
        assert_eq!(outcome.disposals[0].lot_id, "lot-2");
        assert_eq!(outcome.disposals[1].lot_id, "lot-1");
        assert_eq!(outcome.disposals[1].quantity, dec!(10));
    }

    #[test]
    fn test_exhausted_lots_are_skipped() {
        let mut lots = two_lots();
        lots[0].consume(dec!(50));
        let outcome = consume_lots("h1", &lots, &sale(dec!(5), CostBasisMethod::Fifo)).unwrap();
        assert_eq!(outcome.disposals.len(), 1);
        assert_eq!(outcome.disposals[0].lot_id, "lot-2");
        // Exhausted lot is retained, not removed.
        assert_eq!(outcome.lots.len(), 2);
    }

    #[test]
    fn test_disposals_tagged_by_holding_period() {
        let lots = vec![
            TaxLot::new("old", dec!(10), dec!(100), date(2022, 1, 1)),
            TaxLot::new("new", dec!(10), dec!(100), date(2024, 1, 1)),
        ];
        let outcome = consume_lots("h1", &lots, &sale(dec!(20), CostBasisMethod::Fifo)).unwrap();
        assert_eq!(outcome.disposals[0].holding_period, HoldingPeriod::Long);
        assert_eq!(outcome.disposals[1].holding_period, HoldingPeriod::Short);
        assert_eq!(outcome.long_term_gain, dec!(800));
        assert_eq!(outcome.short_term_gain, dec!(800));
    }

    #[test]
    fn test_insufficient_quantity_leaves_lots_untouched() {
        let lots = two_lots();
        let before = lots.clone();
        let err = consume_lots("h1", &lots, &sale(dec!(101), CostBasisMethod::Fifo)).unwrap_err();
        match err {
            Error::Lot(LotError::InsufficientQuantity {
                requested,
                available,
                ..
            }) => {
                assert_eq!(requested, dec!(101));
                assert_eq!(available, dec!(100));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(lots, before);
    }

    #[test]
    fn test_specific_lot_selection() {
        let lots = two_lots();
        let method = CostBasisMethod::SpecificLot(vec![
            LotSelection::new("lot-2", dec!(30)),
            LotSelection::new("lot-1", dec!(5)),
        ]);
        let outcome = consume_lots("h1", &lots, &sale(dec!(35), method)).unwrap();
        assert_eq!(outcome.lots[0].remaining_quantity, dec!(45));
        assert_eq!(outcome.lots[1].remaining_quantity, dec!(20));
        assert_eq!(outcome.disposals[0].lot_id, "lot-2");
        assert_eq!(outcome.realized_gain, dec!(800));
    }

    #[test]
    fn test_specific_lot_duplicate_selections_are_merged() {
        let lots = two_lots();
        let method = CostBasisMethod::SpecificLot(vec![
            LotSelection::new("lot-1", dec!(30)),
            LotSelection::new("lot-1", dec!(25)),
        ]);
        let err = consume_lots("h1", &lots, &sale(dec!(55), method)).unwrap_err();
        assert!(matches!(
            err,
            Error::Lot(LotError::LotOverConsumed { ref lot_id, .. }) if lot_id == "lot-1"
        ));
    }

    #[test]
    fn test_specific_lot_sum_must_match() {
        let lots = two_lots();
        let method = CostBasisMethod::SpecificLot(vec![LotSelection::new("lot-1", dec!(10))]);
        let err = consume_lots("h1", &lots, &sale(dec!(20), method)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Lot accounting failed: Selected lot quantities sum to 10, sale requires 20"
        );
    }

    #[test]
    fn test_specific_lot_unknown_id() {
        let lots = two_lots();
        let method = CostBasisMethod::SpecificLot(vec![LotSelection::new("ghost", dec!(10))]);
        let err = consume_lots("h1", &lots, &sale(dec!(10), method)).unwrap_err();
        assert!(matches!(err, Error::Lot(LotError::LotNotFound { .. })));
    }

    #[test]
    fn test_realized_gain_is_not_rounded() {
        let lots = vec![TaxLot::new("lot-1", dec!(3), dec!(10.333333), date(2024, 1, 1))];
        let request = SaleRequest {
            quantity: dec!(1.5),
            price: dec!(12.1),
            date: date(2024, 2, 1),
            method: CostBasisMethod::Fifo,
        };
        let outcome = consume_lots("h1", &lots, &request).unwrap();
        assert_eq!(outcome.realized_gain, dec!(2.6500005));
        assert_eq!(outcome.lots[0].remaining_quantity, dec!(1.5));
    }

    #[test]
    fn test_zero_and_negative_quantities_rejected() {
        let lots = two_lots();
        assert!(consume_lots("h1", &lots, &sale(dec!(0), CostBasisMethod::Fifo)).is_err());
        assert!(consume_lots("h1", &lots, &sale(dec!(-1), CostBasisMethod::Fifo)).is_err());
        assert_eq!(available_quantity(&lots), dec!(100));
    }

    #[test]
    fn test_lots_bought_after_sale_date_are_not_available() {
        let lots = two_lots();
        let early = SaleRequest {
            quantity: dec!(60),
            price: dec!(150),
            date: date(2023, 3, 1),
            method: CostBasisMethod::Fifo,
        };
        assert_eq!(available_quantity_on(&lots, early.date), dec!(50));

        let err = consume_lots("h1", &lots, &early).unwrap_err();
        assert!(matches!(
            err,
            Error::Lot(LotError::InsufficientQuantity { available, .. }) if available == dec!(50)
        ));

        // LIFO still starts from the newest lot held on the sale date.
        let lifo = SaleRequest {
            quantity: dec!(10),
            method: CostBasisMethod::Lifo,
            ..early.clone()
        };
        let outcome = consume_lots("h1", &lots, &lifo).unwrap();
        assert_eq!(outcome.disposals.len(), 1);
        assert_eq!(outcome.disposals[0].lot_id, "lot-1");
        assert!(outcome.disposals.iter().all(|d| d.purchase_date <= d.sale_date));
    }

    #[test]
    fn test_specific_lot_bought_after_sale_date_not_found() {
        let lots = two_lots();
        let request = SaleRequest {
            quantity: dec!(10),
            price: dec!(150),
            date: date(2023, 3, 1),
            method: CostBasisMethod::SpecificLot(vec![LotSelection::new("lot-2", dec!(10))]),
        };
        let err = consume_lots("h1", &lots, &request).unwrap_err();
        assert!(matches!(err, Error::Lot(LotError::LotNotFound { .. })));
    }

    #[test]
    fn test_selling_whole_lot_books_its_total_cost() {
        let mut lots = vec![TaxLot::new("lot-1", dec!(10), dec!(100), date(2023, 1, 15))];
        lots[0].apply_split(dec!(3));
        assert_eq!(lots[0].cost_basis(), dec!(1000));

        let request = SaleRequest {
            quantity: dec!(12),
            price: dec!(40),
            date: date(2024, 3, 1),
            method: CostBasisMethod::Fifo,
        };
        let first = consume_lots("h1", &lots, &request).unwrap();
        let rest = SaleRequest {
            quantity: dec!(18),
            ..request
        };
        let second = consume_lots("h1", &first.lots, &rest).unwrap();

        assert_eq!(first.cost_basis + second.cost_basis, dec!(1000));
        assert_eq!(first.realized_gain + second.realized_gain, dec!(200));
        assert_eq!(second.lots[0].cost_basis(), Decimal::ZERO);
    }
}
