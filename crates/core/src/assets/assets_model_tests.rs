//! Tests for asset domain models.

#[cfg(test)]
mod tests {
    use crate::assets::{calculate_yield, Asset, AssetType, RentalInfo, ValuationMethod};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_asset_type_serialization() {
        assert_eq!(
            serde_json::to_string(&AssetType::RealEstate).unwrap(),
            "\"real_estate\""
        );
        assert_eq!(serde_json::to_string(&AssetType::Etf).unwrap(), "\"etf\"");
        let parsed: AssetType = serde_json::from_str("\"commodity\"").unwrap();
        assert_eq!(parsed, AssetType::Commodity);
    }

    #[test]
    fn test_valuation_method_serialization() {
        assert_eq!(
            serde_json::to_string(&ValuationMethod::Manual).unwrap(),
            "\"MANUAL\""
        );
        assert_eq!(ValuationMethod::default(), ValuationMethod::Auto);
    }

    #[test]
    fn test_calculate_yield() {
        assert_eq!(calculate_yield(dec!(2000), dec!(500000)), Some(dec!(4.8)));
    }

    #[test]
    fn test_calculate_yield_undefined_for_zero_value() {
        assert_eq!(calculate_yield(dec!(2000), Decimal::ZERO), None);
    }

    #[test]
    fn test_monthly_rent_requires_rental_flag() {
        let mut asset = Asset {
            id: "PROP-1".to_string(),
            symbol: "PROP-1".to_string(),
            asset_type: AssetType::RealEstate,
            valuation_method: ValuationMethod::Manual,
            rental: Some(RentalInfo {
                is_rental: false,
                monthly_rent: dec!(1500),
            }),
            ..Default::default()
        };
        assert_eq!(asset.monthly_rent(), None);

        asset.rental = Some(RentalInfo {
            is_rental: true,
            monthly_rent: dec!(1500),
        });
        assert_eq!(asset.monthly_rent(), Some(dec!(1500)));
        assert_eq!(asset.display_name(), "PROP-1");
    }

    #[test]
    fn test_asset_decimal_fields_serialize_as_strings() {
        let asset = Asset {
            id: "AAPL".to_string(),
            symbol: "AAPL".to_string(),
            current_price: Some(dec!(187.44)),
            ..Default::default()
        };
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["currentPrice"], "187.44");
        assert_eq!(json["assetType"], "stock");
        assert!(json.get("rental").is_none());
    }
}
