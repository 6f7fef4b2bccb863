//! Field derivation off an extracted BL object.

use chrono::{NaiveDate, Utc};
use shipment_models::OrderType;

use crate::extractor::ExtractedBl;

pub fn order_type(extracted: &ExtractedBl) -> OrderType {
    if !extracted.containers.is_empty() {
        return OrderType::SeaFcl;
    }
    if extracted
        .delivery_status
        .as_deref()
        .map(|s| s.to_uppercase().contains("LCL"))
        .unwrap_or(false)
    {
        return OrderType::SeaLcl;
    }
    OrderType::SeaFcl
}

/// 3002 (booking confirmed) when `on_board_date` is a future date, 4001
/// (departed) when it's today or in the past, 3002 when the date is
/// absent or fails to parse.
pub fn initial_status(on_board_date: Option<&str>) -> i32 {
    const BOOKING_CONFIRMED: i32 = 3002;
    const DEPARTED: i32 = 4001;

    let Some(raw) = on_board_date else {
        return BOOKING_CONFIRMED;
    };
    let date_part = raw.get(0..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) if date > Utc::now().date_naive() => BOOKING_CONFIRMED,
        Ok(_) => DEPARTED,
        Err(_) => BOOKING_CONFIRMED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ExtractedContainer;

    #[test]
    fn containers_present_is_fcl() {
        let mut extracted = ExtractedBl::default();
        extracted.containers = vec![ExtractedContainer::default()];
        extracted.delivery_status = Some("LCL".to_string());
        assert_eq!(order_type(&extracted), OrderType::SeaFcl);
    }

    #[test]
    fn lcl_delivery_status_without_containers() {
        let mut extracted = ExtractedBl::default();
        extracted.delivery_status = Some("port to door LCL".to_string());
        assert_eq!(order_type(&extracted), OrderType::SeaLcl);
    }

    #[test]
    fn defaults_to_fcl() {
        assert_eq!(order_type(&ExtractedBl::default()), OrderType::SeaFcl);
    }

    #[test]
    fn future_date_is_booking_confirmed() {
        assert_eq!(initial_status(Some("2099-01-01")), 3002);
    }

    #[test]
    fn past_date_is_departed() {
        assert_eq!(initial_status(Some("2000-01-01")), 4001);
    }

    #[test]
    fn missing_date_is_booking_confirmed() {
        assert_eq!(initial_status(None), 3002);
    }

    #[test]
    fn unparseable_date_is_booking_confirmed() {
        assert_eq!(initial_status(Some("not a date")), 3002);
    }
}
