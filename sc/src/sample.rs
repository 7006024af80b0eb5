//! Fixed sample schedule
//!
//! Two-day Paris/Rome itinerary used by the export command's `--sample`
//! mode and by tests. Anchored to the current day so the calendar always
//! renders around "today".

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::activity::{Activity, ActivityType};

fn at(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    date.and_hms_opt(hour, 0, 0)
        .expect("hour slot within 0..24")
        .and_utc()
}

fn activity(
    name: &str,
    city: &str,
    ty: ActivityType,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Activity {
    Activity {
        initial_datetime: start,
        final_datetime: end,
        city: city.to_string(),
        activity_name: name.to_string(),
        activity_type: ty,
        price: None,
        provider_company: None,
        extra_details: None,
        extra_fields: None,
        link_to_buy: None,
        purchased: false,
        passthrough: BTreeMap::new(),
    }
}

/// Generate the fixed sample travel schedule.
pub fn sample_schedule() -> Vec<Activity> {
    let today = Utc::now().date_naive();
    let tomorrow = today
        .checked_add_days(Days::new(1))
        .expect("calendar day out of chrono range");

    let mut hotel = activity(
        "Hotel Stay",
        "Paris",
        ActivityType::Stay,
        at(today, 15),
        at(tomorrow, 11),
    );
    hotel.price = Some(200.0);
    hotel.provider_company = Some("Hotel Parisian".to_string());
    hotel.purchased = true;

    let mut eiffel = activity(
        "Eiffel Tower Visit",
        "Paris",
        ActivityType::Attraction,
        at(today, 9),
        at(today, 10),
    );
    eiffel.price = Some(25.0);
    eiffel.purchased = true;

    let mut lunch = activity(
        "Lunch at Le Comptoir",
        "Paris",
        ActivityType::Meal,
        at(today, 12),
        at(today, 13),
    );
    lunch.price = Some(50.0);

    let mut flight = activity(
        "Flight to Rome",
        "Paris",
        ActivityType::Flight,
        at(tomorrow, 8),
        at(tomorrow, 11),
    );
    flight.price = Some(120.0);
    flight.provider_company = Some("Air France".to_string());
    flight.purchased = true;
    flight.extra_fields = Some(BTreeMap::from([
        ("flightNumber".to_string(), serde_json::json!("AF123")),
        ("baggageIncluded".to_string(), serde_json::json!(true)),
    ]));

    let mut colosseum = activity(
        "Colosseum Tour",
        "Rome",
        ActivityType::Attraction,
        at(tomorrow, 14),
        at(tomorrow, 18),
    );
    colosseum.price = Some(30.0);
    colosseum.extra_details = Some("Includes skip-the-line access".to_string());

    vec![hotel, eiffel, lunch, flight, colosseum]
}
