//! Request validation. Pure checks only; anything that passes here may still
//! fail in storage, but nothing that fails here ever reaches a transaction.

use chrono::{DateTime, Duration, Utc};
use cursus_model::{
    CreateCourse, CreatePhysicalGood, CreateSeminar, CreateTrainingSession,
    SeminarPrices, UpdateCourse, UpdatePhysicalGood, UpdateSeminar,
    UpdateTrainingSession,
};

use crate::error::{CatalogError, Result};

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_SHORT_DESCRIPTION_LEN: usize = 500;
pub const MAX_DESCRIPTION_LEN: usize = 5_000;
pub const MAX_TOPIC_LEN: usize = 100;

/// Events must be announced at least this far ahead.
pub const MIN_START_LEAD_HOURS: i64 = 48;
/// Shortest admissible event.
pub const MIN_EVENT_DURATION_HOURS: i64 = 1;
/// Payment deadline must leave this much room on both sides: after now and
/// before the event starts.
pub const MIN_DEADLINE_MARGIN_HOURS: i64 = 24;

fn invalid(msg: impl Into<String>) -> CatalogError {
    CatalogError::InvalidArgument(msg.into())
}

fn require_text(field: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(invalid(format!(
            "{field} exceeds the maximum length of {max}"
        )));
    }
    Ok(())
}

fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) => require_text(field, v, max),
        None => Ok(()),
    }
}

fn require_price(field: &str, price: f64) -> Result<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(invalid(format!("{field} must be greater than zero")));
    }
    Ok(())
}

fn require_positive(field: &str, value: i32) -> Result<()> {
    if value <= 0 {
        return Err(invalid(format!("{field} must be greater than zero")));
    }
    Ok(())
}

/// Relative-date constraints for time-bounded entities, evaluated against a
/// caller-supplied clock so tests stay deterministic.
pub fn schedule(
    now: DateTime<Utc>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    payment_deadline: DateTime<Utc>,
) -> Result<()> {
    let start_lead = Duration::hours(MIN_START_LEAD_HOURS);
    let min_duration = Duration::hours(MIN_EVENT_DURATION_HOURS);
    let deadline_margin = Duration::hours(MIN_DEADLINE_MARGIN_HOURS);

    if starts_at < now + start_lead {
        return Err(invalid(format!(
            "starts_at must be at least {MIN_START_LEAD_HOURS} hours from now"
        )));
    }
    if ends_at < starts_at + min_duration {
        return Err(invalid(format!(
            "ends_at must be at least {MIN_EVENT_DURATION_HOURS} hour(s) after starts_at"
        )));
    }
    if payment_deadline < now + deadline_margin {
        return Err(invalid(format!(
            "payment_deadline must be at least {MIN_DEADLINE_MARGIN_HOURS} hours from now"
        )));
    }
    if payment_deadline > starts_at - deadline_margin {
        return Err(invalid(format!(
            "payment_deadline must close at least {MIN_DEADLINE_MARGIN_HOURS} hours before starts_at"
        )));
    }
    Ok(())
}

fn seminar_prices(prices: &SeminarPrices) -> Result<()> {
    require_price("prices.reservation", prices.reservation)?;
    require_price("prices.early", prices.early)?;
    require_price("prices.late", prices.late)?;
    require_price("prices.early_surcharge", prices.early_surcharge)?;
    require_price("prices.late_surcharge", prices.late_surcharge)?;
    Ok(())
}

pub fn create_course(req: &CreateCourse) -> Result<()> {
    require_text("name", &req.name, MAX_NAME_LEN)?;
    require_text(
        "short_description",
        &req.short_description,
        MAX_SHORT_DESCRIPTION_LEN,
    )?;
    optional_text("description", req.description.as_deref(), MAX_DESCRIPTION_LEN)?;
    require_text("topic", &req.topic, MAX_TOPIC_LEN)?;
    require_price("price", req.price)?;
    require_positive("access_duration_days", req.access_duration_days)?;
    Ok(())
}

pub fn create_seminar(now: DateTime<Utc>, req: &CreateSeminar) -> Result<()> {
    require_text("name", &req.name, MAX_NAME_LEN)?;
    require_text(
        "short_description",
        &req.short_description,
        MAX_SHORT_DESCRIPTION_LEN,
    )?;
    optional_text("description", req.description.as_deref(), MAX_DESCRIPTION_LEN)?;
    require_text("topic", &req.topic, MAX_TOPIC_LEN)?;
    schedule(now, req.starts_at, req.ends_at, req.payment_deadline)?;
    seminar_prices(&req.prices)?;
    Ok(())
}

pub fn create_training_session(
    now: DateTime<Utc>,
    req: &CreateTrainingSession,
) -> Result<()> {
    require_text("name", &req.name, MAX_NAME_LEN)?;
    require_text(
        "short_description",
        &req.short_description,
        MAX_SHORT_DESCRIPTION_LEN,
    )?;
    optional_text("description", req.description.as_deref(), MAX_DESCRIPTION_LEN)?;
    schedule(now, req.starts_at, req.ends_at, req.payment_deadline)?;
    if let Some(capacity) = req.capacity {
        require_positive("capacity", capacity)?;
    }
    require_price("price", req.price)?;
    Ok(())
}

pub fn create_physical_good(req: &CreatePhysicalGood) -> Result<()> {
    require_text("name", &req.name, MAX_NAME_LEN)?;
    require_text(
        "short_description",
        &req.short_description,
        MAX_SHORT_DESCRIPTION_LEN,
    )?;
    optional_text("description", req.description.as_deref(), MAX_DESCRIPTION_LEN)?;
    require_text("sku", &req.sku, MAX_NAME_LEN)?;
    if let Some(weight) = req.weight_grams {
        require_positive("weight_grams", weight)?;
    }
    require_price("price", req.price)?;
    Ok(())
}

pub fn update_course(req: &UpdateCourse) -> Result<()> {
    optional_text("name", req.course.name.as_deref(), MAX_NAME_LEN)?;
    optional_text(
        "short_description",
        req.course.short_description.as_deref(),
        MAX_SHORT_DESCRIPTION_LEN,
    )?;
    optional_text(
        "description",
        req.course.description.as_deref(),
        MAX_DESCRIPTION_LEN,
    )?;
    optional_text("topic", req.course.topic.as_deref(), MAX_TOPIC_LEN)?;
    if let Some(days) = req.course.access_duration_days {
        require_positive("access_duration_days", days)?;
    }
    if let Some(price) = req.price {
        require_price("price", price)?;
    }
    Ok(())
}

pub fn update_seminar(now: DateTime<Utc>, req: &UpdateSeminar) -> Result<()> {
    optional_text("name", req.seminar.name.as_deref(), MAX_NAME_LEN)?;
    optional_text(
        "short_description",
        req.seminar.short_description.as_deref(),
        MAX_SHORT_DESCRIPTION_LEN,
    )?;
    optional_text(
        "description",
        req.seminar.description.as_deref(),
        MAX_DESCRIPTION_LEN,
    )?;
    optional_text("topic", req.seminar.topic.as_deref(), MAX_TOPIC_LEN)?;
    // A rescheduling update must carry the full triple; partial schedule
    // changes cannot be checked against stored values without a read, and
    // validation runs before any transaction.
    match (
        req.seminar.starts_at,
        req.seminar.ends_at,
        req.seminar.payment_deadline,
    ) {
        (None, None, None) => {}
        (Some(starts), Some(ends), Some(deadline)) => {
            schedule(now, starts, ends, deadline)?;
        }
        _ => {
            return Err(invalid(
                "rescheduling requires starts_at, ends_at and payment_deadline together",
            ));
        }
    }
    for (tier, price) in [
        ("reservation", req.prices.reservation),
        ("early", req.prices.early),
        ("late", req.prices.late),
        ("early_surcharge", req.prices.early_surcharge),
        ("late_surcharge", req.prices.late_surcharge),
    ] {
        if let Some(price) = price {
            require_price(tier, price)?;
        }
    }
    Ok(())
}

pub fn update_training_session(
    now: DateTime<Utc>,
    req: &UpdateTrainingSession,
) -> Result<()> {
    optional_text("name", req.session.name.as_deref(), MAX_NAME_LEN)?;
    optional_text(
        "short_description",
        req.session.short_description.as_deref(),
        MAX_SHORT_DESCRIPTION_LEN,
    )?;
    optional_text(
        "description",
        req.session.description.as_deref(),
        MAX_DESCRIPTION_LEN,
    )?;
    match (
        req.session.starts_at,
        req.session.ends_at,
        req.session.payment_deadline,
    ) {
        (None, None, None) => {}
        (Some(starts), Some(ends), Some(deadline)) => {
            schedule(now, starts, ends, deadline)?;
        }
        _ => {
            return Err(invalid(
                "rescheduling requires starts_at, ends_at and payment_deadline together",
            ));
        }
    }
    if let Some(capacity) = req.session.capacity {
        require_positive("capacity", capacity)?;
    }
    if let Some(price) = req.price {
        require_price("price", price)?;
    }
    Ok(())
}

pub fn update_physical_good(req: &UpdatePhysicalGood) -> Result<()> {
    optional_text("name", req.good.name.as_deref(), MAX_NAME_LEN)?;
    optional_text(
        "short_description",
        req.good.short_description.as_deref(),
        MAX_SHORT_DESCRIPTION_LEN,
    )?;
    optional_text(
        "description",
        req.good.description.as_deref(),
        MAX_DESCRIPTION_LEN,
    )?;
    optional_text("sku", req.good.sku.as_deref(), MAX_NAME_LEN)?;
    if let Some(weight) = req.good.weight_grams {
        require_positive("weight_grams", weight)?;
    }
    if let Some(price) = req.price {
        require_price("price", price)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_schedule(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>, DateTime<Utc>) {
        let starts = now + Duration::hours(72);
        let ends = starts + Duration::hours(3);
        let deadline = starts - Duration::hours(30);
        (starts, ends, deadline)
    }

    #[test]
    fn schedule_accepts_wide_margins() {
        let now = Utc::now();
        let (starts, ends, deadline) = valid_schedule(now);
        assert!(schedule(now, starts, ends, deadline).is_ok());
    }

    #[test]
    fn schedule_rejects_short_lead() {
        let now = Utc::now();
        let starts = now + Duration::hours(12);
        let err = schedule(
            now,
            starts,
            starts + Duration::hours(2),
            now + Duration::hours(30),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    #[test]
    fn schedule_rejects_instant_event() {
        let now = Utc::now();
        let starts = now + Duration::hours(72);
        assert!(
            schedule(now, starts, starts, starts - Duration::hours(30))
                .is_err()
        );
    }

    #[test]
    fn schedule_rejects_deadline_too_close_to_start() {
        let now = Utc::now();
        let starts = now + Duration::hours(72);
        let err = schedule(
            now,
            starts,
            starts + Duration::hours(2),
            starts - Duration::hours(2),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    #[test]
    fn create_course_requires_positive_price() {
        let req = CreateCourse {
            name: "Go Basics".to_string(),
            short_description: "intro".to_string(),
            description: None,
            topic: "programming".to_string(),
            language: None,
            price: 0.0,
            access_duration_days: 30,
        };
        assert!(create_course(&req).is_err());
    }

    #[test]
    fn create_course_rejects_blank_name() {
        let req = CreateCourse {
            name: "   ".to_string(),
            short_description: "intro".to_string(),
            description: None,
            topic: "programming".to_string(),
            language: None,
            price: 49.99,
            access_duration_days: 30,
        };
        assert!(create_course(&req).is_err());
    }

    #[test]
    fn update_seminar_rejects_partial_reschedule() {
        let now = Utc::now();
        let req = UpdateSeminar {
            seminar: cursus_model::SeminarPatch {
                starts_at: Some(now + Duration::hours(90)),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(update_seminar(now, &req).is_err());
    }
}
