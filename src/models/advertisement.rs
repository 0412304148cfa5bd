use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Advertisement {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub active: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Advertisement {
    /// Whether the ad may be shown at `now`: it must be active and `now` must
    /// fall within [start_date, end_date]. A missing `end_date` means the
    /// window has no upper bound. Both bounds are inclusive.
    ///
    /// The SQL in `routes::ads::list_active_ads` must stay in sync with this.
    pub fn is_displayable(&self, now: DateTime<Utc>) -> bool {
        self.active
            && self.start_date <= now
            && self.end_date.map_or(true, |end| now <= end)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAdRequest {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    /// Defaults to true: ads are born active.
    pub active: Option<bool>,
    /// Defaults to the creation time.
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Partial update — omitted fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateAdRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub active: Option<bool>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ad(active: bool, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Advertisement {
        Advertisement {
            id: Uuid::new_v4(),
            title: "Retro console sale".into(),
            description: None,
            image_url: None,
            link_url: None,
            active,
            start_date: start,
            end_date: end,
            created_at: start,
            updated_at: start,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn active_ad_inside_window_is_displayable() {
        let a = ad(true, now() - Duration::days(1), Some(now() + Duration::days(1)));
        assert!(a.is_displayable(now()));
    }

    #[test]
    fn inactive_ad_is_never_displayable() {
        let a = ad(false, now() - Duration::days(1), Some(now() + Duration::days(1)));
        assert!(!a.is_displayable(now()));
    }

    #[test]
    fn ad_before_start_date_is_excluded() {
        let a = ad(true, now() + Duration::hours(1), None);
        assert!(!a.is_displayable(now()));
    }

    #[test]
    fn ad_past_end_date_is_excluded() {
        let a = ad(true, now() - Duration::days(7), Some(now() - Duration::hours(1)));
        assert!(!a.is_displayable(now()));
    }

    #[test]
    fn missing_end_date_means_no_upper_bound() {
        let a = ad(true, now() - Duration::days(365), None);
        assert!(a.is_displayable(now()));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let a = ad(true, now(), Some(now()));
        assert!(a.is_displayable(now()));
    }
}
