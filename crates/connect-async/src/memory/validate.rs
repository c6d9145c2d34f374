//! Request checks shared by the in-memory operations

use crate::error::{ConnectError, Result, ServiceErrorKind};
use crate::model::{
    DEFAULT_PAGE_SIZE, MAX_TAGS_PER_RESOURCE, Paginated, RESERVED_TAG_PREFIX, Tags,
};
use chrono::{DateTime, Duration, Timelike, Utc};

const MAX_TAG_KEY_LEN: usize = 128;
const MAX_TAG_VALUE_LEN: usize = 256;
const METRIC_INTERVAL_MINUTES: u32 = 5;

pub(super) fn invalid_parameter(message: impl Into<String>) -> ConnectError {
    ConnectError::service(ServiceErrorKind::InvalidParameter, message)
}

pub(super) fn invalid_request(message: impl Into<String>) -> ConnectError {
    ConnectError::service(ServiceErrorKind::InvalidRequest, message)
}

pub(super) fn resource_not_found(what: &str, id: &str) -> ConnectError {
    ConnectError::service(
        ServiceErrorKind::ResourceNotFound,
        format!("{what} not found: {id}"),
    )
}

pub(super) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid_parameter(format!("{field} must not be empty")));
    }
    Ok(())
}

/// `+` followed by 2 to 15 digits, the first of which is not zero
pub(super) fn is_e164(number: &str) -> bool {
    let Some(digits) = number.strip_prefix('+') else {
        return false;
    };
    (2..=15).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

/// 8 to 64 characters with at least one upper case letter, one lower case
/// letter and one digit
pub(super) fn check_password(password: &str) -> Result<()> {
    let long_enough = (8..=64).contains(&password.chars().count());
    let upper = password.chars().any(|c| c.is_ascii_uppercase());
    let lower = password.chars().any(|c| c.is_ascii_lowercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    if long_enough && upper && lower && digit {
        Ok(())
    } else {
        Err(invalid_parameter(
            "Password must be 8-64 characters with upper case, lower case and a digit",
        ))
    }
}

/// Tag keys and values, and the resulting count on the resource
pub(super) fn check_tags(tags: &Tags, existing: Option<&Tags>) -> Result<()> {
    for (key, value) in tags {
        if key.is_empty() || key.chars().count() > MAX_TAG_KEY_LEN {
            return Err(invalid_parameter(format!(
                "Tag key must be 1-{MAX_TAG_KEY_LEN} characters: '{key}'"
            )));
        }
        if key.to_ascii_lowercase().starts_with(RESERVED_TAG_PREFIX) {
            return Err(invalid_parameter(format!(
                "Tag keys may not start with '{RESERVED_TAG_PREFIX}': '{key}'"
            )));
        }
        if value.chars().count() > MAX_TAG_VALUE_LEN {
            return Err(invalid_parameter(format!(
                "Tag value for '{key}' exceeds {MAX_TAG_VALUE_LEN} characters"
            )));
        }
    }

    let total = match existing {
        Some(current) => current
            .keys()
            .chain(tags.keys().filter(|k| !current.contains_key(*k)))
            .count(),
        None => tags.len(),
    };
    if total > MAX_TAGS_PER_RESOURCE {
        return Err(invalid_parameter(format!(
            "A resource may carry at most {MAX_TAGS_PER_RESOURCE} tags"
        )));
    }
    Ok(())
}

/// Cut one page out of `items`
///
/// The token is the offset of the next page. It is opaque to callers and
/// only valid for the listing that issued it.
pub(super) fn paginate<T>(
    items: Vec<T>,
    request: &impl Paginated,
    limit: u32,
) -> Result<(Vec<T>, Option<String>)> {
    let page_size = match request.max_results() {
        Some(n) if (1..=limit).contains(&n) => n as usize,
        Some(n) => {
            return Err(invalid_parameter(format!(
                "MaxResults must be between 1 and {limit}, got {n}"
            )));
        }
        None => DEFAULT_PAGE_SIZE.min(limit) as usize,
    };

    let offset = match request.next_token() {
        None => 0,
        Some(token) => token
            .parse::<usize>()
            .ok()
            .filter(|offset| *offset > 0 && *offset < items.len())
            .ok_or_else(|| invalid_parameter(format!("Invalid NextToken: '{token}'")))?,
    };

    let end = offset.saturating_add(page_size).min(items.len());
    let next_token = (end < items.len()).then(|| end.to_string());
    let page = items.into_iter().skip(offset).take(end - offset).collect();
    Ok((page, next_token))
}

fn on_interval_boundary(time: &DateTime<Utc>) -> bool {
    time.minute() % METRIC_INTERVAL_MINUTES == 0 && time.second() == 0 && time.nanosecond() == 0
}

/// Historical metric window rules
pub(super) fn check_metric_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<()> {
    if !on_interval_boundary(&start) || !on_interval_boundary(&end) {
        return Err(invalid_parameter(
            "StartTime and EndTime must fall on a 5 minute boundary",
        ));
    }
    if end <= start {
        return Err(invalid_parameter("EndTime must be later than StartTime"));
    }
    if end - start > Duration::hours(24) {
        return Err(invalid_parameter(
            "The interval between StartTime and EndTime may not exceed 24 hours",
        ));
    }
    if start < now - Duration::hours(24) {
        return Err(invalid_parameter(
            "StartTime may be no earlier than 24 hours before now",
        ));
    }
    Ok(())
}
