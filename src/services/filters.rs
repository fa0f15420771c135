//! Listing filter utilities
//!
//! Pure, synchronous filtering over in-memory listing collections. List
//! endpoints load the whole table and run these predicates over it; every
//! criterion left empty is a pass-through, and all criteria are ANDed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{HousingListing, JobListing, JobType, Location};

/// Filter criteria for housing listings
#[derive(Debug, Clone, Default)]
pub struct HousingFilters {
    /// Price range string, "min-max" or "min+"
    pub price_range: Option<String>,
    /// Keep listings available on/after this date
    pub available_from: Option<chrono::NaiveDate>,
}

/// Filter criteria for job listings
#[derive(Debug, Clone, Default)]
pub struct JobFilters {
    /// Employment category, matched by equality
    pub job_type: Option<JobType>,
    /// Salary range string, "min-max" or "min+"
    pub salary_range: Option<String>,
}

/// Filter housing listings by search term, price range and availability date.
pub fn filter_housing_listings(
    listings: &[HousingListing],
    search_term: &str,
    filters: &HousingFilters,
) -> Vec<HousingListing> {
    let range = filters.price_range.as_deref().and_then(parse_range);

    listings
        .iter()
        .filter(|listing| {
            let search_match = matches_search(
                search_term,
                &[
                    &listing.title,
                    &listing.description,
                    location_text(&listing.location),
                ],
            );

            let price_match = match range {
                Some((min, max)) => in_range(listing.price, min, max),
                None => true,
            };

            let date_match = match filters.available_from {
                Some(filter_date) => listing.available_from >= filter_date,
                None => true,
            };

            search_match && price_match && date_match
        })
        .cloned()
        .collect()
}

/// Filter job listings by search term, job type and salary range.
pub fn filter_job_listings(
    listings: &[JobListing],
    search_term: &str,
    filters: &JobFilters,
) -> Vec<JobListing> {
    let range = filters.salary_range.as_deref().and_then(parse_range);

    listings
        .iter()
        .filter(|listing| {
            let search_match = matches_search(
                search_term,
                &[
                    &listing.title,
                    &listing.company,
                    &listing.description,
                    location_text(&listing.location),
                ],
            );

            let type_match = match filters.job_type {
                Some(job_type) => listing.job_type == job_type,
                None => true,
            };

            // A salary string we cannot read anything from passes through
            let salary_match = match (range, extract_salary_value(&listing.salary)) {
                (Some((min, max)), Some(salary)) => in_range(salary as f64, min, max),
                _ => true,
            };

            search_match && type_match && salary_match
        })
        .cloned()
        .collect()
}

/// Case-insensitive substring match across the given fields.
/// An empty search term matches everything.
fn matches_search(search_term: &str, haystacks: &[&str]) -> bool {
    if search_term.is_empty() {
        return true;
    }
    let needle = search_term.to_lowercase();
    haystacks
        .iter()
        .any(|hay| hay.to_lowercase().contains(&needle))
}

/// Only freeform-text locations participate in the text search
fn location_text(location: &Option<Location>) -> &str {
    location
        .as_ref()
        .and_then(|l| l.as_text())
        .unwrap_or("")
}

/// Parse a range string: `"min-max"` yields an inclusive interval,
/// `"min+"` an open-ended one. Anything unreadable yields `None`, which
/// callers treat as a pass-through.
pub fn parse_range(range: &str) -> Option<(f64, Option<f64>)> {
    let range = range.trim();
    if range.is_empty() {
        return None;
    }

    if let Some(min) = range.strip_suffix('+') {
        return min.trim().parse().ok().map(|min| (min, None));
    }

    match range.split_once('-') {
        Some((min, max)) => {
            let min = min.trim().parse().ok()?;
            let max = max.trim().parse().ok()?;
            Some((min, Some(max)))
        }
        None => range.parse().ok().map(|min| (min, None)),
    }
}

fn in_range(value: f64, min: f64, max: Option<f64>) -> bool {
    match max {
        Some(max) => value >= min && value <= max,
        None => value >= min,
    }
}

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Extract the minimum integer found anywhere in a free-text salary string.
///
/// Thousands separators are collapsed first, so "$50,000 - $70,000 per
/// year" reads as 50000 and 70000 rather than as four fragments.
pub fn extract_salary_value(salary: &str) -> Option<i64> {
    if salary.is_empty() {
        return None;
    }

    let collapsed = salary.replace(',', "");
    DIGIT_RUN
        .find_iter(&collapsed)
        .filter_map(|m| m.as_str().parse::<i64>().ok())
        .min()
}
