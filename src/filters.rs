//! Predicates over joined approach records.

use chrono::NaiveDate;

use crate::models::JoinRecord;

/// A single criterion; bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// Approach falls on this calendar date
    Date(NaiveDate),
    StartDate(NaiveDate),
    EndDate(NaiveDate),
    MinDistance(f64),
    MaxDistance(f64),
    MinVelocity(f64),
    MaxVelocity(f64),
    /// Unknown diameters never satisfy a diameter bound
    MinDiameter(f64),
    MaxDiameter(f64),
    Hazardous(bool),
}

impl Filter {
    pub fn matches(&self, join: &JoinRecord<'_>) -> bool {
        let date = join.approach.time.date();
        let diameter = join.neo.diameter;
        match *self {
            Filter::Date(d) => date == d,
            Filter::StartDate(d) => date >= d,
            Filter::EndDate(d) => date <= d,
            Filter::MinDistance(v) => join.approach.distance >= v,
            Filter::MaxDistance(v) => join.approach.distance <= v,
            Filter::MinVelocity(v) => join.approach.velocity >= v,
            Filter::MaxVelocity(v) => join.approach.velocity <= v,
            Filter::MinDiameter(v) => diameter.is_some_and(|d| d >= v),
            Filter::MaxDiameter(v) => diameter.is_some_and(|d| d <= v),
            Filter::Hazardous(h) => join.neo.hazardous == h,
        }
    }
}

/// Optional query criteria, as collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct FilterArgs {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub distance_min: Option<f64>,
    pub distance_max: Option<f64>,
    pub velocity_min: Option<f64>,
    pub velocity_max: Option<f64>,
    pub diameter_min: Option<f64>,
    pub diameter_max: Option<f64>,
    pub hazardous: Option<bool>,
}

/// One `Filter` per criterion that is set.
pub fn create_filters(args: &FilterArgs) -> Vec<Filter> {
    [
        args.date.map(Filter::Date),
        args.start_date.map(Filter::StartDate),
        args.end_date.map(Filter::EndDate),
        args.distance_min.map(Filter::MinDistance),
        args.distance_max.map(Filter::MaxDistance),
        args.velocity_min.map(Filter::MinVelocity),
        args.velocity_max.map(Filter::MaxVelocity),
        args.diameter_min.map(Filter::MinDiameter),
        args.diameter_max.map(Filter::MaxDiameter),
        args.hazardous.map(Filter::Hazardous),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// First `n` items; `None` or `Some(0)` means no limit.
pub fn limit<I: Iterator>(iter: I, n: Option<usize>) -> std::iter::Take<I> {
    match n {
        Some(n) if n > 0 => iter.take(n),
        _ => iter.take(usize::MAX),
    }
}
