//! Utility functions for date, currency and string formatting.

pub mod format;

pub use format::{
    format_currency, format_date, format_optional, format_short_date, parse_timestamp,
    time_difference, truncate_string,
};
