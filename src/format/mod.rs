//! Pure helpers turning raw email fields into display strings.
//!
//! None of these fail: input that cannot be interpreted is shown as-is.

pub mod date;
pub mod decoders;
pub mod header;

pub use date::{format_display_date, format_short_date};
pub use header::{
    extract_address, extract_address_opt, extract_display_name, extract_display_name_opt,
    sender_name,
};

pub const EMPTY_LIST_MESSAGE: &str = "No emails found for the selected filter";

/// Avatar letter for a row.
pub fn subject_initial(subject: &str) -> String {
    match subject.trim_start().chars().next() {
        Some(c) => c.to_uppercase().collect(),
        None => "?".to_string(),
    }
}

pub fn count_label(n: usize) -> String {
    if n == 1 {
        "1 email found".to_string()
    } else {
        format!("{n} emails found")
    }
}
