//! ## fmt
//!
//! format utilities

use chrono::NaiveDate;

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Format a byte size for display, truncating to the largest unit
pub fn fmt_size(size: u64) -> String {
    match size {
        size if size < KB => format!("{size} B"),
        size if size < MB => format!("{} KB", size / KB),
        size if size < GB => format!("{} MB", size / MB),
        size => format!("{} GB", size / GB),
    }
}

/// Format date as folder name (`yyyy-mm-dd`)
pub fn fmt_date_folder(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod test {

    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn should_fmt_size() {
        assert_eq!(fmt_size(0), "0 B");
        assert_eq!(fmt_size(1023), "1023 B");
        assert_eq!(fmt_size(1024), "1 KB");
        assert_eq!(fmt_size(2048), "2 KB");
        assert_eq!(fmt_size(1024 * 1024 - 1), "1023 KB");
        assert_eq!(fmt_size(5 * 1024 * 1024 + 10), "5 MB");
        assert_eq!(fmt_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn should_fmt_date_folder() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(fmt_date_folder(date), String::from("2024-06-01"));
    }
}
