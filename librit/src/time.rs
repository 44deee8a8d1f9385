use chrono::{DateTime, Local, TimeZone};

/// The exact timestamp format the commit log uses: `E MMM dd HH:mm:ss yyyy Z`.
const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

pub fn format_timestamp(time: DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Timestamp used by the initial commit: the Unix epoch, rendered in the
/// local time zone exactly like every other commit's timestamp.
pub fn epoch() -> DateTime<Local> {
    Local.timestamp_opt(0, 0).single().expect("epoch is always representable")
}

pub fn now() -> DateTime<Local> {
    Local::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_formats_as_1970() {
        let formatted = format_timestamp(epoch());
        assert!(formatted.contains("1970"), "{}", formatted);
        assert!(formatted.starts_with("Thu Jan 01"), "{}", formatted);
    }
}
