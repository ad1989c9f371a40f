use crate::format_elapsed;

/// WHAT: Minutes and seconds are zero-padded
/// WHY: The recording indicator always shows MM:SS
#[test]
fn given_under_an_hour_when_formatting_then_mm_ss() {
    // Given/When/Then: Representative values below one hour
    assert_eq!(format_elapsed(0), "00:00");
    assert_eq!(format_elapsed(5), "00:05");
    assert_eq!(format_elapsed(65), "01:05");
    assert_eq!(format_elapsed(3599), "59:59");
}

/// WHAT: Hour-long recordings gain an hours field
/// WHY: MM:SS alone would wrap or overflow past 59:59
#[test]
fn given_an_hour_or_more_when_formatting_then_hh_mm_ss() {
    // Given/When/Then: Values at and beyond one hour
    assert_eq!(format_elapsed(3600), "01:00:00");
    assert_eq!(format_elapsed(3661), "01:01:01");
    assert_eq!(format_elapsed(100 * 3600), "100:00:00");
}
