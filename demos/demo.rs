use nanostamp::{Duration, DurationPattern, Pattern, Timestamp};

fn main() {
    // Current time
    let now = Timestamp::now();
    println!("Now: {}", now);
    println!("Since epoch: {}", now.duration_since_epoch());

    // Sub-second digit groups
    println!("Milliseconds: {}", now.milliseconds());
    println!("Microseconds: {}", now.microseconds());
    println!("Nanoseconds: {}", now.nanoseconds());

    // Custom patterns
    let t = Timestamp::from_nanos_since_epoch(1_234_356_789_123_456_789).unwrap();
    let compact = Pattern::new("%Y%m%d%H%M%S%3%6%9").unwrap();
    println!("Default: {}", t);
    println!("Compact: {}", t.format(&compact));
    println!("Date only: {}", t.format_with("%F").unwrap());

    // Parsing
    let parsed = Timestamp::parse_with("20090211125309123456789", &compact).unwrap();
    println!("Parsed equals original: {}", parsed == t);

    // Arithmetic
    let later = t + Duration::from_hours(36).unwrap();
    println!("36h later: {}", later);
    println!("Difference: {}", later - t);
    match Timestamp::EPOCH.checked_sub(Duration::from_nanos(1)) {
        Ok(ts) => println!("Before epoch: {}", ts),
        Err(err) => println!("Before epoch: {}", err),
    }

    // Durations
    let span = Duration::from_nanos(123_456_789_123_456_789);
    let hms = DurationPattern::new("%+%D%T").unwrap().with_infinity("%+forever").unwrap();
    println!("Span: {}", span);
    println!("Span (h:m:s): {}", span.format(&hms));
    println!("Infinity: {}", Duration::INFINITY.format(&hms));
}
