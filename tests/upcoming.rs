use chrono::{DateTime, FixedOffset, Utc};
use cron_seq::{Result, Schedule};

#[test]
fn upcoming() -> Result<()> {
    let schedule = Schedule::new("0 0 0 * * *")?;
    let now = Utc::now();

    // Get the next event's timestamp starting from now
    let next = schedule.upcoming(&now).unwrap();
    assert!(next > now);

    Ok(())
}

#[test]
fn upcoming_keeps_time_zone() -> Result<()> {
    let schedule = Schedule::new("30 9 * * mon-fri")?;
    let now = DateTime::<FixedOffset>::parse_from_rfc3339("2024-05-17T12:00:00+02:00").unwrap();

    // Friday 10:00 UTC, so the next one is on Monday
    let next = schedule.upcoming(&now).unwrap();
    assert_eq!(next.to_rfc3339(), "2024-05-20T11:30:00+02:00");

    Ok(())
}
