//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `weekplan_core` linkage without the Flutter/FFI runtime.
//! - Print the week identity derived for today.

use chrono::Local;
use weekplan_core::{core_version, ping, week_dates, week_id};

fn main() {
    let today = Local::now().date_naive();

    println!("weekplan_core ping={}", ping());
    println!("weekplan_core version={}", core_version());
    let current = match week_id(today) {
        Ok(current) => current,
        Err(err) => {
            eprintln!("week identity failed: {err}");
            return;
        }
    };
    println!("today={today} week_id={current}");
    match week_dates(&current) {
        Ok(dates) => println!("week_start={} week_end={}", dates[0], dates[6]),
        Err(err) => eprintln!("week expansion failed: {err}"),
    }
}
