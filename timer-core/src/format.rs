/// A millisecond count split into display components.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DurationParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub hundredths: u64,
}

impl DurationParts {
    pub fn from_ms(ms: u64) -> Self {
        let total_secs = ms / 1000;
        Self {
            hours: total_secs / 3600,
            minutes: (total_secs % 3600) / 60,
            seconds: total_secs % 60,
            hundredths: (ms % 1000) / 10,
        }
    }

    /// "MM:SS.cs", or "HH:MM:SS.cs" once there is at least one hour.
    pub fn compact(&self) -> String {
        if self.hours > 0 {
            self.full()
        } else {
            format!("{:02}:{:02}.{:02}", self.minutes, self.seconds, self.hundredths)
        }
    }

    /// "HH:MM:SS.cs"
    pub fn full(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}.{:02}",
            self.hours, self.minutes, self.seconds, self.hundredths
        )
    }
}

/// Format milliseconds as "MM:SS.cs", with hours prefixed only when non-zero
pub fn format_duration(ms: u64) -> String {
    DurationParts::from_ms(ms).compact()
}

/// Format milliseconds as "HH:MM:SS.cs" (centiseconds)
pub fn format_hms_cs(ms: u64) -> String {
    DurationParts::from_ms(ms).full()
}

/// Format a signed lap delta: "+" when slower, "-" when faster, bare when equal.
pub fn format_delta(delta_ms: i64) -> String {
    let magnitude = format_duration(delta_ms.unsigned_abs());
    match delta_ms.signum() {
        1 => format!("+{}", magnitude),
        -1 => format!("-{}", magnitude),
        _ => magnitude,
    }
}
