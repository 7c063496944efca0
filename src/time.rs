#[cfg(test)]
#[path = "./time_tests.rs"]
mod tests;

use std::fmt;

/// A calendar date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// UTC offset of an offset date-time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offset {
    /// The `Z` suffix, denoting a UTC offset of 00:00. RFC 3339 section 2.
    Z,
    /// Offset between local time and UTC.
    Custom {
        /// Signed minutes east of UTC.
        minutes: i16,
    },
}

/// A wall-clock time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
}

const HAS_DATE: u8 = 1 << 0;
const HAS_TIME: u8 = 1 << 1;
const HAS_SECONDS: u8 = 1 << 2;
const NANO_SHIFT: u8 = 4;

/// No-offset sentinel for `offset_minutes`; `i16::MAX` encodes `Z`.
const OFFSET_NONE: i16 = i16::MIN;

/// Any of the four TOML temporal values, based on RFC 3339.
///
/// One compact struct carries every subtype; presence flags record whether a
/// date, a time, and an offset appeared in the input. [`type_str`]
/// (Self::type_str) reports which subtype was parsed, [`date`](Self::date) /
/// [`time`](Self::time) / [`offset`](Self::offset) expose the parts, and
/// `Display` renders the normalized RFC 3339 text.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    date: Date,
    flags: u8,
    hour: u8,
    minute: u8,
    seconds: u8,
    offset_minutes: i16,
    nanos: u32,
}

fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: u16, month: u8) -> u8 {
    const DAYS: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[month as usize]
    }
}

impl DateTime {
    /// Scans a date-time from the front of `input`, returning the number of
    /// characters consumed. Returns `None` when the input is not a valid
    /// date, time, or combination; the caller decides whether that means
    /// "not a date-time at all" or "malformed date-time".
    ///
    /// Accepted shapes: `YYYY-MM-DD`, `HH:MM[:SS[.frac]]`, date `T`/`t`/space
    /// time, and a trailing `Z`/`z` or `±HH:MM` offset (offset requires a
    /// date). Seconds default to `00` when omitted. Fractional seconds keep
    /// up to nine digits; the original digit count is preserved for
    /// formatting.
    pub(crate) fn munch(input: &[char]) -> Option<(usize, DateTime)> {
        enum State {
            Year,
            Month,
            Day,
            Hour,
            Minute,
            Second,
            Frac,
            OffHour,
            OffMin,
        }
        let mut state = match input {
            [_, _, ':', _, _, ..] => State::Hour,
            [_, _, _, _, '-', _, _, '-', ..] => State::Year,
            _ => return None,
        };

        let mut value = DateTime {
            date: Date {
                year: 0,
                month: 0,
                day: 0,
            },
            flags: 0,
            hour: 0,
            minute: 0,
            seconds: 0,
            offset_minutes: OFFSET_NONE,
            nanos: 0,
        };

        let mut current = 0u32;
        let mut len = 0u32;
        let mut off_sign: i16 = 1;
        let mut off_hour: u8 = 0;
        let mut i = 0usize;
        let mut valid = false;

        'outer: loop {
            let c = input.get(i).copied().unwrap_or('\0');
            if c.is_ascii_digit() {
                len += 1;
                if len <= 9 {
                    current = current * 10 + (c as u32 - '0' as u32);
                }
                i += 1;
                continue;
            }
            'next: {
                match state {
                    State::Year => {
                        if len != 4 || c != '-' {
                            break 'outer;
                        }
                        value.date.year = current as u16;
                        state = State::Month;
                        break 'next;
                    }
                    State::Month => {
                        let m = current as u8;
                        if len != 2 || c != '-' || m < 1 || m > 12 {
                            break 'outer;
                        }
                        value.date.month = m;
                        state = State::Day;
                        break 'next;
                    }
                    State::Day => {
                        let d = current as u8;
                        if len != 2 || d < 1 || d > days_in_month(value.date.year, value.date.month)
                        {
                            break 'outer;
                        }
                        value.date.day = d;
                        value.flags |= HAS_DATE;
                        if c == 'T' || c == 't' {
                            state = State::Hour;
                            break 'next;
                        } else if c == ' '
                            && input.get(i + 1).is_some_and(|c| c.is_ascii_digit())
                        {
                            state = State::Hour;
                            break 'next;
                        } else {
                            valid = true;
                            break 'outer;
                        }
                    }
                    State::Hour => {
                        let h = current as u8;
                        if len != 2 || c != ':' || h > 23 {
                            break 'outer;
                        }
                        value.hour = h;
                        state = State::Minute;
                        break 'next;
                    }
                    State::Minute => {
                        let m = current as u8;
                        if len != 2 || m > 59 {
                            break 'outer;
                        }
                        value.minute = m;
                        value.flags |= HAS_TIME;
                        if c == ':' {
                            state = State::Second;
                            break 'next;
                        }
                        // fall through to the offset check
                    }
                    State::Second => {
                        let s = current as u8;
                        // 60 is allowed for the leap-second rule.
                        if len != 2 || s > 60 {
                            break 'outer;
                        }
                        value.seconds = s;
                        value.flags |= HAS_SECONDS;
                        if c == '.' {
                            state = State::Frac;
                            break 'next;
                        }
                        // fall through to the offset check
                    }
                    State::Frac => {
                        if len == 0 {
                            break 'outer;
                        }
                        let nd = if len > 9 { 9u8 } else { len as u8 };
                        let mut nanos = current;
                        let mut s = nd;
                        while s < 9 {
                            nanos *= 10;
                            s += 1;
                        }
                        value.nanos = nanos;
                        value.flags |= nd << NANO_SHIFT;
                        // fall through to the offset check
                    }
                    State::OffHour => {
                        let h = current as u8;
                        if len != 2 || c != ':' || h > 23 {
                            break 'outer;
                        }
                        off_hour = h;
                        state = State::OffMin;
                        break 'next;
                    }
                    State::OffMin => {
                        if len != 2 || current > 59 {
                            break 'outer;
                        }
                        value.offset_minutes = off_sign * (off_hour as i16 * 60 + current as i16);
                        valid = true;
                        break 'outer;
                    }
                }
                match c {
                    'Z' | 'z' => {
                        value.offset_minutes = i16::MAX;
                        i += 1;
                        valid = true;
                        break 'outer;
                    }
                    '+' => {
                        off_sign = 1;
                        state = State::OffHour;
                    }
                    '-' => {
                        off_sign = -1;
                        state = State::OffHour;
                    }
                    _ => {
                        valid = true;
                        break 'outer;
                    }
                }
            }
            i += 1;
            current = 0;
            len = 0;
        }
        if !valid || (value.flags & HAS_DATE == 0 && value.offset_minutes != OFFSET_NONE) {
            return None;
        }
        Some((i, value))
    }

    /// Which annotated-output tag this value carries.
    pub fn type_str(&self) -> &'static str {
        let has_date = self.flags & HAS_DATE != 0;
        let has_time = self.flags & HAS_TIME != 0;
        match (has_date, has_time, self.offset_minutes != OFFSET_NONE) {
            (true, true, true) => "datetime",
            (true, true, false) => "datetime-local",
            (true, false, _) => "date-local",
            (false, ..) => "time-local",
        }
    }

    pub fn date(&self) -> Option<Date> {
        if self.flags & HAS_DATE != 0 {
            Some(self.date)
        } else {
            None
        }
    }

    pub fn time(&self) -> Option<Time> {
        if self.flags & HAS_TIME != 0 {
            Some(Time {
                hour: self.hour,
                minute: self.minute,
                second: self.seconds,
                nanosecond: self.nanos,
            })
        } else {
            None
        }
    }

    pub fn offset(&self) -> Option<Offset> {
        match self.offset_minutes {
            i16::MAX => Some(Offset::Z),
            OFFSET_NONE => None,
            minutes => Some(Offset::Custom { minutes }),
        }
    }

    /// Number of digits in the original fractional seconds, 0 if none.
    pub fn subsecond_precision(&self) -> u8 {
        self.flags >> NANO_SHIFT
    }

    /// Whether seconds were explicitly present in the input, as opposed to
    /// the `00` default.
    pub fn has_seconds(&self) -> bool {
        self.flags & HAS_SECONDS != 0
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.flags & HAS_DATE != 0 {
            write!(
                f,
                "{:04}-{:02}-{:02}",
                self.date.year, self.date.month, self.date.day
            )?;
            if self.flags & HAS_TIME != 0 {
                f.write_str("T")?;
            }
        }
        if self.flags & HAS_TIME != 0 {
            write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.seconds)?;
            let nd = self.subsecond_precision() as usize;
            if nd > 0 {
                let frac = format!("{:09}", self.nanos);
                write!(f, ".{}", &frac[..nd])?;
            }
            match self.offset_minutes {
                OFFSET_NONE => {}
                i16::MAX => f.write_str("Z")?,
                minutes => {
                    let (sign, abs) = if minutes < 0 {
                        ('-', (-minutes) as u16)
                    } else {
                        ('+', minutes as u16)
                    };
                    write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
