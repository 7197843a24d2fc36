use chrono::NaiveDate;
use toml::value::Datetime;

/// Calendar date carried by a TOML datetime literal.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TomlDate(pub NaiveDate);

impl TryFrom<&Datetime> for TomlDate {
    type Error = String;

    fn try_from(value: &Datetime) -> Result<Self, Self::Error> {
        // A local time (`10:00:00`) has no date part
        let Some(date) = value.date else {
            return Err(format!("{} has no date part", value));
        };

        match NaiveDate::from_ymd_opt(date.year as i32, date.month as u32, date.day as u32) {
            Some(naive) => Ok(Self(naive)),
            None => Err(format!("{} is not a valid calendar date", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime_of(src: &str) -> Datetime {
        let table: toml::Table = toml::from_str(src).unwrap();
        match table.get("published_at") {
            Some(toml::Value::Datetime(dt)) => *dt,
            other => panic!("not a datetime: {:?}", other),
        }
    }

    #[test]
    fn test_local_date() {
        let dt = datetime_of("published_at = 2024-04-22");
        let date = TomlDate::try_from(&dt).unwrap();
        assert_eq!(date, TomlDate(NaiveDate::from_ymd_opt(2024, 4, 22).unwrap()));
    }

    #[test]
    fn test_offset_datetime_keeps_date() {
        let dt = datetime_of("published_at = 2021-06-01T23:30:00Z");
        let date = TomlDate::try_from(&dt).unwrap();
        assert_eq!(date.0, NaiveDate::from_ymd_opt(2021, 6, 1).unwrap());
    }

    #[test]
    fn test_local_time_is_rejected() {
        let dt = datetime_of("published_at = 10:00:00");
        assert!(TomlDate::try_from(&dt).is_err());
    }
}
