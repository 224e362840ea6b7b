use crate::{
    error::Error,
    wire::{
        converters::{object, optional_value},
        field_mapper::read_string,
        FieldPath,
    },
};
use serde_json::{json, Map, Value};
use std::fmt;

const UNSET: &str = "?";
const ANY: &str = "*";

/// Seven fields of the cron-like schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduleFields {
    seconds: String,
    minute: String,
    hour: String,
    day_of_month: String,
    month: String,
    day_of_week: String,
    year: String,
}

impl ScheduleFields {
    fn parse(schedule: &str) -> Result<Self, String> {
        let tokens = schedule.split_whitespace().collect::<Vec<_>>();
        let [seconds, minute, hour, day_of_month, month, day_of_week, year] = tokens.as_slice()
        else {
            return Err(format!(
                "schedule must have exactly 7 fields (seconds, minute, hour, day of month, month, day of week, year), found {}.",
                tokens.len()
            ));
        };

        Ok(Self {
            seconds: seconds.to_string(),
            minute: minute.to_string(),
            hour: hour.to_string(),
            day_of_month: day_of_month.to_string(),
            month: month.to_string(),
            day_of_week: day_of_week.to_string(),
            year: year.to_string(),
        })
    }

    /// Exactly one of the day of month and day of week must be unset with `?`.
    fn validate(&self) -> Result<(), String> {
        match (self.day_of_month == UNSET, self.day_of_week == UNSET) {
            (true, false) | (false, true) => Ok(()),
            (true, true) => {
                Err("day of month and day of week can't both be `?`.".to_string())
            }
            (false, false) => Err(
                "either day of month or day of week must be `?`.".to_string(),
            ),
        }
    }
}

impl fmt::Display for ScheduleFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.seconds,
            self.minute,
            self.hour,
            self.day_of_month,
            self.month,
            self.day_of_week,
            self.year
        )
    }
}

/// Converts the schedule string to the wire schedule object.
pub(crate) fn schedule_to_wire(schedule: &str, path: &FieldPath) -> Result<Value, Error> {
    let fields = ScheduleFields::parse(schedule)
        .and_then(|fields| fields.validate().map(|_| fields))
        .map_err(|message| Error::invariant(path, message))?;

    Ok(json!({
        "time": {
            "seconds": fields.seconds,
            "minute": fields.minute,
            "hour": fields.hour,
        },
        "month": {
            "day": fields.day_of_month,
            "month": fields.month,
        },
        "weekDay": {
            "day": fields.day_of_week,
        },
        "year": {
            "year": fields.year,
        },
    }))
}

/// Reads the schedule string from the wire schedule. Both the structured object and the
/// `crontab` string are accepted. Missing time fields default to `0`, missing month and year to
/// `*`.
pub(crate) fn schedule_from_wire(value: &Value, path: &FieldPath) -> Result<String, Error> {
    let fields = match value {
        Value::String(crontab) => {
            ScheduleFields::parse(crontab).map_err(|message| Error::malformed(path, message))?
        }
        Value::Object(schedule) => match optional_value(schedule, "crontab") {
            Some(crontab) => {
                let crontab_path = path.child("crontab");
                ScheduleFields::parse(&read_string(crontab, &crontab_path)?)
                    .map_err(|message| Error::malformed(&crontab_path, message))?
            }
            None => read_structured(schedule, path)?,
        },
        _ => {
            return Err(Error::malformed(
                path,
                "expected either an object or a string.",
            ))
        }
    };

    fields
        .validate()
        .map_err(|message| Error::malformed(path, message))?;
    Ok(fields.to_string())
}

fn read_structured(schedule: &Map<String, Value>, path: &FieldPath) -> Result<ScheduleFields, Error> {
    let time = nested_object(schedule, "time", path)?;
    let time_path = path.child("time");
    let seconds = nested_string(time, "seconds", &time_path)?;
    let minute = nested_string(time, "minute", &time_path)?;
    let hour = nested_string(time, "hour", &time_path)?;

    // Month is either `{ day, month }` or a plain string with a sibling `dayofmonth { day }`.
    let (mut day_of_month, month) = match optional_value(schedule, "month") {
        Some(Value::Object(month)) => {
            let month_path = path.child("month");
            (
                nested_string(Some(month), "day", &month_path)?,
                nested_string(Some(month), "month", &month_path)?,
            )
        }
        Some(month) => (None, Some(read_string(month, &path.child("month"))?)),
        None => (None, None),
    };
    if day_of_month.is_none() {
        let day_of_month_object = nested_object(schedule, "dayofmonth", path)?;
        day_of_month = nested_string(day_of_month_object, "day", &path.child("dayofmonth"))?;
    }

    let week_day_key = if optional_value(schedule, "weekDay").is_some() {
        "weekDay"
    } else {
        "weekday"
    };
    let day_of_week = nested_string(
        nested_object(schedule, week_day_key, path)?,
        "day",
        &path.child(week_day_key),
    )?;

    let year = match optional_value(schedule, "year") {
        Some(Value::Object(year)) => nested_string(Some(year), "year", &path.child("year"))?,
        Some(year) => Some(read_string(year, &path.child("year"))?),
        None => None,
    };

    let day_of_month = day_of_month.unwrap_or_else(|| {
        if day_of_week.as_deref() == Some(UNSET) {
            ANY.to_string()
        } else {
            UNSET.to_string()
        }
    });
    let day_of_week = day_of_week.unwrap_or_else(|| {
        if day_of_month == UNSET {
            ANY.to_string()
        } else {
            UNSET.to_string()
        }
    });

    Ok(ScheduleFields {
        seconds: seconds.unwrap_or_else(|| "0".to_string()),
        minute: minute.unwrap_or_else(|| "0".to_string()),
        hour: hour.unwrap_or_else(|| "0".to_string()),
        day_of_month,
        month: month.unwrap_or_else(|| ANY.to_string()),
        day_of_week,
        year: year.unwrap_or_else(|| ANY.to_string()),
    })
}

fn nested_object<'w>(
    schedule: &'w Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> Result<Option<&'w Map<String, Value>>, Error> {
    optional_value(schedule, key)
        .map(|value| object(value, &path.child(key)))
        .transpose()
}

fn nested_string(
    object: Option<&Map<String, Value>>,
    key: &str,
    path: &FieldPath,
) -> Result<Option<String>, Error> {
    object
        .and_then(|object| optional_value(object, key))
        .map(|value| read_string(value, &path.child(key)))
        .transpose()
        .map(|value| value.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::{schedule_from_wire, schedule_to_wire};
    use crate::{
        error::{Error, ErrorKind},
        wire::FieldPath,
    };
    use insta::assert_json_snapshot;
    use serde_json::json;

    fn path() -> FieldPath {
        FieldPath::root("job").child("schedule")
    }

    #[test]
    fn converts_to_wire() -> anyhow::Result<()> {
        let wire = schedule_to_wire("0 0 12 ? * * *", &path())?;
        assert_json_snapshot!(wire, @r###"
        {
          "month": {
            "day": "?",
            "month": "*"
          },
          "time": {
            "hour": "12",
            "minute": "0",
            "seconds": "0"
          },
          "weekDay": {
            "day": "*"
          },
          "year": {
            "year": "*"
          }
        }
        "###);
        assert_eq!(schedule_from_wire(&wire, &path())?, "0 0 12 ? * * *");

        let wire = schedule_to_wire("30  15 2 1,15 JAN-JUN ? 2030", &path())?;
        assert_eq!(schedule_from_wire(&wire, &path())?, "30 15 2 1,15 JAN-JUN ? 2030");

        Ok(())
    }

    #[test]
    fn fails_for_invalid_schedules() {
        let error = schedule_to_wire("0 0 12 * *", &path()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::StructuralViolation);
        assert_eq!(
            error.to_string(),
            "`job.schedule`: schedule must have exactly 7 fields (seconds, minute, hour, day of month, month, day of week, year), found 5."
        );

        assert_eq!(
            schedule_to_wire("0 0 12 * * * *", &path()).unwrap_err(),
            Error::invariant("job.schedule", "either day of month or day of week must be `?`.")
        );
        assert_eq!(
            schedule_to_wire("0 0 12 ? * ? *", &path()).unwrap_err(),
            Error::invariant("job.schedule", "day of month and day of week can't both be `?`.")
        );
    }

    #[test]
    fn reads_alternative_shapes() -> anyhow::Result<()> {
        // Missing day of month is unset, unless day of week is already unset.
        let wire = json!({ "time": { "hour": "3" }, "weekday": { "day": "MON-FRI" } });
        assert_eq!(schedule_from_wire(&wire, &path())?, "0 0 3 ? * MON-FRI *");

        let wire = json!({ "time": { "hour": 3 }, "weekDay": { "day": "?" } });
        assert_eq!(schedule_from_wire(&wire, &path())?, "0 0 3 * * ? *");

        let wire = json!({
            "time": { "seconds": "0", "minute": "30", "hour": "4" },
            "month": "*/2",
            "dayofmonth": { "day": "1" },
            "year": "*"
        });
        assert_eq!(schedule_from_wire(&wire, &path())?, "0 30 4 1 */2 ? *");

        let wire = json!({ "crontab": "0 15 10 ? * 6L 2030" });
        assert_eq!(schedule_from_wire(&wire, &path())?, "0 15 10 ? * 6L 2030");
        assert_eq!(
            schedule_from_wire(&json!("0 15 10 ? * 6L *"), &path())?,
            "0 15 10 ? * 6L *"
        );

        Ok(())
    }

    #[test]
    fn fails_for_malformed_wire_schedules() {
        let error = schedule_from_wire(&json!({ "crontab": "0 15 10" }), &path()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedWireInput);
        assert_eq!(error.path(), "job.schedule.crontab");

        let error = schedule_from_wire(
            &json!({ "month": { "day": "1" }, "weekDay": { "day": "MON" } }),
            &path(),
        )
        .unwrap_err();
        assert_eq!(
            error,
            Error::malformed("job.schedule", "either day of month or day of week must be `?`.")
        );

        assert!(schedule_from_wire(&json!(42), &path()).is_err());
        assert!(schedule_from_wire(&json!({ "time": "noon" }), &path()).is_err());
    }
}
