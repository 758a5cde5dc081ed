use chrono::{FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::{OffsetComponents, OffsetName};
use serde_with::DeserializeFromStr;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::*;

#[derive(Clone, Debug, PartialEq)]
pub struct TzOffset {
    tz: Tz,
    pub utc_offset_secs: i32,
    pub dst_offset_secs: i32,
    pub id: String,
    pub name: Option<String>,
}

impl Offset for TzOffset {
    fn fix(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs + self.dst_offset_secs)
            .unwrap_or_else(|| Utc.fix())
    }
}

impl Display for TzOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name.as_deref().unwrap_or(self.id.as_str()))
    }
}

/// Time zone in which the grid's "current month" is evaluated.
#[derive(Clone, Copy, Debug, Default, DeserializeFromStr, PartialEq)]
pub enum Tz {
    #[default]
    Local,
    Iana(chrono_tz::Tz),
}

impl Tz {
    const LOCAL_ID: &'static str = "Localtime";

    pub fn utc() -> Self {
        Self::Iana(chrono_tz::UTC)
    }

    pub fn id(&self) -> &str {
        match self {
            Tz::Local => Self::LOCAL_ID,
            Tz::Iana(tz) => tz.name(),
        }
    }

    fn local_offset(&self, offset: FixedOffset) -> TzOffset {
        TzOffset {
            tz: *self,
            utc_offset_secs: offset.local_minus_utc(),
            dst_offset_secs: 0,
            id: Self::LOCAL_ID.to_owned(),
            name: None,
        }
    }

    fn iana_offset<O: OffsetComponents + OffsetName>(&self, offset: &O) -> TzOffset {
        TzOffset {
            tz: *self,
            utc_offset_secs: offset.base_utc_offset().num_seconds() as i32,
            dst_offset_secs: offset.dst_offset().num_seconds() as i32,
            id: offset.tz_id().to_owned(),
            name: Some(offset.abbreviation().to_owned()),
        }
    }
}

impl TimeZone for Tz {
    type Offset = TzOffset;

    fn from_offset(offset: &Self::Offset) -> Self {
        offset.tz
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<Self::Offset> {
        match self {
            Tz::Local => chrono::Local
                .offset_from_local_date(local)
                .map(|offs| self.local_offset(offs)),
            Tz::Iana(tz) => tz
                .offset_from_local_date(local)
                .map(|offs| self.iana_offset(&offs)),
        }
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<Self::Offset> {
        match self {
            Tz::Local => chrono::Local
                .offset_from_local_datetime(local)
                .map(|offs| self.local_offset(offs)),
            Tz::Iana(tz) => tz
                .offset_from_local_datetime(local)
                .map(|offs| self.iana_offset(&offs)),
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> Self::Offset {
        match self {
            Tz::Local => self.local_offset(chrono::Local.offset_from_utc_date(utc)),
            Tz::Iana(tz) => self.iana_offset(&tz.offset_from_utc_date(utc)),
        }
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> Self::Offset {
        match self {
            Tz::Local => self.local_offset(chrono::Local.offset_from_utc_datetime(utc)),
            Tz::Iana(tz) => self.iana_offset(&tz.offset_from_utc_datetime(utc)),
        }
    }
}

impl FromStr for Tz {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let lowercase = s.to_lowercase();

        if matches!(lowercase.as_str(), "localtime" | "local") {
            Ok(Tz::Local)
        } else if let Ok(tz) = s.parse::<chrono_tz::Tz>() {
            Ok(Tz::Iana(tz))
        } else {
            Err(Error::new(
                ErrorKind::TimezoneParse,
                &format!("Timezone '{}' not recognized", s),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iana_tz() {
        let dt = NaiveDate::from_ymd_opt(2020, 9, 8)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let chronotz = "Europe/Berlin"
            .parse::<chrono_tz::Tz>()
            .expect("'Europe/Berlin' is a valid IANA timezone");

        let tz = Tz::Iana(chronotz);

        assert_eq!(
            chronotz.from_utc_datetime(&dt).naive_local(),
            tz.from_utc_datetime(&dt).naive_local()
        );
        assert_eq!(tz.id(), "Europe/Berlin");
    }

    #[test]
    fn parse_local_and_iana() {
        assert_eq!("local".parse::<Tz>().unwrap(), Tz::Local);
        assert_eq!("Localtime".parse::<Tz>().unwrap(), Tz::Local);
        assert_eq!("UTC".parse::<Tz>().unwrap(), Tz::utc());
    }

    #[test]
    fn reject_unknown_tz() {
        let err = "Mars/Olympus_Mons".parse::<Tz>().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TimezoneParse));
    }
}
