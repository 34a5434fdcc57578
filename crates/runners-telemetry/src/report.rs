//! Single-line rendering of an error together with its source chain.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Extension trait for formatting an error with its source chain.
pub trait ReportExt {
    /// Display this error followed by every cause, separated by `: `.
    fn report(&self) -> impl Display;
}

impl<E> ReportExt for E
where
    E: Error,
{
    fn report(&self) -> impl Display {
        Report(self)
    }
}

struct Report<'a, E: ?Sized>(&'a E);

impl<E: Error + ?Sized> Display for Report<'_, E> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)?;
        let mut cause = self.0.source();
        while let Some(error) = cause {
            write!(formatter, ": {error}")?;
            cause = error.source();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TelemetryError;
    use std::io;

    #[derive(Debug)]
    struct Wrapped(io::Error);

    impl Display for Wrapped {
        fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
            formatter.write_str("loading key failed")
        }
    }

    impl Error for Wrapped {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn report_appends_every_cause() {
        let err = Wrapped(io::Error::new(io::ErrorKind::NotFound, "No such file"));
        assert_eq!(err.report().to_string(), "loading key failed: No such file");
    }

    #[test]
    fn report_without_cause_is_plain_display() {
        let err = io::Error::other("listener closed");
        assert_eq!(err.report().to_string(), "listener closed");
    }

    #[test]
    fn telemetry_errors_report_their_source() {
        let err = TelemetryError::MetricsEncode {
            source: prometheus::Error::Msg("bad label".to_string()),
        };
        assert_eq!(err.report().to_string(), "failed to encode metrics: bad label");
    }
}
