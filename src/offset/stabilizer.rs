//! Current-SCN stabilization
//!
//! A snapshot offset must not be pinned to an SCN that the database's
//! SCN-to-time mapping buckets together with a recent schema-defining
//! change: schema visibility and data visibility could then race when
//! streaming resumes. The stabilizer re-samples the current SCN until
//! it lands outside the reference change's timestamp bucket, or until
//! two consecutive samples disagree, whichever the database reports
//! first.

use std::thread;
use std::time::Duration;

use crate::config::StabilizationConfig;
use crate::db::{DatabaseSession, DbResult, QueryScope};
use crate::scn::Scn;

use super::errors::{OffsetError, OffsetResult};

/// Re-samples the current SCN until it diverges from a reference point.
pub struct SequenceNumberStabilizer {
    max_attempts: Option<u32>,
    pause: Duration,
}

impl SequenceNumberStabilizer {
    /// Creates a stabilizer with the given bounds.
    pub fn new(config: &StabilizationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            pause: config.pause,
        }
    }

    /// Samples the current SCN until it settles away from `reference`.
    ///
    /// Returns the first sample that either leaves the reference's
    /// timestamp bucket or differs from the previous sample. `None`
    /// passes through: a database that reports no current SCN has
    /// nothing to stabilize, and the caller decides how fatal that is.
    pub fn stabilize<S: DatabaseSession>(
        &self,
        session: &mut S,
        scope: QueryScope,
        reference: Option<Scn>,
    ) -> OffsetResult<Option<Scn>> {
        let mut previous: Option<Scn> = None;
        let mut attempts: u32 = 0;
        loop {
            let current = session.current_scn(scope)?;
            if !Self::in_transition(session, reference, previous, current)? {
                return Ok(current);
            }
            previous = current;
            self.next_attempt(&mut attempts)?;
        }
    }

    /// Returns whether the sampled value is still in transition relative
    /// to the reference: same timestamp bucket as the reference, and not
    /// yet diverged from the previous sample.
    ///
    /// A missing reference or missing sample is never in transition.
    pub(crate) fn in_transition<S: DatabaseSession>(
        session: &mut S,
        reference: Option<Scn>,
        previous: Option<Scn>,
        current: Option<Scn>,
    ) -> DbResult<bool> {
        let (Some(reference), Some(current)) = (reference, current) else {
            return Ok(false);
        };
        if let Some(previous) = previous {
            if previous != current {
                return Ok(false);
            }
        }
        session.scn_timestamps_match(reference, current)
    }

    /// Accounts for one completed sample: enforces the attempt bound,
    /// then pauses before the next round trip.
    pub(crate) fn next_attempt(&self, attempts: &mut u32) -> OffsetResult<()> {
        *attempts += 1;
        if let Some(bound) = self.max_attempts {
            if *attempts >= bound {
                return Err(OffsetError::StabilizationExceeded { attempts: bound });
            }
        }
        if !self.pause.is_zero() {
            thread::sleep(self.pause);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mock::ScriptedDatabase;
    use crate::db::SessionFactory;

    fn unbounded() -> SequenceNumberStabilizer {
        SequenceNumberStabilizer::new(&StabilizationConfig {
            max_attempts: None,
            pause: Duration::ZERO,
        })
    }

    fn bounded(attempts: u32) -> SequenceNumberStabilizer {
        SequenceNumberStabilizer::new(&StabilizationConfig {
            max_attempts: Some(attempts),
            pause: Duration::ZERO,
        })
    }

    #[test]
    fn test_single_sample_outside_bucket_returns_immediately() {
        let db = ScriptedDatabase::new();
        db.state(|s| {
            s.current_scn_samples.push_back(Some(Scn::new(1000)));
            s.timestamp_matches.push_back(false);
        });
        let mut session = db.open_session().unwrap();

        let scn = unbounded()
            .stabilize(&mut session, QueryScope::Instance, Some(Scn::new(900)))
            .unwrap();
        assert_eq!(scn, Some(Scn::new(1000)));
        assert_eq!(db.state(|s| s.current_scn_calls), 1);
    }

    #[test]
    fn test_resamples_while_bucketed_with_reference() {
        let db = ScriptedDatabase::new();
        db.state(|s| {
            s.current_scn_samples.extend([
                Some(Scn::new(1000)),
                Some(Scn::new(1000)),
                Some(Scn::new(1000)),
            ]);
            // Leaves the reference bucket on the third sample.
            s.timestamp_matches.extend([true, true, false]);
        });
        let mut session = db.open_session().unwrap();

        let scn = unbounded()
            .stabilize(&mut session, QueryScope::Instance, Some(Scn::new(999)))
            .unwrap();
        assert_eq!(scn, Some(Scn::new(1000)));
        assert_eq!(db.state(|s| s.current_scn_calls), 3);
    }

    #[test]
    fn test_diverging_sample_terminates_even_when_bucketed() {
        let db = ScriptedDatabase::new();
        db.state(|s| {
            s.current_scn_samples
                .extend([Some(Scn::new(1000)), Some(Scn::new(1001))]);
            s.timestamp_matches.extend([true, true]);
        });
        let mut session = db.open_session().unwrap();

        let scn = unbounded()
            .stabilize(&mut session, QueryScope::Instance, Some(Scn::new(999)))
            .unwrap();
        // The second sample differs from the first, so sampling stops
        // without consulting the timestamp bucket again.
        assert_eq!(scn, Some(Scn::new(1001)));
    }

    #[test]
    fn test_no_reference_accepts_first_sample() {
        let db = ScriptedDatabase::new();
        db.state(|s| s.current_scn_samples.push_back(Some(Scn::new(500))));
        let mut session = db.open_session().unwrap();

        let scn = unbounded()
            .stabilize(&mut session, QueryScope::Instance, None)
            .unwrap();
        assert_eq!(scn, Some(Scn::new(500)));
        // No reference means no timestamp query at all.
        assert_eq!(db.state(|s| s.timestamp_calls), 0);
    }

    #[test]
    fn test_missing_current_scn_passes_through() {
        let db = ScriptedDatabase::new();
        db.state(|s| s.current_scn_samples.push_back(None));
        let mut session = db.open_session().unwrap();

        let scn = unbounded()
            .stabilize(&mut session, QueryScope::Instance, Some(Scn::new(900)))
            .unwrap();
        assert_eq!(scn, None);
    }

    #[test]
    fn test_attempt_bound_is_enforced() {
        let db = ScriptedDatabase::new();
        db.state(|s| {
            s.current_scn_samples.push_back(Some(Scn::new(1000)));
            // Never leaves the reference bucket.
            for _ in 0..10 {
                s.timestamp_matches.push_back(true);
            }
        });
        let mut session = db.open_session().unwrap();

        let err = bounded(3)
            .stabilize(&mut session, QueryScope::Instance, Some(Scn::new(999)))
            .unwrap_err();
        assert!(matches!(
            err,
            OffsetError::StabilizationExceeded { attempts: 3 }
        ));
        assert_eq!(db.state(|s| s.current_scn_calls), 3);
    }

    #[test]
    fn test_query_failure_propagates() {
        let db = ScriptedDatabase::new();
        db.state(|s| {
            s.current_scn_error = Some(crate::db::DbError::new("ORA-03113: end-of-file"));
        });
        let mut session = db.open_session().unwrap();

        let err = unbounded()
            .stabilize(&mut session, QueryScope::Instance, None)
            .unwrap_err();
        assert!(err.to_string().contains("ORA-03113"));
    }
}
