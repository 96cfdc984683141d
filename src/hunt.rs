//! Trying the candidates nearest first until the checker accepts one

use std::fmt;

use geocheck_types::Point;
use tracing::{debug, info, warn};

use crate::{
    ledger::{Ledger, LedgerError},
    operator::{Remediation, RemediationError},
    remote::{CheckError, Checker, Verdict},
    search::search,
};

/// Failure that stops the search
#[derive(Debug, thiserror::Error)]
pub enum HuntError {
    /// The checker failed
    #[error(transparent)]
    Check(#[from] CheckError),
    /// The ledger failed
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// The operator cannot change the network identity
    #[error(transparent)]
    Remediation(#[from] RemediationError),
    /// The configured number of rate limit waits is used up
    #[error("still rate limited after {waits} network identity changes while checking {point}")]
    RateLimitExhausted {
        /// The point being checked
        point: Point,
        /// Network identity changes done for the point
        waits: u32,
    },
}

/// The final result of a search
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The checker accepted the point
    Found(Point),
    /// Every candidate was rejected
    NotFound,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(point) => write!(f, "{point}"),
            Self::NotFound => write!(f, "Not found"),
        }
    }
}

/// How a single candidate ended up
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// Found in the ledger, the checker was not asked
    AlreadyChecked,
    /// Rejected and recorded
    Rejected,
    /// The solution
    Accepted,
}

/// The submission loop: one candidate at a time,
/// with the rate limits waited out by the operator.
#[derive(Debug)]
pub struct Hunter<C, L, R> {
    checker: C,
    ledger: L,
    remediation: R,
    max_rate_limit_waits: Option<u32>,
}

impl<C, L, R> Hunter<C, L, R>
where
    C: Checker,
    L: Ledger,
    R: Remediation,
{
    /// Hunter waiting for the operator after every rate limit
    pub const fn new(checker: C, ledger: L, remediation: R) -> Self {
        Self {
            checker,
            ledger,
            remediation,
            max_rate_limit_waits: None,
        }
    }

    /// Give up on a point after that many rate limits in a row (unbounded by default)
    #[must_use]
    pub fn with_max_rate_limit_waits(mut self, waits: Option<u32>) -> Self {
        self.max_rate_limit_waits = waits;
        self
    }

    /// The checker the guesses are submitted to
    pub const fn checker(&self) -> &C {
        &self.checker
    }

    /// The record of the rejected points
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Give back the checker, the ledger and the remediation
    pub fn into_parts(self) -> (C, L, R) {
        (self.checker, self.ledger, self.remediation)
    }

    /// Check every grid point closer than `max_distance` meters to the `center`,
    /// nearest first, stopping at the first accepted one.
    ///
    /// # Errors
    /// Any failure of the checker, the ledger or the operator remediation
    /// stops the search. The points rejected so far stay in the ledger.
    pub fn hunt(&mut self, center: &Point, max_distance: f64) -> Result<Outcome, HuntError> {
        let candidates = search(center, max_distance);
        info!(
            center = %center,
            max_distance,
            candidates = candidates.len(),
            "Starting the search"
        );
        self.hunt_candidates(candidates)
    }

    /// Try the given candidates in order, stopping at the first accepted one.
    ///
    /// # Errors
    /// See [`Hunter::hunt`].
    pub fn hunt_candidates<I>(&mut self, candidates: I) -> Result<Outcome, HuntError>
    where
        I: IntoIterator<Item = Point>,
    {
        for point in candidates {
            if self.attempt(&point)? == Attempt::Accepted {
                return Ok(Outcome::Found(point));
            }
        }
        Ok(Outcome::NotFound)
    }

    /// Process a single candidate to the end.
    ///
    /// A rate-limited guess is retried after the operator remediation
    /// until the checker gives a definite answer.
    /// A rejected point is recorded in the ledger.
    ///
    /// # Errors
    /// See [`Hunter::hunt`].
    pub fn attempt(&mut self, point: &Point) -> Result<Attempt, HuntError> {
        if self.ledger.contains(point)? {
            debug!(point = %point, "Point already checked, skipping");
            return Ok(Attempt::AlreadyChecked);
        }

        let mut waits = 0;
        loop {
            match self.checker.check(point)? {
                Verdict::Accepted => {
                    info!(point = %point, "Solution found");
                    return Ok(Attempt::Accepted);
                }
                Verdict::Rejected => {
                    info!(point = %point, "Solution incorrect");
                    self.ledger.record(point)?;
                    return Ok(Attempt::Rejected);
                }
                Verdict::RateLimited => {
                    if self.max_rate_limit_waits.is_some_and(|max| waits >= max) {
                        return Err(HuntError::RateLimitExhausted {
                            point: *point,
                            waits,
                        });
                    }
                    warn!(point = %point, waits, "Used all the attempts on this server");
                    self.remediation.await_rotation()?;
                    waits += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use crate::ledger::MemoryLedger;

    use super::*;

    /// Replies with the scripted verdicts, then rejects everything
    #[derive(Debug, Default)]
    struct Scripted {
        replies: VecDeque<Verdict>,
        asked: Vec<Point>,
    }

    impl Scripted {
        fn new(replies: impl IntoIterator<Item = Verdict>) -> Self {
            Self {
                replies: replies.into_iter().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Checker for Scripted {
        fn check(&mut self, point: &Point) -> Result<Verdict, CheckError> {
            self.asked.push(*point);
            Ok(self.replies.pop_front().unwrap_or(Verdict::Rejected))
        }
    }

    #[derive(Debug, Default)]
    struct Rotations(u32);

    impl Remediation for Rotations {
        fn await_rotation(&mut self) -> Result<(), RemediationError> {
            self.0 += 1;
            Ok(())
        }
    }

    struct Unreachable;

    impl Checker for Unreachable {
        fn check(&mut self, _: &Point) -> Result<Verdict, CheckError> {
            Err(CheckError::CaptchaMissing)
        }
    }

    fn point(s: &str) -> Point {
        s.parse().unwrap()
    }

    #[test]
    fn rejected_point_is_recorded() {
        let p = point("S41 16.814 E173 14.980");
        let mut hunter = Hunter::new(Scripted::default(), MemoryLedger::new(), Rotations(0));

        assert_eq!(hunter.attempt(&p).unwrap(), Attempt::Rejected);
        assert_eq!(hunter.ledger().entries(), &[p]);
    }

    #[test]
    fn second_attempt_does_not_reach_the_checker() {
        let p = point("S41 16.814 E173 14.980");
        let mut hunter = Hunter::new(Scripted::default(), MemoryLedger::new(), Rotations(0));

        assert_eq!(hunter.attempt(&p).unwrap(), Attempt::Rejected);
        assert_eq!(hunter.attempt(&p).unwrap(), Attempt::AlreadyChecked);
        assert_eq!(hunter.checker().asked, vec![p]);
    }

    #[test]
    fn accepted_point_is_not_recorded() {
        let p = point("S41 16.814 E173 14.980");
        let mut hunter = Hunter::new(
            Scripted::new([Verdict::Accepted]),
            MemoryLedger::new(),
            Rotations(0),
        );

        assert_eq!(hunter.attempt(&p).unwrap(), Attempt::Accepted);
        assert!(hunter.ledger().entries().is_empty());
    }

    #[test]
    fn rate_limit_retries_the_same_point() {
        let p = point("S41 16.814 E173 14.980");
        let mut hunter = Hunter::new(
            Scripted::new([Verdict::RateLimited, Verdict::RateLimited, Verdict::Accepted]),
            MemoryLedger::new(),
            Rotations(0),
        );

        assert_eq!(hunter.attempt(&p).unwrap(), Attempt::Accepted);
        let (checker, ledger, rotations) = hunter.into_parts();
        assert_eq!(checker.asked, vec![p, p, p]);
        assert_eq!(rotations.0, 2);
        assert!(ledger.entries().is_empty());
    }

    #[test]
    fn bounded_rate_limit_waits() {
        let p = point("S41 16.814 E173 14.980");
        let mut hunter = Hunter::new(
            Scripted::new([Verdict::RateLimited; 5]),
            MemoryLedger::new(),
            Rotations(0),
        )
        .with_max_rate_limit_waits(Some(2));

        let err = hunter.attempt(&p).unwrap_err();
        assert!(matches!(
            err,
            HuntError::RateLimitExhausted { point, waits: 2 } if point == p
        ));
        let (checker, ledger, rotations) = hunter.into_parts();
        assert_eq!(checker.asked.len(), 3);
        assert_eq!(rotations.0, 2);
        assert!(ledger.entries().is_empty());
    }

    #[test]
    fn remediation_failure_stops_the_search() {
        struct Closed;
        impl Remediation for Closed {
            fn await_rotation(&mut self) -> Result<(), RemediationError> {
                Err(RemediationError::Closed)
            }
        }

        let mut hunter = Hunter::new(
            Scripted::new([Verdict::RateLimited]),
            MemoryLedger::new(),
            Closed,
        );
        let err = hunter
            .hunt(&point("S41 16.814 E173 14.980"), 5.0)
            .unwrap_err();
        assert!(matches!(
            err,
            HuntError::Remediation(RemediationError::Closed)
        ));
    }

    #[test]
    fn checker_failure_is_propagated() {
        let mut hunter = Hunter::new(Unreachable, MemoryLedger::new(), Rotations(0));
        let err = hunter
            .hunt(&point("S41 16.814 E173 14.980"), 5.0)
            .unwrap_err();
        assert!(matches!(err, HuntError::Check(CheckError::CaptchaMissing)));
        assert!(hunter.ledger().entries().is_empty());
    }

    #[test]
    fn skips_the_previously_checked_points() {
        let center = point("S41 16.814 E173 14.980");
        let mut ledger = MemoryLedger::new();
        ledger.record(&center).unwrap();

        let mut hunter = Hunter::new(
            Scripted::new([Verdict::Accepted]),
            ledger,
            Rotations(0),
        );
        let outcome = hunter.hunt(&center, 5.0).unwrap();

        let second = search(&center, 5.0)[1];
        assert_eq!(outcome, Outcome::Found(second));
        assert_eq!(hunter.checker().asked, vec![second]);
    }

    #[test]
    fn empty_candidates() {
        let mut hunter = Hunter::new(Scripted::default(), MemoryLedger::new(), Rotations(0));
        assert_eq!(hunter.hunt_candidates(Vec::new()).unwrap(), Outcome::NotFound);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(Outcome::NotFound.to_string(), "Not found");
        assert_eq!(
            Outcome::Found(point("S41 16.814 E173 14.980")).to_string(),
            "S41 16.814 E173 14.980"
        );
    }
}
