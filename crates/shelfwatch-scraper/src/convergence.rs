//! Scroll-until-stable loading of lazily rendered product lists.

use std::time::Duration;

use crate::error::ScraperError;
use crate::session::{PageSession, ScrollStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergencePolicy {
    /// Pause after each scroll before recounting.
    pub scroll_delay: Duration,
    /// Consecutive rounds without growth that end the loop.
    pub max_no_change_rounds: u32,
    /// Hard cap on scroll rounds; `None` scrolls until stable.
    pub max_rounds: Option<u32>,
}

impl Default for ConvergencePolicy {
    fn default() -> Self {
        Self {
            scroll_delay: Duration::from_millis(1500),
            max_no_change_rounds: 6,
            max_rounds: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceOutcome {
    /// The count stopped growing for the configured number of rounds.
    Stable,
    /// `max_rounds` was hit while the count was still growing.
    RoundCapReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergenceReport {
    /// Scroll rounds performed.
    pub rounds: u32,
    pub final_count: usize,
    pub outcome: ConvergenceOutcome,
}

/// Scrolls one viewport at a time until the number of `selector` matches
/// stops growing for `policy.max_no_change_rounds` consecutive rounds.
///
/// A shrinking count is treated the same as an unchanged one; the reported
/// `final_count` is the highest count observed.
///
/// # Errors
///
/// Propagates any session error from counting or scrolling.
pub async fn stabilize<S: PageSession>(
    session: &S,
    selector: &str,
    policy: &ConvergencePolicy,
) -> Result<ConvergenceReport, ScraperError> {
    let mut previous = session.count(selector).await?;
    let mut no_change = 0u32;
    let mut rounds = 0u32;
    tracing::debug!(selector, initial = previous, "starting scroll convergence");

    while no_change < policy.max_no_change_rounds {
        if policy.max_rounds.is_some_and(|cap| rounds >= cap) {
            tracing::warn!(
                rounds,
                count = previous,
                "scroll round cap reached before the product list stabilized"
            );
            return Ok(ConvergenceReport {
                rounds,
                final_count: previous,
                outcome: ConvergenceOutcome::RoundCapReached,
            });
        }

        session.scroll(ScrollStep::Viewport).await?;
        if !policy.scroll_delay.is_zero() {
            tokio::time::sleep(policy.scroll_delay).await;
        }
        let current = session.count(selector).await?;
        rounds += 1;

        if current > previous {
            tracing::debug!(round = rounds, count = current, "product count grew");
            previous = current;
            no_change = 0;
        } else {
            no_change += 1;
        }
    }

    tracing::info!(rounds, count = previous, "product list stabilized");
    Ok(ConvergenceReport {
        rounds,
        final_count: previous,
        outcome: ConvergenceOutcome::Stable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fake::{Call, FakeSession};

    const SEL: &str = "li.product";

    fn policy(max_no_change_rounds: u32, max_rounds: Option<u32>) -> ConvergencePolicy {
        ConvergencePolicy {
            scroll_delay: Duration::ZERO,
            max_no_change_rounds,
            max_rounds,
        }
    }

    #[tokio::test]
    async fn empty_page_stops_after_no_change_rounds() {
        let session = FakeSession::new().with_counts(&[0]);
        let report = stabilize(&session, SEL, &policy(6, None)).await.unwrap();

        assert_eq!(report.rounds, 6);
        assert_eq!(report.final_count, 0);
        assert_eq!(report.outcome, ConvergenceOutcome::Stable);
        assert_eq!(session.scroll_count(), 6);
        assert!(session
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Scroll(_)))
            .all(|c| *c == Call::Scroll(ScrollStep::Viewport)));
    }

    #[tokio::test]
    async fn growth_resets_the_no_change_counter() {
        let session = FakeSession::new().with_counts(&[10, 12, 12, 15, 15, 15, 15]);
        let report = stabilize(&session, SEL, &policy(3, None)).await.unwrap();

        // 12 grows, 12 stalls, 15 grows, then three stalls.
        assert_eq!(report.rounds, 6);
        assert_eq!(report.final_count, 15);
        assert_eq!(report.outcome, ConvergenceOutcome::Stable);
    }

    #[tokio::test]
    async fn shrinking_count_counts_as_no_change() {
        let session = FakeSession::new().with_counts(&[20, 18, 18]);
        let report = stabilize(&session, SEL, &policy(2, None)).await.unwrap();

        assert_eq!(report.rounds, 2);
        assert_eq!(report.final_count, 20);
    }

    #[tokio::test]
    async fn round_cap_stops_unbounded_growth() {
        let counts: Vec<usize> = (0..100).collect();
        let session = FakeSession::new().with_counts(&counts);
        let report = stabilize(&session, SEL, &policy(6, Some(5))).await.unwrap();

        assert_eq!(report.rounds, 5);
        assert_eq!(report.final_count, 5);
        assert_eq!(report.outcome, ConvergenceOutcome::RoundCapReached);
        assert_eq!(session.scroll_count(), 5);
    }

    #[tokio::test]
    async fn round_cap_not_reported_when_stable_first() {
        let session = FakeSession::new().with_counts(&[3]);
        let report = stabilize(&session, SEL, &policy(2, Some(10))).await.unwrap();

        assert_eq!(report.rounds, 2);
        assert_eq!(report.outcome, ConvergenceOutcome::Stable);
    }

    #[tokio::test]
    async fn counts_the_given_selector_each_round() {
        let session = FakeSession::new().with_counts(&[1]);
        stabilize(&session, SEL, &policy(1, None)).await.unwrap();

        let counted = session
            .calls()
            .into_iter()
            .filter(|c| matches!(c, crate::session::fake::Call::Count(s) if s == SEL))
            .count();
        assert_eq!(counted, 2);
    }
}
