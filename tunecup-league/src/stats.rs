//! Derived league statistics
//!
//! Everything here is recomputed from the stores on every call. Each
//! statistic builds a fresh [`Tally`] over the full vote collection and
//! picks from it with first-seen tie-breaking.

use crate::league::{average, League};
use crate::tally::{select_first, Extreme, Leader, Tally};
use serde::Serialize;
use tracing::debug;
use tunecup_common::{Competitor, Submission};

/// Average points per submission for one competitor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorAverage {
    pub competitor_id: String,
    pub submissions: usize,
    pub total_points: u64,
    pub average: f64,
}

/// A competitor's highest scoring submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestSubmission {
    pub submission: Submission,
    pub points: u64,
}

/// Per-competitor bundle of derived statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorProfile {
    pub competitor_id: String,
    /// `None` when the id does not resolve to a competitor
    pub competitor: Option<Competitor>,
    /// Numeric points received (the leaderboard score)
    pub total_points_received: u64,
    /// Vote records received, whatever their points value
    pub vote_count_received: usize,
    pub rounds_participated: usize,
    pub avg_points_per_round: f64,
    pub best_submission: Option<BestSubmission>,
    /// Submitter this competitor voted for most often
    pub most_often_voted_for: Option<Leader>,
    /// Voter who voted on this competitor most often
    pub most_often_voted_from: Option<Leader>,
    pub most_points_given_to: Option<Leader>,
    pub most_points_received_from: Option<Leader>,
    /// Voter id → points given to this competitor
    pub points_received_by_voter: Tally,
    /// Submitter id → points this competitor gave them
    pub points_given_to_submitter: Tally,
}

/// League-wide superlatives
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueSummary {
    pub most_voted_submission: Option<Leader>,
    pub highest_scoring_submission: Option<Leader>,
    pub most_generous_voter: Option<Leader>,
    pub most_critical_voter: Option<Leader>,
    pub average_points_per_competitor: Vec<CompetitorAverage>,
}

/// Statistics over a borrowed [`League`]
#[derive(Debug, Clone, Copy)]
pub struct LeagueStats<'a> {
    league: &'a League,
}

impl<'a> LeagueStats<'a> {
    pub fn new(league: &'a League) -> Self {
        Self { league }
    }

    /// Submission with the most vote records, counted regardless of points
    pub fn most_voted_submission(&self) -> Option<Leader> {
        Tally::count(
            self.league
                .votes()
                .get_all()
                .iter()
                .map(|v| v.track_ref.as_str()),
        )
        .max()
    }

    /// Submission with the highest numeric point total
    pub fn highest_scoring_submission(&self) -> Option<Leader> {
        Tally::sum(
            self.league
                .votes()
                .get_all()
                .iter()
                .filter_map(|v| Some((v.track_ref.as_str(), v.points()?))),
        )
        .max()
    }

    /// Points per submission for every competitor with submissions
    ///
    /// Competitors without submissions are left out, not reported as zero.
    pub fn average_points_per_competitor(&self) -> Vec<CompetitorAverage> {
        self.league
            .competitors()
            .get_all()
            .iter()
            .filter_map(|competitor| {
                let submissions = self.league.submissions_of(&competitor.id);
                if submissions.is_empty() {
                    return None;
                }
                let total_points: u64 = submissions
                    .iter()
                    .map(|s| self.league.submission_points(&s.track_ref))
                    .fold(0, u64::saturating_add);
                Some(CompetitorAverage {
                    competitor_id: competitor.id.clone(),
                    submissions: submissions.len(),
                    total_points,
                    average: average(total_points, submissions.len()),
                })
            })
            .collect()
    }

    /// Voter who handed out the most numeric points
    pub fn most_generous_voter(&self) -> Option<Leader> {
        self.points_given_by_voter().max()
    }

    /// Voter who handed out the fewest numeric points
    ///
    /// Voters whose votes are all non-numeric are not considered.
    pub fn most_critical_voter(&self) -> Option<Leader> {
        self.points_given_by_voter().min()
    }

    fn points_given_by_voter(&self) -> Tally {
        Tally::sum(
            self.league
                .votes()
                .get_all()
                .iter()
                .filter_map(|v| Some((v.voter_id.as_str(), v.points()?))),
        )
    }

    pub fn summary(&self) -> LeagueSummary {
        LeagueSummary {
            most_voted_submission: self.most_voted_submission(),
            highest_scoring_submission: self.highest_scoring_submission(),
            most_generous_voter: self.most_generous_voter(),
            most_critical_voter: self.most_critical_voter(),
            average_points_per_competitor: self.average_points_per_competitor(),
        }
    }

    /// Build the profile of `competitor_id`
    ///
    /// Works for ids that do not resolve to a competitor too; the profile
    /// then just reflects whatever submissions and votes reference the id.
    pub fn competitor_profile(&self, competitor_id: &str) -> CompetitorProfile {
        let league = self.league;
        let total_points_received = league.total_points_received(competitor_id);
        let rounds_participated = league.rounds_participated(competitor_id);

        let best_submission = select_first(
            league.submissions_of(competitor_id),
            Extreme::Max,
            |s| league.submission_points(&s.track_ref),
        )
        .map(|(submission, points)| BestSubmission {
            submission: submission.clone(),
            points,
        });

        // Votes cast: only those whose submission still resolves
        let mut voted_for = Tally::new();
        let mut points_given = Tally::new();
        for vote in league.votes_cast_by(competitor_id) {
            let Some(submission) = league.submission(&vote.track_ref) else {
                continue;
            };
            voted_for.add(&submission.submitter_id, 1);
            if let Some(points) = vote.points() {
                points_given.add(&submission.submitter_id, points);
            }
        }

        // Votes received
        let received = league.votes_cast_on_competitor(competitor_id);
        let voted_from = Tally::count(received.iter().map(|v| v.voter_id.as_str()));
        let points_received = Tally::sum(
            received
                .iter()
                .filter_map(|v| Some((v.voter_id.as_str(), v.points()?))),
        );

        debug!(
            "Profile for {}: {} points from {} votes over {} rounds",
            competitor_id,
            total_points_received,
            received.len(),
            rounds_participated
        );

        CompetitorProfile {
            competitor_id: competitor_id.to_string(),
            competitor: league.competitors().get_by_key(competitor_id).cloned(),
            total_points_received,
            vote_count_received: received.len(),
            rounds_participated,
            avg_points_per_round: average(total_points_received, rounds_participated),
            best_submission,
            most_often_voted_for: voted_for.max(),
            most_often_voted_from: voted_from.max(),
            most_points_given_to: points_given.max(),
            most_points_received_from: points_received.max(),
            points_received_by_voter: points_received.without_zeros(),
            points_given_to_submitter: points_given.without_zeros(),
        }
    }
}
