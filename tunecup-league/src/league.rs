//! League aggregator
//!
//! Joins the four record stores on demand. Relationships are soft: a vote
//! may point at a submission that no longer exists, a submission at a
//! deleted round. Queries simply skip what does not resolve.

use crate::tally::Tally;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;
use tunecup_common::config::DataFolder;
use tunecup_common::points::sum_points;
use tunecup_common::{
    Competitor, CompetitorStore, RecordStore, Result, Round, RoundStore, Submission,
    SubmissionStore, Vote, VoteKey, VoteStore,
};

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub competitor: Competitor,
    /// Total numeric points received
    pub score: u64,
    /// Distinct rounds with at least one submission
    pub rounds: usize,
    /// `score / rounds`, or 0 without rounds
    pub avg_score: f64,
}

/// The four record stores of one league
#[derive(Debug)]
pub struct League {
    competitors: CompetitorStore,
    rounds: RoundStore,
    submissions: SubmissionStore,
    votes: VoteStore,
}

impl League {
    pub fn new(
        competitors: CompetitorStore,
        rounds: RoundStore,
        submissions: SubmissionStore,
        votes: VoteStore,
    ) -> Self {
        Self {
            competitors,
            rounds,
            submissions,
            votes,
        }
    }

    /// Open all four stores from JSON files in `folder`
    pub fn open(folder: &DataFolder) -> Result<Self> {
        let league = Self::new(
            RecordStore::open(folder.competitor_storage())?,
            RecordStore::open(folder.round_storage())?,
            RecordStore::open(folder.submission_storage())?,
            RecordStore::open(folder.vote_storage())?,
        );
        debug!(
            "Opened league at {}: {} competitors, {} rounds, {} submissions, {} votes",
            folder.root().display(),
            league.competitors.len(),
            league.rounds.len(),
            league.submissions.len(),
            league.votes.len()
        );
        Ok(league)
    }

    // =========================================================================
    // Store access
    // =========================================================================

    pub fn competitors(&self) -> &CompetitorStore {
        &self.competitors
    }

    pub fn rounds(&self) -> &RoundStore {
        &self.rounds
    }

    pub fn submissions(&self) -> &SubmissionStore {
        &self.submissions
    }

    pub fn votes(&self) -> &VoteStore {
        &self.votes
    }

    pub fn competitors_mut(&mut self) -> &mut CompetitorStore {
        &mut self.competitors
    }

    pub fn rounds_mut(&mut self) -> &mut RoundStore {
        &mut self.rounds
    }

    pub fn submissions_mut(&mut self) -> &mut SubmissionStore {
        &mut self.submissions
    }

    pub fn votes_mut(&mut self) -> &mut VoteStore {
        &mut self.votes
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn competitor_by_name(&self, name: &str) -> Option<&Competitor> {
        self.competitors.get_by_name(name)
    }

    pub fn round_by_name(&self, name: &str) -> Option<&Round> {
        self.rounds.get_by_name(name)
    }

    pub fn submission(&self, track_ref: &str) -> Option<&Submission> {
        self.submissions.get_by_key(track_ref)
    }

    pub fn vote(&self, track_ref: &str, voter_id: &str, round_id: &str) -> Option<&Vote> {
        self.votes
            .get_by_key(&VoteKey::new(track_ref, voter_id, round_id))
    }

    /// Display name for a competitor id, falling back to the raw id when the
    /// competitor no longer exists
    pub fn competitor_name<'a>(&'a self, competitor_id: &'a str) -> &'a str {
        self.competitors
            .get_by_key(competitor_id)
            .map(|c| c.name.as_str())
            .unwrap_or(competitor_id)
    }

    // =========================================================================
    // Relational queries
    // =========================================================================

    pub fn submissions_of(&self, competitor_id: &str) -> Vec<&Submission> {
        self.submissions.get_by_submitter_id(competitor_id)
    }

    pub fn submissions_in(&self, round_id: &str) -> Vec<&Submission> {
        self.submissions.get_by_round_id(round_id)
    }

    pub fn votes_in(&self, round_id: &str) -> Vec<&Vote> {
        self.votes.get_by_round_id(round_id)
    }

    pub fn votes_for(&self, track_ref: &str) -> Vec<&Vote> {
        self.votes.get_by_track_ref(track_ref)
    }

    pub fn votes_cast_by(&self, voter_id: &str) -> Vec<&Vote> {
        self.votes.get_by_voter_id(voter_id)
    }

    /// All votes on any submission made by `competitor_id`
    pub fn votes_cast_on_competitor(&self, competitor_id: &str) -> Vec<&Vote> {
        let track_refs: HashSet<&str> = self
            .submissions_of(competitor_id)
            .into_iter()
            .map(|s| s.track_ref.as_str())
            .collect();
        self.votes
            .find_all(|v| track_refs.contains(v.track_ref.as_str()))
    }

    /// Rounds the competitor submitted to, in round-store order
    ///
    /// Round ids that no longer resolve to a round are left out.
    pub fn rounds_of(&self, competitor_id: &str) -> Vec<&Round> {
        let round_ids: HashSet<&str> = self
            .submissions_of(competitor_id)
            .into_iter()
            .map(|s| s.round_id.as_str())
            .collect();
        self.rounds.find_all(|r| round_ids.contains(r.id.as_str()))
    }

    /// Number of existing rounds the competitor submitted to
    pub fn rounds_participated(&self, competitor_id: &str) -> usize {
        self.rounds_of(competitor_id).len()
    }

    /// Non-empty vote comments on a submission
    pub fn comments_for_submission(&self, track_ref: &str) -> Vec<&str> {
        self.votes_for(track_ref)
            .into_iter()
            .map(|v| v.comment.as_str())
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// Non-empty vote comments on all of a competitor's submissions
    pub fn comments_for_competitor(&self, competitor_id: &str) -> Vec<&str> {
        self.submissions_of(competitor_id)
            .into_iter()
            .flat_map(|s| self.comments_for_submission(&s.track_ref))
            .collect()
    }

    // =========================================================================
    // Scoring
    // =========================================================================

    /// Numeric points received by one submission
    pub fn submission_points(&self, track_ref: &str) -> u64 {
        sum_points(
            self.votes_for(track_ref)
                .into_iter()
                .map(|v| v.points_assigned.as_str()),
        )
    }

    /// Total numeric points received across all of a competitor's submissions
    pub fn total_points_received(&self, competitor_id: &str) -> u64 {
        sum_points(
            self.votes_cast_on_competitor(competitor_id)
                .into_iter()
                .map(|v| v.points_assigned.as_str()),
        )
    }

    /// Ranking score; same value as [`League::total_points_received`]
    pub fn score_of(&self, competitor_id: &str) -> u64 {
        self.total_points_received(competitor_id)
    }

    /// Number of vote records on the competitor's submissions, numeric or not
    pub fn vote_count_received(&self, competitor_id: &str) -> usize {
        self.votes_cast_on_competitor(competitor_id).len()
    }

    /// Points per submitter within one round
    ///
    /// Submitters appear in the order of their first submission in the
    /// round; several submissions by one submitter are summed.
    pub fn round_score_table(&self, round_id: &str) -> Tally {
        let mut scores = Tally::new();
        for submission in self.submissions_in(round_id) {
            let points = self.submission_points(&submission.track_ref);
            scores.add(&submission.submitter_id, points);
        }
        scores
    }

    /// Every competitor ranked by score, highest first
    ///
    /// The sort is stable: competitors with equal scores keep their
    /// competitor-store order.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .competitors
            .get_all()
            .iter()
            .map(|competitor| {
                let score = self.score_of(&competitor.id);
                let rounds = self.rounds_participated(&competitor.id);
                LeaderboardEntry {
                    competitor: competitor.clone(),
                    score,
                    rounds,
                    avg_score: average(score, rounds),
                }
            })
            .collect();

        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries
    }
}

/// `total / count` as a float, 0 when `count` is 0
pub(crate) fn average(total: u64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}
