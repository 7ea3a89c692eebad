//! League fixture builder
//!
//! Builds in-memory leagues for integration tests. Records are given in the
//! order they should appear in their stores.

#![allow(dead_code)]

use tunecup_common::{Competitor, MemoryStorage, RecordStore, Round, Submission, Vote};
use tunecup_league::League;

#[derive(Debug, Default)]
pub struct LeagueBuilder {
    competitors: Vec<Competitor>,
    rounds: Vec<Round>,
    submissions: Vec<Submission>,
    votes: Vec<Vote>,
}

impl LeagueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn competitor(mut self, id: &str, name: &str) -> Self {
        self.competitors.push(Competitor::new(id, name));
        self
    }

    pub fn round(mut self, id: &str, name: &str) -> Self {
        self.rounds.push(Round {
            id: id.to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
            name: name.to_string(),
            description: format!("{} description", name),
            playlist_ref: format!("https://example.com/playlist/{}", id),
        });
        self
    }

    /// Submission of `track_ref` by `submitter_id` into `round_id`
    pub fn submission(mut self, submitter_id: &str, track_ref: &str, round_id: &str) -> Self {
        self.submissions.push(Submission {
            track_ref: track_ref.to_string(),
            title: format!("Song {}", track_ref),
            album: "Album".to_string(),
            artists: "Artist".to_string(),
            submitter_id: submitter_id.to_string(),
            created_at: "2025-01-02T00:00:00Z".to_string(),
            comment: String::new(),
            round_id: round_id.to_string(),
            visible_to_voters: "Yes".to_string(),
        });
        self
    }

    /// Vote by `voter_id` on `track_ref` with raw `points`
    pub fn vote(self, voter_id: &str, track_ref: &str, points: &str, round_id: &str) -> Self {
        self.vote_with_comment(voter_id, track_ref, points, round_id, "")
    }

    pub fn vote_with_comment(
        mut self,
        voter_id: &str,
        track_ref: &str,
        points: &str,
        round_id: &str,
        comment: &str,
    ) -> Self {
        self.votes.push(Vote {
            track_ref: track_ref.to_string(),
            voter_id: voter_id.to_string(),
            created_at: "2025-01-03T00:00:00Z".to_string(),
            points_assigned: points.to_string(),
            comment: comment.to_string(),
            round_id: round_id.to_string(),
        });
        self
    }

    pub fn build(self) -> League {
        League::new(
            RecordStore::open(MemoryStorage::new(self.competitors)).unwrap(),
            RecordStore::open(MemoryStorage::new(self.rounds)).unwrap(),
            RecordStore::open(MemoryStorage::new(self.submissions)).unwrap(),
            RecordStore::open(MemoryStorage::new(self.votes)).unwrap(),
        )
    }
}

/// Two competitors, one round, one non-numeric vote
///
/// A→track1 and B→track2 in R1. A gives track2 5 points, B gives track1
/// "n/a", B gives track2 3 points.
pub fn two_player_league() -> League {
    LeagueBuilder::new()
        .competitor("A", "Alice")
        .competitor("B", "Bob")
        .round("R1", "Opening Round")
        .submission("A", "track1", "R1")
        .submission("B", "track2", "R1")
        .vote("A", "track2", "5", "R1")
        .vote("B", "track1", "n/a", "R1")
        .vote("B", "track2", "3", "R1")
        .build()
}
