//! League record types
//!
//! Four flat value records. Relationships between them are plain id
//! fields (soft foreign keys); nothing here checks that a referenced
//! record exists.

use crate::points::parse_points;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A record type held by a [`RecordStore`](crate::store::RecordStore)
///
/// `Key` is the natural identifier. Stores compare keys with
/// [`Record::has_key`] and detect collisions with [`Record::same_key`].
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Natural key type used for lookups and removal
    type Key: ?Sized;

    /// Store name used in log lines and errors
    const KIND: &'static str;

    /// Whether this record is identified by `key`
    fn has_key(&self, key: &Self::Key) -> bool;

    /// Whether `other` would collide with this record in a store
    fn same_key(&self, other: &Self) -> bool;

    /// Human-readable key for logging
    fn key_label(&self) -> String;

    /// Header row of the CSV layout, in column order
    const CSV_HEADERS: &'static [&'static str];

    /// Field values in [`Record::CSV_HEADERS`] order
    fn csv_fields(&self) -> Vec<&str>;

    /// Build a record from values in [`Record::CSV_HEADERS`] order
    ///
    /// Missing trailing values become empty strings.
    fn from_csv_fields(fields: Vec<String>) -> Self;
}

/// A league participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: String,
    pub name: String,
}

impl Competitor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Record for Competitor {
    type Key = str;
    const KIND: &'static str = "competitor";

    fn has_key(&self, key: &str) -> bool {
        self.id == key
    }

    fn same_key(&self, other: &Self) -> bool {
        self.id == other.id
    }

    fn key_label(&self) -> String {
        self.id.clone()
    }

    const CSV_HEADERS: &'static [&'static str] = &["ID", "Name"];

    fn csv_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str()]
    }

    fn from_csv_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        Self {
            id: fields.next().unwrap_or_default(),
            name: fields.next().unwrap_or_default(),
        }
    }
}

/// A themed submission and voting period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub id: String,
    pub created_at: String,
    pub name: String,
    pub description: String,
    pub playlist_ref: String,
}

impl Record for Round {
    type Key = str;
    const KIND: &'static str = "round";

    fn has_key(&self, key: &str) -> bool {
        self.id == key
    }

    fn same_key(&self, other: &Self) -> bool {
        self.id == other.id
    }

    fn key_label(&self) -> String {
        self.id.clone()
    }

    const CSV_HEADERS: &'static [&'static str] =
        &["ID", "Created", "Name", "Description", "Playlist URL"];

    fn csv_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.created_at.as_str(),
            self.name.as_str(),
            self.description.as_str(),
            self.playlist_ref.as_str(),
        ]
    }

    fn from_csv_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        Self {
            id: fields.next().unwrap_or_default(),
            created_at: fields.next().unwrap_or_default(),
            name: fields.next().unwrap_or_default(),
            description: fields.next().unwrap_or_default(),
            playlist_ref: fields.next().unwrap_or_default(),
        }
    }
}

/// A track entered into a round by a competitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Track reference, unique within the submission store
    pub track_ref: String,
    pub title: String,
    pub album: String,
    pub artists: String,
    /// Soft reference to [`Competitor::id`]
    pub submitter_id: String,
    pub created_at: String,
    pub comment: String,
    /// Soft reference to [`Round::id`]
    pub round_id: String,
    /// Stored verbatim
    pub visible_to_voters: String,
}

impl Record for Submission {
    type Key = str;
    const KIND: &'static str = "submission";

    fn has_key(&self, key: &str) -> bool {
        self.track_ref == key
    }

    fn same_key(&self, other: &Self) -> bool {
        self.track_ref == other.track_ref
    }

    fn key_label(&self) -> String {
        self.track_ref.clone()
    }

    const CSV_HEADERS: &'static [&'static str] = &[
        "Spotify URI",
        "Title",
        "Album",
        "Artist(s)",
        "Submitter ID",
        "Created",
        "Comment",
        "Round ID",
        "Visible To Voters",
    ];

    fn csv_fields(&self) -> Vec<&str> {
        vec![
            self.track_ref.as_str(),
            self.title.as_str(),
            self.album.as_str(),
            self.artists.as_str(),
            self.submitter_id.as_str(),
            self.created_at.as_str(),
            self.comment.as_str(),
            self.round_id.as_str(),
            self.visible_to_voters.as_str(),
        ]
    }

    fn from_csv_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        Self {
            track_ref: fields.next().unwrap_or_default(),
            title: fields.next().unwrap_or_default(),
            album: fields.next().unwrap_or_default(),
            artists: fields.next().unwrap_or_default(),
            submitter_id: fields.next().unwrap_or_default(),
            created_at: fields.next().unwrap_or_default(),
            comment: fields.next().unwrap_or_default(),
            round_id: fields.next().unwrap_or_default(),
            visible_to_voters: fields.next().unwrap_or_default(),
        }
    }
}

/// Points cast by one competitor on a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Soft reference to [`Submission::track_ref`]
    pub track_ref: String,
    /// Soft reference to [`Competitor::id`]
    pub voter_id: String,
    pub created_at: String,
    /// Raw text; see [`Vote::points`]
    pub points_assigned: String,
    pub comment: String,
    /// Expected to match the submission's round, never checked
    pub round_id: String,
}

impl Vote {
    /// Numeric points, or `None` when the raw value does not count
    pub fn points(&self) -> Option<u64> {
        parse_points(&self.points_assigned)
    }

    pub fn key(&self) -> VoteKey {
        VoteKey::new(&self.track_ref, &self.voter_id, &self.round_id)
    }
}

/// Composite identity of a vote
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoteKey {
    pub track_ref: String,
    pub voter_id: String,
    pub round_id: String,
}

impl VoteKey {
    pub fn new(
        track_ref: impl Into<String>,
        voter_id: impl Into<String>,
        round_id: impl Into<String>,
    ) -> Self {
        Self {
            track_ref: track_ref.into(),
            voter_id: voter_id.into(),
            round_id: round_id.into(),
        }
    }
}

impl Record for Vote {
    type Key = VoteKey;
    const KIND: &'static str = "vote";

    fn has_key(&self, key: &VoteKey) -> bool {
        self.track_ref == key.track_ref
            && self.voter_id == key.voter_id
            && self.round_id == key.round_id
    }

    fn same_key(&self, other: &Self) -> bool {
        self.track_ref == other.track_ref
            && self.voter_id == other.voter_id
            && self.round_id == other.round_id
    }

    fn key_label(&self) -> String {
        format!("{}/{}/{}", self.round_id, self.track_ref, self.voter_id)
    }

    const CSV_HEADERS: &'static [&'static str] = &[
        "Spotify URI",
        "Voter ID",
        "Created",
        "Points Assigned",
        "Comment",
        "Round ID",
    ];

    fn csv_fields(&self) -> Vec<&str> {
        vec![
            self.track_ref.as_str(),
            self.voter_id.as_str(),
            self.created_at.as_str(),
            self.points_assigned.as_str(),
            self.comment.as_str(),
            self.round_id.as_str(),
        ]
    }

    fn from_csv_fields(fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter();
        Self {
            track_ref: fields.next().unwrap_or_default(),
            voter_id: fields.next().unwrap_or_default(),
            created_at: fields.next().unwrap_or_default(),
            points_assigned: fields.next().unwrap_or_default(),
            comment: fields.next().unwrap_or_default(),
            round_id: fields.next().unwrap_or_default(),
        }
    }
}
