//! The fixed five-level category hierarchy.
//!
//! Every place that used to dispatch on level-name strings goes through
//! [`Level`] instead: the adjacency relation, the table each level lives in,
//! the listing endpoint for a node's children, and the next-hop href a
//! browsing client follows from each listed item.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::ApiError;

/// One node type in the fixed tree: city → school → semester → group → subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    City,
    School,
    Semester,
    Group,
    Subject,
}

/// Where an item at a given level links to: the next level down, or the
/// content-detail view once the tree bottoms out at subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextHop {
    Level(Level),
    ContentDetail,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::City,
        Level::School,
        Level::Semester,
        Level::Group,
        Level::Subject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::City => "city",
            Level::School => "school",
            Level::Semester => "semester",
            Level::Group => "group",
            Level::Subject => "subject",
        }
    }

    /// Table holding rows of this level. Always interpolated quoted, since
    /// `groups` is a reserved word in newer PostgreSQL.
    pub fn table(&self) -> &'static str {
        match self {
            Level::City => "cities",
            Level::School => "schools",
            Level::Semester => "semesters",
            Level::Group => "groups",
            Level::Subject => "subjects",
        }
    }

    /// Foreign-key column pointing at this level's parent, `None` for the root
    pub fn parent_column(&self) -> Option<&'static str> {
        match self {
            Level::City => None,
            Level::School => Some("city_id"),
            Level::Semester => Some("school_id"),
            Level::Group => Some("semester_id"),
            Level::Subject => Some("group_id"),
        }
    }

    pub fn parent(&self) -> Option<Level> {
        match self {
            Level::City => None,
            Level::School => Some(Level::City),
            Level::Semester => Some(Level::School),
            Level::Group => Some(Level::Semester),
            Level::Subject => Some(Level::Group),
        }
    }

    /// The adjacency table: what lies one level below a node of this level
    pub fn next_hop(&self) -> NextHop {
        match self {
            Level::City => NextHop::Level(Level::School),
            Level::School => NextHop::Level(Level::Semester),
            Level::Semester => NextHop::Level(Level::Group),
            Level::Group => NextHop::Level(Level::Subject),
            Level::Subject => NextHop::ContentDetail,
        }
    }

    /// API route that lists the children of a node at this level
    pub fn listing_endpoint(&self, id: i32) -> String {
        match self.next_hop() {
            NextHop::Level(child) => format!("/api/{}/{}/{}s", self.table(), id, child.as_str()),
            NextHop::ContentDetail => format!("/api/subjects/{}/contents", id),
        }
    }

    /// Plural display name ("Cities", "Schools", ...)
    pub fn plural(&self) -> &'static str {
        match self {
            Level::City => "Cities",
            Level::School => "Schools",
            Level::Semester => "Semesters",
            Level::Group => "Groups",
            Level::Subject => "Subjects",
        }
    }

    /// Heading used for the listing at this node
    pub fn child_heading(&self) -> &'static str {
        match self.next_hop() {
            NextHop::Level(child) => child.plural(),
            NextHop::ContentDetail => "Contents",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "city" => Ok(Level::City),
            "school" => Ok(Level::School),
            "semester" => Ok(Level::Semester),
            "group" => Ok(Level::Group),
            "subject" => Ok(Level::Subject),
            other => Err(PathError::UnknownLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("unknown hierarchy level '{0}'")]
    UnknownLevel(String),

    #[error("missing id after '{0}' segment")]
    MissingId(&'static str),

    #[error("invalid id '{0}'")]
    InvalidId(String),

    #[error("'{found}' cannot follow '{after}'")]
    OutOfOrder { after: &'static str, found: &'static str },

    #[error("path must start at 'city', found '{0}'")]
    BadRoot(&'static str),
}

impl From<PathError> for ApiError {
    fn from(err: PathError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

/// A resolved browse location: the alternating `{level}/{id}` segments of a
/// readable URL, validated against the adjacency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowsePath {
    segments: Vec<(Level, i32)>,
}

impl BrowsePath {
    /// Root location: no segments, lists cities
    pub fn root() -> Self {
        Self { segments: vec![] }
    }

    /// Parse a path like `city/3/school/7/semester/2`. Empty input resolves
    /// to the root. Segments must descend the tree one level at a time.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments: Vec<(Level, i32)> = Vec::with_capacity(parts.len() / 2);

        let mut iter = parts.into_iter();
        while let Some(raw_level) = iter.next() {
            let level = Level::from_str(raw_level)?;

            match segments.last() {
                None => {
                    if level != Level::City {
                        return Err(PathError::BadRoot(level.as_str()));
                    }
                }
                Some(&(prev, _)) => {
                    if prev.next_hop() != NextHop::Level(level) {
                        return Err(PathError::OutOfOrder {
                            after: prev.as_str(),
                            found: level.as_str(),
                        });
                    }
                }
            }

            let raw_id = iter.next().ok_or(PathError::MissingId(level.as_str()))?;
            let id: i32 = raw_id
                .parse()
                .map_err(|_| PathError::InvalidId(raw_id.to_string()))?;

            segments.push((level, id));
        }

        Ok(Self { segments })
    }

    /// Level of the node the path ends on, `None` at the root
    pub fn current(&self) -> Option<(Level, i32)> {
        self.segments.last().copied()
    }

    /// API endpoint that lists this location's children
    pub fn listing_endpoint(&self) -> String {
        match self.current() {
            None => "/api/cities".to_string(),
            Some((level, id)) => level.listing_endpoint(id),
        }
    }

    /// Heading for the listing at this location
    pub fn heading(&self) -> &'static str {
        match self.current() {
            None => Level::City.plural(),
            Some((level, _)) => level.child_heading(),
        }
    }

    /// Href the browsing client should follow for a listed item: one level
    /// deeper, or the content-detail view below a subject.
    pub fn item_href(&self, item_id: i32) -> String {
        match self.current() {
            None => format!("/browse/city/{}", item_id),
            Some((level, _)) => match level.next_hop() {
                NextHop::Level(child) => {
                    format!("/browse/{}/{}/{}", self.as_path(), child.as_str(), item_id)
                }
                NextHop::ContentDetail => format!("/lesson/{}", item_id),
            },
        }
    }

    fn as_path(&self) -> String {
        self.segments
            .iter()
            .map(|(level, id)| format!("{}/{}", level.as_str(), id))
            .collect::<Vec<_>>()
            .join("/")
    }
}
