use std::fmt;

/// Sort key understood by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortBy {
    /// Publication date
    Date,
    /// Internal article id
    Id,
    /// Relevance to the query
    Relevance,
    /// Cosine similarity to the event centroid
    CosSim,
    /// Social media score
    SocialScore,
    /// Importance of the publishing source
    SourceImportance,
    /// Number of articles (events only)
    Size,
}

impl SortBy {
    /// Wire representation of the sort key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Id => "id",
            Self::Relevance => "rel",
            Self::CosSim => "cosSim",
            Self::SocialScore => "socialScore",
            Self::SourceImportance => "sourceImportance",
            Self::Size => "size",
        }
    }

    /// Parses a sort key from its wire representation
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "date" => Some(Self::Date),
            "id" => Some(Self::Id),
            "rel" => Some(Self::Relevance),
            "cosSim" => Some(Self::CosSim),
            "socialScore" => Some(Self::SocialScore),
            "sourceImportance" => Some(Self::SourceImportance),
            "size" => Some(Self::Size),
            _ => None,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Value of the `...SortByAsc` request flag
    pub fn is_ascending(&self) -> bool {
        matches!(self, Self::Ascending)
    }
}
