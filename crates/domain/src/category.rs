use std::fmt;

/// Outcome of classifying a downstream response.
///
/// Only `Success`, `NoData` and `NameError` ever reach a cache bucket; the
/// rest are passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCategory {
    Success,
    NoData,
    NameError,
    Delegation,
    Truncated,
    OtherError,
}

impl ResponseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NoData => "nodata",
            Self::NameError => "nxdomain",
            Self::Delegation => "delegation",
            Self::Truncated => "truncated",
            Self::OtherError => "error",
        }
    }

    /// Bucket this category is stored in, if it is cacheable at all.
    pub fn bucket(&self) -> Option<CacheBucket> {
        match self {
            Self::Success | Self::NoData => Some(CacheBucket::Positive),
            Self::NameError => Some(CacheBucket::Negative),
            Self::Delegation | Self::Truncated | Self::OtherError => None,
        }
    }

    pub fn is_cacheable(&self) -> bool {
        self.bucket().is_some()
    }
}

impl fmt::Display for ResponseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheBucket {
    Positive,
    Negative,
}

impl CacheBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

impl fmt::Display for CacheBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
