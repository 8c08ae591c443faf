//! Local gate keeping the assistant on banking topics

use std::fmt;

/// Shortest accepted query, in characters after trimming
pub const MIN_QUERY_CHARS: usize = 3;

/// Off-topic terms that make a query ineligible
pub const OFF_TOPIC_TERMS: [&str; 7] = [
    "football", "politics", "weather", "serie a", "recipe", "movie", "sport",
];

/// Why a query was refused before reaching any model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooShort,
    OffTopic(&'static str),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rejection::TooShort => {
                write!(f, "Question too short. Ask about the subscription plans.")
            }
            Rejection::OffTopic(term) => write!(
                f,
                "Unsupported topic ('{}'). I can only answer questions about the plans.",
                term
            ),
        }
    }
}

/// Accept or reject a query before any answer is produced
pub fn check_query(query: &str) -> Result<(), Rejection> {
    let normalized = query.trim().to_lowercase();

    if normalized.chars().count() < MIN_QUERY_CHARS {
        return Err(Rejection::TooShort);
    }

    match OFF_TOPIC_TERMS.iter().copied().find(|term| normalized.contains(term)) {
        Some(term) => Err(Rejection::OffTopic(term)),
        None => Ok(()),
    }
}
