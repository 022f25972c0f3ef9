/// Terminal-condition definitions for a keyword's crawl
///
/// Every way a keyword's loop can end is an explicit value here; none of
/// them is an error in the Rust sense except the page-failure catch-all.
use std::fmt;

/// Why a keyword's crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The per-keyword item budget was filled
    ItemBudgetReached,

    /// The configured page cap was reached
    PageLimitReached,

    /// Navigation failed after exhausting all retry attempts
    NavigationFailed,

    /// The rendered page matched a bot-interdiction marker
    BotProtection,

    /// The search page contained no result cards
    NoCards,

    /// Cards were found but none survived extraction and filtering
    NoSurvivingRecords,

    /// No next-page control, or the control is disabled or has no target
    NoNextPage,

    /// An unhandled failure while processing a page
    PageFailure,
}

impl StopReason {
    /// Returns true when the crawl ended having done everything it could
    /// (budget or page caps, or the result list simply ran out)
    pub fn is_exhausted(&self) -> bool {
        matches!(
            self,
            Self::ItemBudgetReached | Self::PageLimitReached | Self::NoNextPage | Self::NoCards
        )
    }

    /// Returns true when the marketplace refused automated access
    pub fn is_interdiction(&self) -> bool {
        matches!(self, Self::BotProtection)
    }

    /// Returns true when the stop was caused by a failure rather than a
    /// normal stopping condition
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::NavigationFailed | Self::PageFailure)
    }

    /// Stable string form, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ItemBudgetReached => "item_budget_reached",
            Self::PageLimitReached => "page_limit_reached",
            Self::NavigationFailed => "navigation_failed",
            Self::BotProtection => "bot_protection",
            Self::NoCards => "no_cards",
            Self::NoSurvivingRecords => "no_surviving_records",
            Self::NoNextPage => "no_next_page",
            Self::PageFailure => "page_failure",
        }
    }

    /// Returns all stop reasons
    pub fn all() -> Vec<Self> {
        vec![
            Self::ItemBudgetReached,
            Self::PageLimitReached,
            Self::NavigationFailed,
            Self::BotProtection,
            Self::NoCards,
            Self::NoSurvivingRecords,
            Self::NoNextPage,
            Self::PageFailure,
        ]
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_exhausted() {
        assert!(StopReason::ItemBudgetReached.is_exhausted());
        assert!(StopReason::PageLimitReached.is_exhausted());
        assert!(StopReason::NoNextPage.is_exhausted());
        assert!(StopReason::NoCards.is_exhausted());

        assert!(!StopReason::BotProtection.is_exhausted());
        assert!(!StopReason::PageFailure.is_exhausted());
    }

    #[test]
    fn test_is_interdiction() {
        assert!(StopReason::BotProtection.is_interdiction());
        assert!(!StopReason::NavigationFailed.is_interdiction());
    }

    #[test]
    fn test_is_failure() {
        assert!(StopReason::NavigationFailed.is_failure());
        assert!(StopReason::PageFailure.is_failure());

        assert!(!StopReason::ItemBudgetReached.is_failure());
        assert!(!StopReason::BotProtection.is_failure());
        assert!(!StopReason::NoSurvivingRecords.is_failure());
    }

    #[test]
    fn test_display_matches_as_str() {
        for reason in StopReason::all() {
            assert_eq!(format!("{}", reason), reason.as_str());
        }
    }

    #[test]
    fn test_all_reasons_distinct() {
        let all = StopReason::all();
        assert_eq!(all.len(), 8);
        for i in 0..all.len() {
            for j in (i + 1)..all.len() {
                assert_ne!(all[i].as_str(), all[j].as_str());
            }
        }
    }
}
