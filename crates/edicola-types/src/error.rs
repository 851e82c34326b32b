//! Error types for Edicola
//!
//! Every chain or store failure is converted into this taxonomy at the
//! bridge boundary; nothing propagates uncategorized past it.

use thiserror::Error;

/// Result type for Edicola operations
pub type Result<T> = std::result::Result<T, EdicolaError>;

/// Recognized on-chain revert reasons
///
/// The contract rejects writes with a reason string; the bridge maps the
/// string to one of these categories so the surface can name the failure
/// instead of echoing raw revert data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The caller already owns this magazine
    #[error("magazine already owned")]
    MagazineAlreadyOwned,

    /// The attached payment does not cover the price
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The caller lacks the role the operation requires
    #[error("unauthorized")]
    Unauthorized,

    /// The magazine was already released
    #[error("magazine already released")]
    AlreadyReleased,

    /// The magazine has not been released yet
    #[error("magazine not released")]
    NotReleased,

    /// An annual subscription is already active
    #[error("subscription already active")]
    AlreadySubscribed,

    /// No active subscription to revoke
    #[error("no active subscription")]
    NoSubscription,

    /// The address is already an administrator
    #[error("already an administrator")]
    DuplicateAdministrator,

    /// No magazine exists at this address
    #[error("magazine not found")]
    MagazineNotFound,

    /// Requested withdrawal exceeds the treasury balance
    #[error("amount exceeds treasury balance")]
    ExceedsTreasury,

    /// A revert reason we do not recognize
    #[error("rejected: {0}")]
    Other(String),
}

impl RejectReason {
    /// Map a revert reason string onto a recognized category.
    ///
    /// Matching is by lowercase substring; an unrecognized reason is kept
    /// verbatim under `Other` rather than dropped.
    pub fn from_revert(reason: &str) -> Self {
        let lower = reason.to_lowercase();
        if lower.contains("already owned") || lower.contains("already purchased") {
            Self::MagazineAlreadyOwned
        } else if lower.contains("insufficient") {
            Self::InsufficientFunds
        } else if lower.contains("already released") {
            Self::AlreadyReleased
        } else if lower.contains("not released") {
            Self::NotReleased
        } else if lower.contains("already subscribed") || lower.contains("subscription active") {
            Self::AlreadySubscribed
        } else if lower.contains("no subscription") || lower.contains("not subscribed") {
            Self::NoSubscription
        } else if lower.contains("already admin") || lower.contains("already an admin") {
            Self::DuplicateAdministrator
        } else if lower.contains("not found") {
            Self::MagazineNotFound
        } else if lower.contains("exceeds balance") || lower.contains("exceeds treasury") {
            Self::ExceedsTreasury
        } else if lower.contains("only owner")
            || lower.contains("only admin")
            || lower.contains("unauthorized")
            || lower.contains("not authorized")
        {
            Self::Unauthorized
        } else {
            Self::Other(reason.to_string())
        }
    }
}

/// Edicola error taxonomy
///
/// Three of the chain outcomes are deliberately distinct: user rejection in
/// the signing UI is expected and must stay silent, a recognized revert maps
/// to a specific category, and a transport fault maps to a generic
/// retry-later category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdicolaError {
    // ========================================================================
    // Chain outcomes
    // ========================================================================

    /// The user declined the transaction in the signing UI; never surfaced
    #[error("transaction cancelled by user")]
    UserCancelled,

    /// The contract reverted with a recognized reason
    #[error("rejected on-chain: {0}")]
    ChainRejected(RejectReason),

    /// Transport, timeout, or node failure; retry later
    #[error("chain unavailable: {0}")]
    ChainUnavailable(String),

    // ========================================================================
    // Off-chain store
    // ========================================================================

    /// The content store could not be read or written
    #[error("content store unavailable: {0}")]
    StoreUnavailable(String),

    // ========================================================================
    // Local preconditions
    // ========================================================================

    /// Caller-supplied input failed a local check before any network call
    #[error("validation failed: {0}")]
    Validation(String),
}

impl EdicolaError {
    /// Whether this error should produce user-facing output at all
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::UserCancelled)
    }

    /// Short category label for notifications and logs
    pub fn category(&self) -> &'static str {
        match self {
            Self::UserCancelled => "cancelled",
            Self::ChainRejected(_) => "rejected",
            Self::ChainUnavailable(_) => "chain unavailable",
            Self::StoreUnavailable(_) => "store unavailable",
            Self::Validation(_) => "invalid input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revert_reason_mapping() {
        assert_eq!(
            RejectReason::from_revert("Magazine already owned"),
            RejectReason::MagazineAlreadyOwned
        );
        assert_eq!(
            RejectReason::from_revert("Insufficient funds sent"),
            RejectReason::InsufficientFunds
        );
        assert_eq!(
            RejectReason::from_revert("Only admin can release"),
            RejectReason::Unauthorized
        );
    }

    #[test]
    fn test_unknown_revert_kept_verbatim() {
        match RejectReason::from_revert("strange reason") {
            RejectReason::Other(s) => assert_eq!(s, "strange reason"),
            other => panic!("expected Other, got {other:?}"),
        }
    }

    #[test]
    fn test_already_owned_distinct_from_generic() {
        let owned = EdicolaError::ChainRejected(RejectReason::MagazineAlreadyOwned);
        let generic = EdicolaError::ChainRejected(RejectReason::Other("revert".into()));
        assert_ne!(owned, generic);
    }

    #[test]
    fn test_only_cancellation_is_silent() {
        assert!(EdicolaError::UserCancelled.is_silent());
        assert!(!EdicolaError::ChainUnavailable("timeout".into()).is_silent());
        assert!(!EdicolaError::StoreUnavailable("503".into()).is_silent());
    }
}
