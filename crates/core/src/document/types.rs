//! Fiscal document domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use fiscus_shared::types::{DocumentId, OrganizationId};

/// Fiscal document status.
///
/// Valid transitions:
/// - Draft → Pending (submit)
/// - Pending → Authorized (authorize, with protocol)
/// - Pending → Cancelled (cancel)
/// - Authorized → Cancelled (cancel, with justification)
/// - Draft → Cancelled only through the manual-override path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Being prepared; not yet submitted to the authority.
    Draft,
    /// Submitted, awaiting the authority's verdict.
    Pending,
    /// Authorized by the fiscal authority (protocol recorded).
    Authorized,
    /// Cancelled (protocol or override justification recorded).
    Cancelled,
}

impl DocumentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Authorized => "authorized",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            "authorized" => Some(Self::Authorized),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true when no further transition leaves this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The electronic fiscal document species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// NF-e: electronic invoice for goods.
    Nfe,
    /// NFS-e: electronic invoice for services.
    Nfse,
    /// CT-e: electronic transport manifest.
    Cte,
}

impl DocumentKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nfe => "nfe",
            Self::Nfse => "nfse",
            Self::Cte => "cte",
        }
    }

    /// Parses a kind from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "nfe" => Some(Self::Nfe),
            "nfse" => Some(Self::Nfse),
            "cte" => Some(Self::Cte),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An issued fiscal document.
///
/// Owned by the issuing organization and mutated only by applying
/// [`DocumentAction`]s produced by the state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalDocument {
    /// Unique identifier.
    pub id: DocumentId,
    /// The issuing organization.
    pub organization: OrganizationId,
    /// Document number within the series.
    pub number: i64,
    /// Issuance series.
    pub series: i32,
    /// Document species.
    pub kind: DocumentKind,
    /// Current lifecycle status.
    pub status: DocumentStatus,
    /// Authority protocol; set only on Authorized.
    pub authorization_protocol: Option<String>,
    /// Cancellation protocol; set only on Cancelled (unless overridden).
    pub cancellation_protocol: Option<String>,
    /// Audit justification recorded on cancellation.
    pub cancellation_justification: Option<String>,
    /// When the document was submitted for issuance.
    pub issued_at: Option<DateTime<Utc>>,
    /// Optimistic-lock version.
    pub version: i64,
}

impl FiscalDocument {
    /// Applies a validated action, mutating status and audit fields and
    /// bumping the version.
    pub fn apply(&mut self, action: DocumentAction) {
        match action {
            DocumentAction::Submit { submitted_at } => {
                self.status = DocumentStatus::Pending;
                self.issued_at = Some(submitted_at);
            }
            DocumentAction::Authorize { protocol, .. } => {
                self.status = DocumentStatus::Authorized;
                self.authorization_protocol = Some(protocol);
            }
            DocumentAction::Cancel {
                protocol,
                justification,
                ..
            } => {
                self.status = DocumentStatus::Cancelled;
                self.cancellation_protocol = protocol;
                self.cancellation_justification = Some(justification);
            }
        }
        self.version += 1;
    }
}

/// A validated lifecycle transition with its audit data.
#[derive(Debug, Clone)]
pub enum DocumentAction {
    /// Submit a draft document for authorization.
    Submit {
        /// When the document was submitted.
        submitted_at: DateTime<Utc>,
    },
    /// Record the authority's authorization.
    Authorize {
        /// The authorization protocol returned by the authority.
        protocol: String,
        /// When the authorization was recorded.
        authorized_at: DateTime<Utc>,
    },
    /// Cancel the document.
    Cancel {
        /// The cancellation protocol; None on the manual-override path.
        protocol: Option<String>,
        /// Audit justification (length-checked by the machine).
        justification: String,
        /// True when cancellation bypassed the authority.
        manual_override: bool,
        /// When the cancellation was recorded.
        cancelled_at: DateTime<Utc>,
    },
}

impl DocumentAction {
    /// Returns the status this action transitions into.
    #[must_use]
    pub const fn new_status(&self) -> DocumentStatus {
        match self {
            Self::Submit { .. } => DocumentStatus::Pending,
            Self::Authorize { .. } => DocumentStatus::Authorized,
            Self::Cancel { .. } => DocumentStatus::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            DocumentStatus::Draft,
            DocumentStatus::Pending,
            DocumentStatus::Authorized,
            DocumentStatus::Cancelled,
        ] {
            assert_eq!(DocumentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DocumentStatus::parse("AUTHORIZED"), Some(DocumentStatus::Authorized));
        assert_eq!(DocumentStatus::parse("posted"), None);
    }

    #[test]
    fn test_only_cancelled_is_terminal() {
        assert!(DocumentStatus::Cancelled.is_terminal());
        assert!(!DocumentStatus::Draft.is_terminal());
        assert!(!DocumentStatus::Pending.is_terminal());
        assert!(!DocumentStatus::Authorized.is_terminal());
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [DocumentKind::Nfe, DocumentKind::Nfse, DocumentKind::Cte] {
            assert_eq!(DocumentKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(DocumentKind::parse("danfe"), None);
    }

    #[test]
    fn test_apply_bumps_version() {
        let mut document = FiscalDocument {
            id: DocumentId::new(),
            organization: OrganizationId::new(),
            number: 42,
            series: 1,
            kind: DocumentKind::Nfse,
            status: DocumentStatus::Draft,
            authorization_protocol: None,
            cancellation_protocol: None,
            cancellation_justification: None,
            issued_at: None,
            version: 1,
        };

        document.apply(DocumentAction::Submit {
            submitted_at: Utc::now(),
        });
        assert_eq!(document.status, DocumentStatus::Pending);
        assert_eq!(document.version, 2);
        assert!(document.issued_at.is_some());

        document.apply(DocumentAction::Authorize {
            protocol: "135240000012345".to_string(),
            authorized_at: Utc::now(),
        });
        assert_eq!(document.status, DocumentStatus::Authorized);
        assert_eq!(
            document.authorization_protocol.as_deref(),
            Some("135240000012345")
        );
        assert_eq!(document.version, 3);
    }
}
