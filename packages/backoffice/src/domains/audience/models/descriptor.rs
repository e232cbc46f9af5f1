use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::common::{MemberId, ModerationError, ModerationResult, NeighborhoodId};

/// Discriminator stored in the `target_type` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    All,
    Neighborhoods,
    Users,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::All => "all",
            TargetType::Neighborhoods => "neighborhoods",
            TargetType::Users => "users",
        }
    }
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TargetType {
    type Err = ModerationError;

    fn from_str(s: &str) -> ModerationResult<Self> {
        match s {
            "all" => Ok(TargetType::All),
            "neighborhoods" => Ok(TargetType::Neighborhoods),
            "users" => Ok(TargetType::Users),
            _ => Err(ModerationError::validation(format!(
                "Invalid target type: {}",
                s
            ))),
        }
    }
}

/// Who an announcement targets. Exactly one shape exists at a time; the
/// sets are non-empty whenever they are built through the constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target_type", rename_all = "snake_case")]
pub enum AudienceDescriptor {
    All,
    Neighborhoods {
        target_neighborhoods: BTreeSet<NeighborhoodId>,
    },
    Users {
        target_user_ids: BTreeSet<MemberId>,
    },
}

impl AudienceDescriptor {
    pub fn all() -> Self {
        AudienceDescriptor::All
    }

    pub fn neighborhoods(
        ids: impl IntoIterator<Item = NeighborhoodId>,
    ) -> ModerationResult<Self> {
        let target_neighborhoods: BTreeSet<_> = ids.into_iter().collect();
        let descriptor = AudienceDescriptor::Neighborhoods {
            target_neighborhoods,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn users(ids: impl IntoIterator<Item = MemberId>) -> ModerationResult<Self> {
        let target_user_ids: BTreeSet<_> = ids.into_iter().collect();
        let descriptor = AudienceDescriptor::Users { target_user_ids };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Builds a descriptor from the flat shape request handlers and the
    /// database use: a type plus two lists, only one of which may be filled.
    pub fn from_parts(
        target_type: TargetType,
        target_neighborhoods: Vec<NeighborhoodId>,
        target_user_ids: Vec<MemberId>,
    ) -> ModerationResult<Self> {
        match target_type {
            TargetType::All => {
                if !target_neighborhoods.is_empty() || !target_user_ids.is_empty() {
                    return Err(ModerationError::validation(
                        "target_type all must not carry target_neighborhoods or target_user_ids",
                    ));
                }
                Ok(AudienceDescriptor::All)
            }
            TargetType::Neighborhoods => {
                if !target_user_ids.is_empty() {
                    return Err(ModerationError::validation(
                        "target_type neighborhoods must not carry target_user_ids",
                    ));
                }
                Self::neighborhoods(target_neighborhoods)
            }
            TargetType::Users => {
                if !target_neighborhoods.is_empty() {
                    return Err(ModerationError::validation(
                        "target_type users must not carry target_neighborhoods",
                    ));
                }
                Self::users(target_user_ids)
            }
        }
    }

    /// Checks the non-empty rule for set-shaped descriptors. Needed for values
    /// that arrived through `Deserialize`, which cannot enforce it.
    pub fn validate(&self) -> ModerationResult<()> {
        match self {
            AudienceDescriptor::All => Ok(()),
            AudienceDescriptor::Neighborhoods {
                target_neighborhoods,
            } if target_neighborhoods.is_empty() => Err(ModerationError::validation(
                "target_neighborhoods must not be empty when target_type is neighborhoods",
            )),
            AudienceDescriptor::Users { target_user_ids } if target_user_ids.is_empty() => {
                Err(ModerationError::validation(
                    "target_user_ids must not be empty when target_type is users",
                ))
            }
            _ => Ok(()),
        }
    }

    pub fn target_type(&self) -> TargetType {
        match self {
            AudienceDescriptor::All => TargetType::All,
            AudienceDescriptor::Neighborhoods { .. } => TargetType::Neighborhoods,
            AudienceDescriptor::Users { .. } => TargetType::Users,
        }
    }

    /// Column values for persistence: (target_type, target_neighborhoods, target_user_ids).
    pub fn to_columns(&self) -> (TargetType, Vec<NeighborhoodId>, Vec<MemberId>) {
        match self {
            AudienceDescriptor::All => (TargetType::All, Vec::new(), Vec::new()),
            AudienceDescriptor::Neighborhoods {
                target_neighborhoods,
            } => (
                TargetType::Neighborhoods,
                target_neighborhoods.iter().copied().collect(),
                Vec::new(),
            ),
            AudienceDescriptor::Users { target_user_ids } => (
                TargetType::Users,
                Vec::new(),
                target_user_ids.iter().copied().collect(),
            ),
        }
    }

    /// Whether `viewer` is part of this audience.
    pub fn is_visible_to(&self, viewer: &Viewer) -> bool {
        match self {
            AudienceDescriptor::All => true,
            AudienceDescriptor::Neighborhoods {
                target_neighborhoods,
            } => viewer
                .neighborhood_id
                .is_some_and(|n| target_neighborhoods.contains(&n)),
            AudienceDescriptor::Users { target_user_ids } => {
                target_user_ids.contains(&viewer.member_id)
            }
        }
    }
}

/// Placeholder constants behind recipient estimates.
///
/// `all` is a platform-wide order of magnitude
/// and neighborhoods use an average head count. Nothing here queries live
/// user counts, so an estimate must never back a delivery guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceEstimates {
    pub all: i64,
    pub per_neighborhood: i64,
}

impl Default for AudienceEstimates {
    fn default() -> Self {
        Self {
            all: 5_000,
            per_neighborhood: 250,
        }
    }
}

impl AudienceEstimates {
    /// Estimated recipients for `descriptor`. Empty sets (which validation
    /// keeps out) estimate to zero.
    pub fn estimate(&self, descriptor: &AudienceDescriptor) -> i64 {
        match descriptor {
            AudienceDescriptor::All => self.all,
            AudienceDescriptor::Neighborhoods {
                target_neighborhoods,
            } => (target_neighborhoods.len() as i64).saturating_mul(self.per_neighborhood),
            AudienceDescriptor::Users { target_user_ids } => target_user_ids.len() as i64,
        }
    }
}

/// The member reading a listing, with the attributes targeting looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub member_id: MemberId,
    pub neighborhood_id: Option<NeighborhoodId>,
}

impl Viewer {
    pub fn new(member_id: MemberId, neighborhood_id: Option<NeighborhoodId>) -> Self {
        Self {
            member_id,
            neighborhood_id,
        }
    }
}
