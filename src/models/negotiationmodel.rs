use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{models::listingmodel::MAX_MONTHLY_RENT, service::error::ServiceError};

/// The two sides of a negotiation.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Tenant,
    Owner,
}

impl Party {
    pub fn to_str(&self) -> &str {
        match self {
            Party::Tenant => "tenant",
            Party::Owner => "owner",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "negotiation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NegotiationStatus {
    Proposed,  // Waiting on the owner
    Countered, // Waiting on the tenant
    Accepted,
    Rejected,
    Expired,
}

impl NegotiationStatus {
    pub fn to_str(&self) -> &str {
        match self {
            NegotiationStatus::Proposed => "proposed",
            NegotiationStatus::Countered => "countered",
            NegotiationStatus::Accepted => "accepted",
            NegotiationStatus::Rejected => "rejected",
            NegotiationStatus::Expired => "expired",
        }
    }

    /// The party allowed to move the negotiation out of this status.
    /// `None` for terminal statuses.
    pub fn awaiting(&self) -> Option<Party> {
        match self {
            NegotiationStatus::Proposed => Some(Party::Owner),
            NegotiationStatus::Countered => Some(Party::Tenant),
            NegotiationStatus::Accepted
            | NegotiationStatus::Rejected
            | NegotiationStatus::Expired => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.awaiting().is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NegotiationAction {
    Counter {
        offer: i64,
        message: Option<String>,
    },
    AcceptCounter,
    Reject {
        message: Option<String>,
    },
}

impl NegotiationAction {
    fn name(&self) -> &'static str {
        match self {
            NegotiationAction::Counter { .. } => "counter",
            NegotiationAction::AcceptCounter => "accept the counter offer on",
            NegotiationAction::Reject { .. } => "reject",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Negotiation {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub tenant_id: Uuid,
    pub owner_id: Uuid,

    // Pricing
    pub original_price: i64,
    pub proposed_price: i64,
    pub counter_offer: Option<i64>,
    pub final_price: Option<i64>,
    pub duration: i32,

    pub message: Option<String>,
    pub owner_message: Option<String>,

    pub status: NegotiationStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub response_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Negotiation {
    pub fn party_of(&self, user_id: Uuid) -> Option<Party> {
        if user_id == self.tenant_id {
            Some(Party::Tenant)
        } else if user_id == self.owner_id {
            Some(Party::Owner)
        } else {
            None
        }
    }

    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_terminal() && self.expires_at.map_or(false, |at| at < now)
    }

    /// Moves a lapsed open negotiation to `Expired`. Returns true when it did.
    pub fn expire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_past_expiry(now) {
            return false;
        }
        self.status = NegotiationStatus::Expired;
        self.updated_at = now;
        true
    }

    /// `original_price - final_price`, only once accepted.
    pub fn savings(&self) -> Option<i64> {
        self.final_price.map(|price| self.original_price - price)
    }

    /// Applies `action` on behalf of `actor`.
    ///
    /// Checks run in a fixed order: the actor must be a party, must hold the
    /// role the action needs, the negotiation must not be expired or otherwise
    /// closed, and the current status must allow the action. Lazy expiry is the
    /// caller's job (`expire_if_due`) so that it can be persisted even when the
    /// action is refused.
    pub fn apply(
        &mut self,
        actor: Uuid,
        action: NegotiationAction,
        now: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        let party = self.party_of(actor).ok_or_else(|| {
            ServiceError::Permission(format!(
                "User {} is not a party to negotiation {}",
                actor, self.id
            ))
        })?;

        let required = match &action {
            NegotiationAction::Counter { .. } => Some(Party::Owner),
            NegotiationAction::AcceptCounter => Some(Party::Tenant),
            NegotiationAction::Reject { .. } => self.status.awaiting(),
        };
        if let Some(required) = required {
            if party != required {
                return Err(ServiceError::Permission(format!(
                    "Only the {} can {} this negotiation",
                    required.to_str(),
                    action.name()
                )));
            }
        }

        match self.status {
            NegotiationStatus::Expired => return Err(ServiceError::Expired(self.id)),
            NegotiationStatus::Accepted | NegotiationStatus::Rejected => {
                return Err(ServiceError::State(format!(
                    "Negotiation is already {}",
                    self.status.to_str()
                )))
            }
            NegotiationStatus::Proposed | NegotiationStatus::Countered => {}
        }

        match action {
            NegotiationAction::Counter { offer, message } => {
                if self.status != NegotiationStatus::Proposed {
                    return Err(ServiceError::State(format!(
                        "Cannot counter a negotiation in status {}",
                        self.status.to_str()
                    )));
                }
                if offer <= 0 || offer > MAX_MONTHLY_RENT {
                    return Err(ServiceError::Validation(format!(
                        "Counter offer must be between 1 and {}",
                        MAX_MONTHLY_RENT
                    )));
                }
                self.counter_offer = Some(offer);
                self.owner_message = message;
                self.status = NegotiationStatus::Countered;
            }
            NegotiationAction::AcceptCounter => {
                let counter_offer = match (self.status, self.counter_offer) {
                    (NegotiationStatus::Countered, Some(offer)) => offer,
                    _ => {
                        return Err(ServiceError::State(format!(
                            "No counter offer to accept. Status: {}",
                            self.status.to_str()
                        )))
                    }
                };
                self.final_price = Some(counter_offer);
                self.status = NegotiationStatus::Accepted;
            }
            NegotiationAction::Reject { message } => {
                if party == Party::Owner && message.is_some() {
                    self.owner_message = message;
                }
                self.status = NegotiationStatus::Rejected;
            }
        }

        self.response_date = Some(now);
        self.updated_at = now;
        Ok(())
    }
}
