use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNegotiationDto {
    pub listing_id: Uuid,

    #[validate(range(min = 1, max = 10000000, message = "Proposed price must be between 1 and 10000000"))]
    pub proposed_price: i64,

    #[validate(range(min = 1, max = 60, message = "Duration must be between 1 and 60 months"))]
    pub duration: i32,

    #[validate(length(max = 1000, message = "Message cannot exceed 1000 characters"))]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RespondAction {
    Counter,
    Reject,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RespondNegotiationDto {
    pub action: RespondAction,

    #[validate(range(min = 1, max = 10000000, message = "Counter offer must be between 1 and 10000000"))]
    pub counter_offer: Option<i64>,

    #[validate(length(max = 1000, message = "Message cannot exceed 1000 characters"))]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_negotiation_rules() {
        let dto: CreateNegotiationDto = serde_json::from_value(serde_json::json!({
            "listingId": Uuid::nil(),
            "proposedPrice": 16000,
            "duration": 12,
            "message": "I need long-term accommodation"
        }))
        .unwrap();
        assert!(dto.validate().is_ok());

        let dto = CreateNegotiationDto { proposed_price: 0, ..dto };
        assert!(dto.validate().is_err());

        let dto = CreateNegotiationDto { proposed_price: 1_000_000_000_000_000_000, ..dto };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_respond_action_is_lowercase() {
        let dto: RespondNegotiationDto = serde_json::from_value(serde_json::json!({
            "action": "counter",
            "counterOffer": 18000
        }))
        .unwrap();
        assert_eq!(dto.action, RespondAction::Counter);
        assert_eq!(dto.counter_offer, Some(18000));

        let unknown = serde_json::from_value::<RespondNegotiationDto>(serde_json::json!({ "action": "accept" }));
        assert!(unknown.is_err());
    }
}
