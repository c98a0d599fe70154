//! Physics contact resolution
//!
//! The physics engine reports each colliding pair as two body tags in no
//! particular order. Resolution is symmetric and the hazard tag dominates.

use crate::consts::{GOAL_TAG, HAZARD_TAG};

/// Result of resolving a contact pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    /// An obstacle reached the goal; `body` is the obstacle's tag
    GoalHit { body: String },
    /// Something touched the hazard marker
    BarrierHit,
    /// Contact has no gameplay effect
    None,
}

/// Resolve an unordered pair of body tags
pub fn resolve_contact(tag_a: &str, tag_b: &str) -> ContactOutcome {
    if tag_a == HAZARD_TAG || tag_b == HAZARD_TAG {
        return ContactOutcome::BarrierHit;
    }
    if tag_a == GOAL_TAG {
        return ContactOutcome::GoalHit {
            body: tag_b.to_string(),
        };
    }
    if tag_b == GOAL_TAG {
        return ContactOutcome::GoalHit {
            body: tag_a.to_string(),
        };
    }
    ContactOutcome::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_hit_is_symmetric() {
        let expected = ContactOutcome::GoalHit {
            body: "ball7".to_string(),
        };
        assert_eq!(resolve_contact("goal", "ball7"), expected);
        assert_eq!(resolve_contact("ball7", "goal"), expected);
    }

    #[test]
    fn test_hazard_dominates() {
        assert_eq!(resolve_contact("ng", "goal"), ContactOutcome::BarrierHit);
        assert_eq!(resolve_contact("goal", "ng"), ContactOutcome::BarrierHit);
        assert_eq!(resolve_contact("ball3", "ng"), ContactOutcome::BarrierHit);
        assert_eq!(resolve_contact("ng", "ng"), ContactOutcome::BarrierHit);
    }

    #[test]
    fn test_unrelated_contact() {
        assert_eq!(resolve_contact("ball1", "ball2"), ContactOutcome::None);
        assert_eq!(resolve_contact("", "floor"), ContactOutcome::None);
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert_eq!(resolve_contact("GOAL", "ball1"), ContactOutcome::None);
        assert_eq!(resolve_contact("NG", "ball1"), ContactOutcome::None);
    }
}
