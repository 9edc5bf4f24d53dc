//! Step orchestrator for the visitor flow.
//!
//! [`FlowEngine`] is a small finite state machine sequencing
//! welcome → coupon pick → survey → congratulations → thank-you. It owns the
//! in-memory selection state (coupon, sentiment, partner, collected email)
//! and exposes a generation counter so callers can discard responses from
//! suspension points that resolved after the visitor already moved on.
//!
//! The engine is deliberately synchronous and side-effect free: recording
//! engagement events and dispatching promo email around transitions is the
//! caller's job.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

/// The fixed three-value sentiment scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Happy,
    Neutral,
    Sad,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Happy => "happy",
            Sentiment::Neutral => "neutral",
            Sentiment::Sad => "sad",
        }
    }

    /// Parse a stored sentiment value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "happy" => Some(Sentiment::Happy),
            "neutral" => Some(Sentiment::Neutral),
            "sad" => Some(Sentiment::Sad),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Steps and selections
// ---------------------------------------------------------------------------

/// The visitor-facing steps, in flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    Welcome,
    CouponPicker,
    Survey,
    Congratulations,
    EmailCollection,
    ThankYou,
}

/// The coupon the visitor picked, carried forward to correlate the survey,
/// the claim, and the congratulations screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCoupon {
    pub id: Uuid,
    pub code: String,
}

// ---------------------------------------------------------------------------
// FlowEngine
// ---------------------------------------------------------------------------

/// Client-flow state machine. See the module docs for the step sequence.
#[derive(Debug)]
pub struct FlowEngine {
    step: FlowStep,
    selected_coupon: Option<SelectedCoupon>,
    sentiment: Option<Sentiment>,
    selected_partner: Option<Uuid>,
    collected_email: Option<String>,
    generation: u64,
}

impl FlowEngine {
    pub fn new() -> Self {
        Self {
            step: FlowStep::Welcome,
            selected_coupon: None,
            sentiment: None,
            selected_partner: None,
            collected_email: None,
            generation: 0,
        }
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn selected_coupon(&self) -> Option<&SelectedCoupon> {
        self.selected_coupon.as_ref()
    }

    pub fn sentiment(&self) -> Option<Sentiment> {
        self.sentiment
    }

    pub fn selected_partner(&self) -> Option<Uuid> {
        self.selected_partner
    }

    pub fn collected_email(&self) -> Option<&str> {
        self.collected_email.as_deref()
    }

    /// Current transition generation. Capture this before a suspension point
    /// and check [`is_current`](Self::is_current) when the result arrives.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a captured generation still matches the engine state. Stale
    /// results must be discarded by the caller.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    fn transition(&mut self, step: FlowStep) {
        self.step = step;
        self.generation += 1;
    }

    fn expect_step(&self, expected: FlowStep, action: &str) -> Result<(), CoreError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "cannot {action} at step {:?}",
                self.step
            )))
        }
    }

    /// Leave the welcome screen, optionally scoped to a partner.
    ///
    /// The partner-picker step of the legacy flow is folded in here: when the
    /// visitor arrived through a partner page the partner id is recorded and
    /// the flow moves straight to the coupon picker.
    pub fn begin(&mut self, partner_id: Option<Uuid>) -> Result<(), CoreError> {
        self.expect_step(FlowStep::Welcome, "begin the flow")?;
        self.selected_partner = partner_id;
        self.transition(FlowStep::CouponPicker);
        Ok(())
    }

    /// Pick a real coupon and move to the survey.
    pub fn select_coupon(&mut self, coupon: SelectedCoupon) -> Result<(), CoreError> {
        self.expect_step(FlowStep::CouponPicker, "select a coupon")?;
        self.selected_coupon = Some(coupon);
        self.transition(FlowStep::Survey);
        Ok(())
    }

    /// Decline the coupon offer and move to the survey with nothing selected.
    pub fn skip_coupon(&mut self) -> Result<(), CoreError> {
        self.expect_step(FlowStep::CouponPicker, "skip the coupon")?;
        self.selected_coupon = None;
        self.transition(FlowStep::Survey);
        Ok(())
    }

    /// Finish the survey with the sentiment the last submission produced.
    ///
    /// Lands on congratulations only when a real coupon was picked;
    /// otherwise the flow goes straight to thank-you.
    pub fn complete_survey(&mut self, sentiment: Sentiment) -> Result<(), CoreError> {
        self.expect_step(FlowStep::Survey, "complete the survey")?;
        self.sentiment = Some(sentiment);
        if self.selected_coupon.is_some() {
            self.transition(FlowStep::Congratulations);
        } else {
            self.transition(FlowStep::ThankYou);
        }
        Ok(())
    }

    /// Answer the marketing opt-in prompt on the congratulations screen.
    ///
    /// Accepting detours through email collection; declining goes straight
    /// to thank-you.
    pub fn opt_in(&mut self, accepted: bool) -> Result<(), CoreError> {
        self.expect_step(FlowStep::Congratulations, "answer the opt-in prompt")?;
        if accepted {
            self.transition(FlowStep::EmailCollection);
        } else {
            self.transition(FlowStep::ThankYou);
        }
        Ok(())
    }

    /// Submit the email collected during opt-in.
    pub fn submit_email(&mut self, email: String) -> Result<(), CoreError> {
        self.expect_step(FlowStep::EmailCollection, "submit an email")?;
        self.collected_email = Some(email);
        self.transition(FlowStep::ThankYou);
        Ok(())
    }

    /// Back out of email collection without providing an address.
    pub fn skip_email(&mut self) -> Result<(), CoreError> {
        self.expect_step(FlowStep::EmailCollection, "skip email collection")?;
        self.transition(FlowStep::ThankYou);
        Ok(())
    }

    /// Leave the thank-you screen and reset for the next visitor.
    ///
    /// All selection state (coupon, sentiment, partner) is cleared. Returns
    /// the email collected earlier in the session, if any, so the caller can
    /// trigger the promotional email dispatch; the dispatch itself is
    /// fire-and-forget and must never block this reset.
    pub fn finish(&mut self) -> Result<Option<String>, CoreError> {
        self.expect_step(FlowStep::ThankYou, "finish the flow")?;
        self.selected_coupon = None;
        self.sentiment = None;
        self.selected_partner = None;
        let email = self.collected_email.take();
        self.transition(FlowStep::Welcome);
        Ok(email)
    }
}

impl Default for FlowEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn coupon() -> SelectedCoupon {
        SelectedCoupon {
            id: Uuid::new_v4(),
            code: "SAVE10".to_string(),
        }
    }

    #[test]
    fn full_flow_with_a_real_coupon_visits_congratulations() {
        let mut engine = FlowEngine::new();
        engine.begin(None).unwrap();
        engine.select_coupon(coupon()).unwrap();
        engine.complete_survey(Sentiment::Happy).unwrap();
        assert_eq!(engine.step(), FlowStep::Congratulations);

        engine.opt_in(false).unwrap();
        assert_eq!(engine.step(), FlowStep::ThankYou);
    }

    #[test]
    fn skipping_the_coupon_skips_congratulations() {
        let mut engine = FlowEngine::new();
        engine.begin(None).unwrap();
        engine.skip_coupon().unwrap();
        engine.complete_survey(Sentiment::Sad).unwrap();
        assert_eq!(engine.step(), FlowStep::ThankYou);
    }

    #[test]
    fn opt_in_yes_detours_through_email_collection() {
        let mut engine = FlowEngine::new();
        engine.begin(None).unwrap();
        engine.select_coupon(coupon()).unwrap();
        engine.complete_survey(Sentiment::Neutral).unwrap();
        engine.opt_in(true).unwrap();
        assert_eq!(engine.step(), FlowStep::EmailCollection);

        engine.submit_email("visitor@example.com".to_string()).unwrap();
        assert_eq!(engine.step(), FlowStep::ThankYou);

        let email = engine.finish().unwrap();
        assert_eq!(email.as_deref(), Some("visitor@example.com"));
    }

    #[test]
    fn finish_always_resets_selection_state() {
        let partner = Uuid::new_v4();
        let mut engine = FlowEngine::new();
        engine.begin(Some(partner)).unwrap();
        engine.select_coupon(coupon()).unwrap();
        engine.complete_survey(Sentiment::Happy).unwrap();
        engine.opt_in(false).unwrap();

        engine.finish().unwrap();
        assert_eq!(engine.step(), FlowStep::Welcome);
        assert!(engine.selected_coupon().is_none());
        assert!(engine.sentiment().is_none());
        assert!(engine.selected_partner().is_none());
        assert!(engine.collected_email().is_none());
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut engine = FlowEngine::new();
        assert_matches!(engine.skip_coupon(), Err(CoreError::Conflict(_)));
        assert_matches!(
            engine.complete_survey(Sentiment::Happy),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(engine.finish(), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn generation_advances_on_every_transition() {
        let mut engine = FlowEngine::new();
        let before = engine.generation();
        assert!(engine.is_current(before));

        engine.begin(None).unwrap();
        assert!(!engine.is_current(before));

        // A result captured before the transition must be discarded.
        let captured = engine.generation();
        engine.skip_coupon().unwrap();
        assert!(!engine.is_current(captured));
        assert!(engine.is_current(engine.generation()));
    }
}
