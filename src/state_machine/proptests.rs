//! Property-based tests for the session state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::api_client::{ApiError, FeedbackType, Language, LegalField, QueryResponse, ReferenceDocument};
use proptest::prelude::*;
use std::collections::HashMap;

// ============================================================================
// Simulated backend
// ============================================================================

/// A user action together with how the backend will answer it
#[derive(Debug, Clone)]
enum Action {
    Query { text: String, succeed: bool },
    Feedback {
        kind: FeedbackType,
        correction: Option<String>,
        succeed: bool,
    },
    Reflect { succeed: bool },
    Clear,
    Settings(SettingsPatch),
}

#[derive(Debug, Default)]
struct Backend {
    next_id: u32,
    accepted_feedback: HashMap<String, usize>,
}

impl Backend {
    fn answer(&mut self) -> QueryResponse {
        self.next_id += 1;
        QueryResponse {
            query_id: format!("q{}", self.next_id),
            answer: "Answer".to_string(),
            retrieved_documents: vec![ReferenceDocument {
                text: "Article".to_string(),
                score: 0.5,
                metadata: None,
            }],
            reflection: None,
        }
    }

    /// Dispatch an action and resolve every remote effect it produces
    fn drive(&mut self, state: &SessionState, action: Action) -> SessionState {
        let (event, succeed) = match action {
            Action::Query { text, succeed } => (
                Event::SubmitQuery {
                    text,
                    field: LegalField::Criminal,
                    language: Language::En,
                },
                succeed,
            ),
            Action::Feedback {
                kind,
                correction,
                succeed,
            } => (
                Event::SubmitFeedback {
                    kind,
                    correction_text: correction,
                    comments: None,
                },
                succeed,
            ),
            Action::Reflect { succeed } => (Event::RequestReflection, succeed),
            Action::Clear => (Event::Clear, true),
            Action::Settings(patch) => (Event::UpdateSettings(patch), true),
        };

        let Ok(result) = transition(state, event) else {
            return state.clone();
        };

        let mut current = result.new_state;
        for effect in result.effects {
            let outcome = match effect {
                Effect::SendQuery(_) if succeed => Event::QueryAnswered {
                    response: self.answer(),
                },
                Effect::SendQuery(_) => Event::QueryFailed {
                    error: ApiError::network("down"),
                },
                Effect::SendFeedback(request) if succeed => {
                    *self
                        .accepted_feedback
                        .entry(request.query_id.clone())
                        .or_default() += 1;
                    Event::FeedbackAccepted {
                        query_id: request.query_id,
                        kind: request.feedback_type,
                        correction_text: request.correction_text,
                    }
                }
                Effect::SendFeedback(request) => Event::FeedbackFailed {
                    query_id: request.query_id,
                    error: ApiError::status(500, ""),
                },
                Effect::RequestReflection { query_id } if succeed => Event::ReflectionReceived {
                    query_id,
                    reflection: "Reflection".to_string(),
                },
                Effect::RequestReflection { query_id } => Event::ReflectionFailed {
                    query_id,
                    error: ApiError::timeout("slow"),
                },
                Effect::Notify(_) => continue,
            };
            current = transition(&current, outcome)
                .expect("backend outcome must apply")
                .new_state;
        }
        current
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_short_text() -> impl Strategy<Value = String> {
    "[ \t\n]{0,4}[a-zA-Zé?]{0,2}[ \t\n]{0,4}"
}

fn arb_valid_text() -> impl Strategy<Value = String> {
    "[a-zA-Z]{3}[a-zA-Z ?]{0,40}"
}

fn arb_feedback_type() -> impl Strategy<Value = FeedbackType> {
    prop_oneof![
        Just(FeedbackType::Positive),
        Just(FeedbackType::Negative),
        Just(FeedbackType::Correction),
    ]
}

fn arb_settings_patch() -> impl Strategy<Value = SettingsPatch> {
    (
        proptest::option::of(any::<f32>()),
        proptest::option::of(any::<u32>()),
        proptest::option::of(any::<u32>()),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(temperature, max_tokens, top_k, enable_reflection)| SettingsPatch {
            temperature,
            max_tokens,
            top_k,
            enable_reflection,
        })
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => (arb_valid_text(), any::<bool>())
            .prop_map(|(text, succeed)| Action::Query { text, succeed }),
        1 => (arb_short_text(), any::<bool>())
            .prop_map(|(text, succeed)| Action::Query { text, succeed }),
        3 => (
            arb_feedback_type(),
            proptest::option::of("[a-z ]{0,10}"),
            any::<bool>()
        )
            .prop_map(|(kind, correction, succeed)| Action::Feedback {
                kind,
                correction,
                succeed
            }),
        2 => any::<bool>().prop_map(|succeed| Action::Reflect { succeed }),
        1 => Just(Action::Clear),
        1 => arb_settings_patch().prop_map(Action::Settings),
    ]
}

fn answered_state(backend: &mut Backend) -> SessionState {
    backend.drive(
        &SessionState::new(),
        Action::Query {
            text: "Explain Article 5".to_string(),
            succeed: true,
        },
    )
}

fn settings_in_range(settings: &QuerySettings) -> bool {
    TEMPERATURE_RANGE.contains(&settings.temperature)
        && MAX_TOKENS_RANGE.contains(&settings.max_tokens)
        && TOP_K_RANGE.contains(&settings.top_k)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Short questions never touch the conversation
    #[test]
    fn prop_short_query_rejected_without_mutation(text in arb_short_text()) {
        prop_assume!(text.trim().chars().count() < MIN_QUERY_CHARS);
        let mut backend = Backend::default();
        let state = answered_state(&mut backend);

        let result = transition(&state, Event::SubmitQuery {
            text,
            field: LegalField::Constitution,
            language: Language::Fr,
        });

        prop_assert!(matches!(result, Err(TransitionError::Validation(_))));
    }

    // Success appends user + assistant, failure appends only the user turn
    #[test]
    fn prop_query_appends_one_or_two_turns(text in arb_valid_text(), succeed in any::<bool>()) {
        let mut backend = Backend::default();
        let before = answered_state(&mut backend);

        let after = backend.drive(&before, Action::Query { text: text.clone(), succeed });

        let expected = if succeed { 2 } else { 1 };
        prop_assert_eq!(after.conversation.len(), before.conversation.len() + expected);
        prop_assert_eq!(&after.conversation[before.conversation.len()].content, &text);
        prop_assert_eq!(after.conversation.last().map(ConversationTurn::is_assistant), Some(succeed));
    }

    // The backend never accepts two feedbacks for one query id
    #[test]
    fn prop_feedback_at_most_once_per_query(actions in proptest::collection::vec(arb_action(), 0..30)) {
        let mut backend = Backend::default();
        let mut state = SessionState::new();

        for action in actions {
            state = backend.drive(&state, action);
            prop_assert!(state.activity.is_idle());
            for (query_id, count) in &backend.accepted_feedback {
                prop_assert!(*count <= 1, "query {} rated {} times", query_id, count);
                prop_assert!(matches!(
                    state.feedback_for(query_id),
                    Some(FeedbackStatus::Submitted(_))
                ));
            }
        }
    }

    // Reflection annotates, it never appends
    #[test]
    fn prop_reflection_preserves_length(
        prefix in proptest::collection::vec(arb_action(), 0..10),
        succeed in any::<bool>()
    ) {
        let mut backend = Backend::default();
        let mut state = SessionState::new();
        for action in prefix {
            state = backend.drive(&state, action);
        }

        let after = backend.drive(&state, Action::Reflect { succeed });

        prop_assert_eq!(after.conversation.len(), state.conversation.len());
        let contents = |s: &SessionState| -> Vec<String> {
            s.conversation.iter().map(|t| t.content.clone()).collect()
        };
        prop_assert_eq!(contents(&after), contents(&state));
    }

    // Settings stay in range whatever the user sends
    #[test]
    fn prop_settings_always_clamped(patches in proptest::collection::vec(arb_settings_patch(), 1..10)) {
        let mut state = SessionState::new();
        for patch in patches {
            state = transition(&state, Event::UpdateSettings(patch)).unwrap().new_state;
            prop_assert!(settings_in_range(&state.settings), "{:?}", state.settings);
        }
    }

    // Clear empties the chat but a fresh query still works
    #[test]
    fn prop_clear_then_query(
        prefix in proptest::collection::vec(arb_action(), 0..15),
        succeed in any::<bool>()
    ) {
        let mut backend = Backend::default();
        let mut state = SessionState::new();
        for action in prefix {
            state = backend.drive(&state, action);
        }
        let feedback_before = state.feedback_given.len();

        let cleared = backend.drive(&state, Action::Clear);
        prop_assert!(cleared.conversation.is_empty());
        prop_assert!(cleared.last_response.is_none());
        prop_assert_eq!(cleared.feedback_given.len(), feedback_before);
        prop_assert_eq!(cleared.settings, state.settings);

        let after = backend.drive(&cleared, Action::Query {
            text: "What is theft under the penal code?".to_string(),
            succeed,
        });
        prop_assert!(after.conversation.len() <= 2);
        prop_assert_eq!(after.conversation[0].role, Role::User);
    }
}
