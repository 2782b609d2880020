//! Coaching move selection tests.

use momentum::coaching::moves::{
    apply_move, assess_clarity, choose_coaching_move, detect_move_signals, Clarity,
};
use momentum::coaching::{CoachPolicyState, CoachingMove};
use momentum::signals::Signals;

#[test]
fn agency_beats_focus() {
    let signals = Signals {
        overwhelm: true,
        externalized_control: true,
        ..Signals::default()
    };
    assert_eq!(
        choose_coaching_move(&signals, Clarity::Normal),
        CoachingMove::Agency
    );
}

#[test]
fn priority_order_is_agency_focus_identity_ease() {
    let focus = Signals {
        overwhelm: true,
        self_story: true,
        resistance: true,
        ..Signals::default()
    };
    assert_eq!(choose_coaching_move(&focus, Clarity::Normal), CoachingMove::Focus);

    let identity = Signals {
        self_story: true,
        resistance: true,
        ..Signals::default()
    };
    assert_eq!(
        choose_coaching_move(&identity, Clarity::Normal),
        CoachingMove::Identity
    );

    let ease = Signals {
        resistance: true,
        ..Signals::default()
    };
    assert_eq!(choose_coaching_move(&ease, Clarity::Normal), CoachingMove::Ease);

    assert_eq!(
        choose_coaching_move(&Signals::default(), Clarity::Normal),
        CoachingMove::None
    );
}

#[test]
fn missed_day_alone_picks_no_move() {
    let signals = Signals {
        missed_day: true,
        ..Signals::default()
    };
    assert_eq!(choose_coaching_move(&signals, Clarity::Normal), CoachingMove::None);
}

#[test]
fn low_clarity_forces_none() {
    let signals = Signals {
        externalized_control: true,
        ..Signals::default()
    };
    assert_eq!(choose_coaching_move(&signals, Clarity::Low), CoachingMove::None);
}

#[test]
fn all_four_signals_mean_low_clarity() {
    let all = Signals {
        overwhelm: true,
        externalized_control: true,
        self_story: true,
        resistance: true,
        missed_day: false,
    };
    assert_eq!(assess_clarity(&all), Clarity::Low);
    let three = Signals {
        resistance: false,
        ..all
    };
    assert_eq!(assess_clarity(&three), Clarity::Normal);
}

#[test]
fn noisy_message_gets_no_move() {
    let message =
        "I'm overwhelmed, the market is dead, I'm bad at this and I don't want to call anyone";
    let (signals, clarity) = detect_move_signals(message);
    assert!(signals.all_move_signals());
    assert_eq!(clarity, Clarity::Low);
    let state = apply_move(&CoachPolicyState::new(), message);
    assert_eq!(state.current_move, CoachingMove::None);
}

#[test]
fn apply_move_stores_choice() {
    let state = apply_move(&CoachPolicyState::new(), "I have so much to do I'm drowning");
    assert_eq!(state.current_move, CoachingMove::Focus);
    let state = apply_move(&state, "Nobody is answering, it's out of my control");
    assert_eq!(state.current_move, CoachingMove::Agency);
}
