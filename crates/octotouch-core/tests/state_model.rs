use octotouch_core::{ClientError, MacroState, RawPrinterState, StateBucket};
use proptest::prelude::*;

#[test]
fn test_every_known_state_has_a_named_bucket() {
    for state in RawPrinterState::known() {
        assert_ne!(state.bucket(), StateBucket::Unrecognized, "{state}");
    }
}

#[test]
fn test_connecting_message_uses_state_text() {
    let state = RawPrinterState::parse("Detecting");
    assert_eq!(format!("{state}..."), "Detecting...");
}

#[test]
fn test_splash_and_hold_share_a_screen_kind() {
    assert!(MacroState::ErrorHold.is_splash());
    assert!(!MacroState::Idle.is_splash());
    assert_eq!(MacroState::Splash("x".into()).to_string(), "splash(x)");
}

#[test]
fn test_client_error_display_keeps_transport_detail() {
    let err = ClientError::Http {
        status: 500,
        url: "http://octopi/api/job".into(),
        body: "Internal Server Error".into(),
    };
    assert!(err.to_string().contains("500"));
    assert_eq!(err.status(), Some(500));
    assert!(err.humanize().starts_with("Unexpected error: "));
}

proptest! {
    #[test]
    fn prop_parse_never_loses_text(text in "[A-Za-z ]{0,24}") {
        let state = RawPrinterState::parse(&text);
        prop_assert_eq!(state.as_str(), text.trim());
    }

    #[test]
    fn prop_unrecognized_only_for_unknown_text(text in "[a-z]{1,12}") {
        // lower-case text never matches OctoPrint's capitalised names
        prop_assert_eq!(RawPrinterState::parse(&text).bucket(), StateBucket::Unrecognized);
    }
}
