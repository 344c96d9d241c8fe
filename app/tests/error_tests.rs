use sharecab::error::ShareCabError;
use sharecab::types::RideStatus;

// Test Display implementation for Config variant
#[test]
fn test_config_error_display() {
    let err = ShareCabError::Config("Invalid PROGRESS_STEP".to_string());
    assert_eq!(err.to_string(), "Configuration error: Invalid PROGRESS_STEP");
}

// Test Display implementation for Validation variant
#[test]
fn test_validation_error_display() {
    let err = ShareCabError::Validation("Pickup location is required".to_string());
    assert_eq!(
        err.to_string(),
        "Validation error: Pickup location is required"
    );
}

// Test Display implementation for NotFound variant
#[test]
fn test_not_found_error_display() {
    let err = ShareCabError::NotFound("Driver 42".to_string());
    assert_eq!(err.to_string(), "Not found: Driver 42");
}

// Test Display implementation for InvalidTransition variant
#[test]
fn test_invalid_transition_display() {
    let err = ShareCabError::InvalidTransition {
        from: RideStatus::Arriving,
        to: RideStatus::Ongoing,
    };
    assert_eq!(
        err.to_string(),
        "Invalid ride status transition: arriving -> ongoing"
    );
}

// Test Display implementation for AlreadyTracked variant
#[test]
fn test_already_tracked_display() {
    let err = ShareCabError::AlreadyTracked("RIDE-1234ABCD".to_string());
    assert_eq!(
        err.to_string(),
        "Ride RIDE-1234ABCD is already being tracked"
    );
}

// Test Display implementation for SessionClosed variant
#[test]
fn test_session_closed_display() {
    let err = ShareCabError::SessionClosed;
    assert_eq!(err.to_string(), "Ride session has been closed");
}

// Test that ShareCabError implements std::error::Error
#[test]
fn test_error_trait_implementation() {
    let err: Box<dyn std::error::Error> =
        Box::new(ShareCabError::Config("test".to_string()));
    assert!(err.to_string().contains("Configuration error"));
}

// Test Debug implementation
#[test]
fn test_debug_implementation() {
    let err = ShareCabError::Validation("bad OTP".to_string());
    let debug_str = format!("{err:?}");
    assert!(debug_str.contains("Validation"));
    assert!(debug_str.contains("bad OTP"));
}
