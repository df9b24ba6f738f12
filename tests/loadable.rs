use lookaround::model::{LoadError, Loadable};

fn net() -> LoadError {
    LoadError::network("offline")
}

fn timeout() -> LoadError {
    LoadError::Timeout { after_ms: 10_000 }
}

/// Every variant, with `7` as the value where one is carried.
fn all() -> Vec<Loadable<i32>> {
    vec![
        Loadable::Empty,
        Loadable::LoadingFirst,
        Loadable::LoadingNext { value: 7 },
        Loadable::Ready { value: 7 },
        Loadable::FailedFirst { error: net() },
        Loadable::FailedNext {
            value: 7,
            error: net(),
        },
    ]
}

/// Test the loading column of the transition table.
#[test]
fn test_with_loading_in_progress_table() {
    let expected = vec![
        Loadable::LoadingFirst,
        Loadable::LoadingFirst,
        Loadable::LoadingNext { value: 7 },
        Loadable::LoadingNext { value: 7 },
        Loadable::LoadingFirst,
        Loadable::LoadingNext { value: 7 },
    ];
    let actual: Vec<_> = all().into_iter().map(Loadable::with_loading_in_progress).collect();
    assert_eq!(actual, expected);
}

/// Test the cleared-error column of the transition table.
#[test]
fn test_with_cleared_error_table() {
    let expected = vec![
        Loadable::Empty,
        Loadable::Empty,
        Loadable::LoadingNext { value: 7 },
        Loadable::Ready { value: 7 },
        Loadable::Empty,
        Loadable::Ready { value: 7 },
    ];
    let actual: Vec<_> = all().into_iter().map(Loadable::with_cleared_error).collect();
    assert_eq!(actual, expected);
}

/// Test that clearing the error twice equals clearing it once.
#[test]
fn test_with_cleared_error_is_idempotent() {
    for v in all() {
        let once = v.with_cleared_error();
        assert_eq!(once.clone().with_cleared_error(), once);
    }
}

/// Test that an error goes to FailedFirst without a value and FailedNext with one.
#[test]
fn test_with_error_table() {
    for v in all() {
        let had_value = v.value().copied();
        let failed = v.with_error(timeout());
        match had_value {
            Some(value) => assert_eq!(
                failed,
                Loadable::FailedNext {
                    value,
                    error: timeout()
                }
            ),
            None => assert_eq!(failed, Loadable::FailedFirst { error: timeout() }),
        }
    }
}

/// Test that mapping the identity keeps every variant and its tag.
#[test]
fn test_map_identity_preserves_structure() {
    for v in all() {
        let tag = v.tag();
        let mapped = v.clone().map(|x| x);
        assert_eq!(mapped, v);
        assert_eq!(mapped.tag(), tag);
    }
}

/// Test that map transforms the carried value only.
#[test]
fn test_map_transforms_value() {
    let mapped = Loadable::FailedNext {
        value: 2,
        error: net(),
    }
    .map(|x| x.to_string());
    assert_eq!(
        mapped,
        Loadable::FailedNext {
            value: "2".to_string(),
            error: net()
        }
    );
}

/// Test the predicates against each variant.
#[test]
fn test_predicates() {
    let loading: Vec<bool> = all().iter().map(Loadable::is_loading).collect();
    assert_eq!(loading, [false, true, true, false, false, false]);

    let ready: Vec<bool> = all().iter().map(Loadable::is_ready).collect();
    assert_eq!(ready, [false, false, false, true, false, false]);

    let failed: Vec<bool> = all().iter().map(Loadable::is_failed).collect();
    assert_eq!(failed, [false, false, false, false, true, true]);

    let has_value: Vec<bool> = all().iter().map(Loadable::has_value).collect();
    assert_eq!(has_value, [false, false, true, true, false, true]);
}

/// Test that is_failed_with only matches failures satisfying the predicate.
#[test]
fn test_is_failed_with() {
    let failed = Loadable::<i32>::FailedFirst { error: net() };
    assert!(failed.is_failed_with(|e| e.is_transient()));
    assert!(!failed.is_failed_with(|e| *e == LoadError::EmptyResponse));
    assert!(!Loadable::Ready { value: 1 }.is_failed_with(|_| true));
}

/// Test that every error variant has a user-facing message.
#[test]
fn test_error_messages() {
    let errors = [
        LoadError::BlankQuery,
        LoadError::QueryTooShort,
        net(),
        timeout(),
        LoadError::EmptyResponse,
        LoadError::LocationDisabled,
        LoadError::LocationPermissionDenied,
        LoadError::LocationUpdateFailure,
    ];
    for error in errors {
        assert!(!error.to_string().is_empty());
    }
    assert!(LoadError::QueryTooShort.is_validation());
    assert!(!LoadError::EmptyResponse.is_transient());
}
