use super::*;

#[test]
fn test_enter_until_limit() {
    let mut counter = DepthCounter::new(2);
    assert_eq!(counter.enter(), Ok(()));
    assert_eq!(counter.enter(), Ok(()));
    assert_eq!(counter.enter(), Err(DepthExceeded { limit: 2 }));
    assert_eq!(counter.depth(), 2);
}

#[test]
fn test_exit_frees_a_level() {
    let mut counter = DepthCounter::new(1);
    assert!(counter.enter().is_ok());
    counter.exit();
    assert_eq!(counter.depth(), 0);
    assert!(counter.enter().is_ok());
}

#[test]
fn test_default_limit_and_message() {
    let counter = DepthCounter::default();
    assert_eq!(counter.depth(), 0);
    assert_eq!(
        DepthExceeded {
            limit: DepthCounter::DEFAULT_LIMIT
        }
        .to_string(),
        "maximum recursion depth of 1000 exceeded"
    );
}
