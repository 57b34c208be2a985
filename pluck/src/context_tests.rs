use super::*;

#[test]
fn test_verbosity_from_count() {
    assert_eq!(VerbosityLevel::from_count(0), VerbosityLevel::Normal);
    assert_eq!(VerbosityLevel::from_count(1), VerbosityLevel::Verbose);
    assert_eq!(VerbosityLevel::from_count(2), VerbosityLevel::VeryVerbose);
    assert_eq!(VerbosityLevel::from_count(3), VerbosityLevel::Trace);
    assert_eq!(VerbosityLevel::from_count(200), VerbosityLevel::Trace);
}

#[test]
fn test_verbosity_levels_are_ordered() {
    assert!(VerbosityLevel::Normal < VerbosityLevel::Verbose);
    assert!(VerbosityLevel::Verbose < VerbosityLevel::VeryVerbose);
    assert!(VerbosityLevel::VeryVerbose < VerbosityLevel::Trace);
}

#[test]
fn test_explicit_cli_flag_wins() {
    // Holds no matter what PLUCK_COLOR is set to in the test environment
    let ctx = AppContext::build(ColorChoice::Never, VerbosityLevel::Verbose);
    assert_eq!(ctx.color, ColorChoice::Never);
    assert_eq!(ctx.verbosity, VerbosityLevel::Verbose);
}

#[test]
fn test_color_precedence() {
    unsafe {
        std::env::remove_var("PLUCK_COLOR");
    }
    let ctx = AppContext::build(ColorChoice::Auto, VerbosityLevel::Normal);
    assert_eq!(ctx.color, ColorChoice::Auto);

    unsafe {
        std::env::set_var("PLUCK_COLOR", "always");
    }
    let ctx = AppContext::build(ColorChoice::Auto, VerbosityLevel::Normal);
    assert_eq!(ctx.color, ColorChoice::Always);

    // An explicit CLI flag beats the environment variable
    let ctx = AppContext::build(ColorChoice::Never, VerbosityLevel::Normal);
    assert_eq!(ctx.color, ColorChoice::Never);

    unsafe {
        std::env::remove_var("PLUCK_COLOR");
    }
}
