//! Default value tests for fieldset-config.
// crates/fieldset-config/tests/config_defaults.rs
// =============================================================================
// Module: Config Default Tests
// Description: Verify defaults applied to empty and partial configs.
// Purpose: Keep the documented policy defaults stable.
// =============================================================================

use fieldset_config::DEFAULT_MAX_INPUT_BYTES;
use fieldset_config::FieldsetConfig;
use fieldset_core::DEFAULT_MAX_DEPTH;

mod common;

use common::TestResult;
use common::config_from_toml;

#[test]
fn empty_config_uses_defaults() -> TestResult {
    let config = config_from_toml("").map_err(|err| err.to_string())?;
    if config != FieldsetConfig::default() {
        return Err("empty config should equal the default config".to_string());
    }
    if !config.resolve.inject_defaults || config.resolve.include_hidden {
        return Err("default policy should inject defaults and drop hidden fields".to_string());
    }
    if config.limits.max_depth != DEFAULT_MAX_DEPTH {
        return Err(format!("unexpected max_depth {}", config.limits.max_depth));
    }
    if config.limits.max_input_bytes != DEFAULT_MAX_INPUT_BYTES {
        return Err(format!("unexpected max_input_bytes {}", config.limits.max_input_bytes));
    }
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn partial_section_keeps_remaining_defaults() -> TestResult {
    let config = config_from_toml("[resolve]\ninclude_hidden = true\n")
        .map_err(|err| err.to_string())?;
    if !config.resolve.inject_defaults {
        return Err("inject_defaults should default to true".to_string());
    }
    if !config.resolve.include_hidden {
        return Err("include_hidden should be read from the file".to_string());
    }
    Ok(())
}

#[test]
fn resolve_options_follow_config() -> TestResult {
    let config = FieldsetConfig::from_toml(
        "[resolve]\ninject_defaults = false\ninclude_hidden = true\n[limits]\nmax_depth = 4\n",
    )
    .map_err(|err| err.to_string())?;
    let options = config.resolve_options();
    if options.inject_defaults || !options.include_hidden {
        return Err("options should mirror the resolve section".to_string());
    }
    if options.max_depth != 4 {
        return Err(format!("unexpected max_depth {}", options.max_depth));
    }
    if options.flatten_only || options.already_resolved {
        return Err("internal flags must stay off".to_string());
    }
    Ok(())
}

#[test]
fn wrong_value_type_is_parse_error() -> TestResult {
    common::assert_invalid(
        FieldsetConfig::from_toml("[resolve]\ninject_defaults = \"yes\"\n"),
        "config parse error",
    )
}
