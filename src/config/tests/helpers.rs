//! Shared test helpers for configuration tests.

use std::collections::HashMap;

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::WatchConfig;

/// Applies a configuration layer to the composer based on the layer type.
pub fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

/// Composes a [`WatchConfig`] from a sequence of `(layer_type, value)` pairs.
pub fn build_config_from_layers(layers: &[(&str, Value)]) -> WatchConfig {
    let mut composer = MergeComposer::new();

    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value.clone());
    }

    WatchConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}

/// Configuration with every required input set.
pub fn complete_config() -> WatchConfig {
    WatchConfig {
        github_token: Some("ghp_example".to_owned()),
        github_repo: Some("octo/widgets".to_owned()),
        commit_sha: Some("abc123".to_owned()),
        slack_webhook: Some("https://hooks.example.com/services/T000".to_owned()),
        ..WatchConfig::default()
    }
}

/// Builds a fallback lookup over a fixed set of variables.
pub fn fallback_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let variables: HashMap<String, String> = pairs
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();
    move |name| variables.get(name).cloned()
}

/// Fallback lookup that never finds a variable.
pub fn no_fallback(_name: &str) -> Option<String> {
    None
}
