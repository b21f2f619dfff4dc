//! Setup-time validation and build-level degradation.

mod helpers;

use helpers::{override_compiler, project_with};
use std::path::PathBuf;
use whitelabel::{
    ModuleOverrideOptions, ModuleOverridePlugin, OverrideContext, OverrideError,
};
use whitelabel_host::{DiagnosticSeverity, EntryPoints};

#[test]
fn output_path_without_override_placeholder_fails_before_any_build() {
    let error = ModuleOverridePlugin::new(
        ModuleOverrideOptions::new()
            .with_overrides(["brandA"])
            .with_output_path("{name}/bundle"),
    )
    .expect_err("configuration error");

    assert!(matches!(
        error,
        OverrideError::MissingOverridePlaceholder { ref output_path } if output_path == "{name}/bundle"
    ));
    assert!(error.to_string().contains("{override}"));
}

#[tokio::test]
async fn empty_overrides_degrade_to_one_build_error() {
    let project = project_with(&[
        ("src/index.js", "import \"./theme.js\";\n"),
        ("src/theme.js", "export const theme = \"base-theme\";\n"),
        ("src/theme.brandA.js", "export const theme = \"brandA-theme\";\n"),
    ]);

    let compiler = override_compiler(
        project.path(),
        EntryPoints::Single(PathBuf::from("src/index.js")),
        &[],
    );
    let output = compiler.run().await.expect("build still succeeds");

    // Exactly one build-level error entry, no variant outputs, and no
    // substitution anywhere even though a tagged sibling exists on disk.
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].severity, DiagnosticSeverity::Error);
    assert!(output.diagnostics[0].message.contains("overrides"));

    assert_eq!(output.asset_names(), ["main"]);
    let main = output.asset("main").expect("base chunk");
    assert!(main.source.as_str().contains("base-theme"));
    assert!(!main.source.as_str().contains("brandA-theme"));

    let context = output
        .compilation
        .extensions()
        .get::<OverrideContext>()
        .expect("context still installed");
    assert!(context.is_empty());
}

#[tokio::test]
async fn options_can_come_from_json_config() {
    let project = project_with(&[
        ("src/index.js", "export default 1;\n"),
        ("src/index.brandA.js", "export default 2;\n"),
    ]);

    let options: ModuleOverrideOptions = serde_json::from_str(
        r#"{ "overrides": ["brandA"], "output_path": "variants/{override}/{name}" }"#,
    )
    .expect("valid config");
    let plugin = ModuleOverridePlugin::new(options).expect("valid options");

    let compiler = whitelabel_host::Compiler::new(
        project.path(),
        EntryPoints::Single(PathBuf::from("src/index.js")),
        whitelabel_host::test_utils::TestModuleFactory::new(),
    )
    .with_plugin(std::sync::Arc::new(plugin))
    .with_loader(std::sync::Arc::new(
        whitelabel::OverrideDiscoveryLoader::new(),
    ));

    let output = compiler.run().await.expect("build succeeds");
    assert!(output.asset("variants/brandA/main").is_some());
}

#[test]
fn duplicate_variant_names_are_a_configuration_error() {
    let plugin = ModuleOverridePlugin::new(
        ModuleOverrideOptions::new()
            .with_overrides(["brandA"])
            .with_output_path("{override}"),
    )
    .expect("placeholder present, construction succeeds");

    let mut named = indexmap::IndexMap::new();
    named.insert(
        "app".to_string(),
        whitelabel_host::EntryItem::Single(PathBuf::from("src/app.js")),
    );
    named.insert(
        "admin".to_string(),
        whitelabel_host::EntryItem::Single(PathBuf::from("src/admin.js")),
    );

    let compiler = whitelabel_host::Compiler::new(
        "/project",
        EntryPoints::Named(named),
        whitelabel_host::test_utils::TestModuleFactory::new(),
    )
    .with_plugin(std::sync::Arc::new(plugin));

    let error = compiler
        .apply_entry_options()
        .expect_err("both entries collapse onto \"brandA\"");
    assert!(error.to_string().contains("collapsed onto one output name"));
}
