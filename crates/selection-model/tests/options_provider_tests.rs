//! Tests for the application-wide defaults provider.
//!
//! Kept in their own test binary: the defaults are process-wide.

use std::sync::Arc;

use selection_model::{
    default_options, reset_default_options, set_default_options, ClickEvent, ClickHistory,
    GroupKeyRegistry, KeyboardModifiers, ListSource, Record, Selectable, SelectionBinding,
    SelectionMode, SelectionOptionsOverride,
};

#[test]
fn test_bindings_start_from_application_defaults() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let overrides = SelectionOptionsOverride::from_toml(
        r#"
        mode = "multiple"
        selected-attribute = "is_picked"
        "#,
    )
    .unwrap();
    set_default_options(&overrides);
    assert_eq!(default_options().mode, SelectionMode::Multi);

    let items: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|label| Arc::new(Record::new(label)))
        .collect();
    let build = |overrides: Option<SelectionOptionsOverride>| {
        let builder = SelectionBinding::<Record>::builder()
            .source(ListSource::new(items.clone()))
            .history(Arc::new(ClickHistory::new()))
            .group_keys(Arc::new(GroupKeyRegistry::new()));
        match overrides {
            Some(overrides) => builder.overrides(&overrides),
            None => builder,
        }
    };

    let mut binding = build(None).build().unwrap();
    assert_eq!(binding.options().selected_attribute, "is_picked");
    binding.handle_click(&ClickEvent::new(items[0].clone()));
    binding.handle_click(
        &ClickEvent::new(items[2].clone()).with_modifiers(KeyboardModifiers::SHIFT),
    );
    assert!(items.iter().all(|item| item.flag("is_picked")));
    drop(binding);

    // Per-binding overrides win over the application defaults.
    let single = SelectionOptionsOverride {
        mode: Some(SelectionMode::Single),
        ..Default::default()
    };
    let binding = build(Some(single)).build().unwrap();
    assert_eq!(binding.options().mode, SelectionMode::Single);
    assert_eq!(binding.options().selected_attribute, "is_picked");
    drop(binding);

    reset_default_options();
    let binding = build(None).build().unwrap();
    assert_eq!(binding.options().mode, SelectionMode::Single);
    assert_eq!(binding.options().selected_attribute, "selected");
}
