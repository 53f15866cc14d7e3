//! Headless TreeComboBox walkthrough.
//!
//! Builds a small folder tree, then drives the combo box with synthetic
//! input the way a host toolkit would, printing what gets painted.
//!
//! Run with: cargo run -p tree-combo --example headless
//! Set `RUST_LOG=tree_combo=debug` to see the popup lifecycle.

use std::sync::Arc;

use tree_combo::prelude::*;
use tree_combo::widget::PaintCommand;
use tracing_subscriber::EnvFilter;

fn build_model() -> Arc<TreeModel<StandardItem>> {
    let model = Arc::new(TreeModel::<StandardItem>::new().with_column_count(2));

    let projects = model.add_root(
        StandardItem::new("Projects")
            .with_column("/srv/projects")
            .with_icon(Icon::from_name("folder")),
    );
    for name in ["engine", "tree-combo"] {
        model.add_child(
            projects,
            StandardItem::new(name)
                .with_column(format!("/srv/projects/{name}"))
                .with_icon(Icon::from_name("folder-git")),
        );
    }
    model.add_root(
        StandardItem::new("Scratch")
            .with_column("/tmp/scratch")
            .with_icon(Icon::from_name("folder-temp")),
    );
    model
}

fn print_frame(combo: &TreeComboBox) {
    let mut painter = RecordingPainter::new();
    combo.paint(&mut painter);
    for command in painter.commands() {
        match command {
            PaintCommand::ComboLabel { text, icon, .. } => {
                let icon = icon.as_ref().and_then(Icon::name).unwrap_or("-");
                println!("  label: {text:?} [{icon}]");
            }
            PaintCommand::ViewItem { text: Some(text), rect, .. } => {
                println!("  row:   {text} at x={}", rect.left());
            }
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = TreeComboConfig::from_toml_str(
        r#"
        showing_icon = true
        index_column = 1
        placeholder = "Choose a folder"
        "#,
    )?;

    let model = build_model();
    let mut combo = TreeComboBox::with_config(&config);
    combo.set_model(model.clone());
    combo
        .current_text_changed
        .connect(|text| println!("-> current text changed to {text:?}"));

    println!("Closed:");
    print_frame(&combo);

    combo.event(&mut WidgetEvent::left_press((10.0, 10.0)));
    println!("Open:");
    print_frame(&combo);

    // Expand "Projects" with its indicator; the popup stays open.
    let indicator = (8.0, 12.0);
    combo.popup_event(&mut WidgetEvent::left_press(indicator));
    combo.popup_event(&mut WidgetEvent::left_release(indicator));
    println!("Expanded:");
    print_frame(&combo);

    // Pick "tree-combo", the third row.
    let row = (120.0, 60.0);
    combo.popup_event(&mut WidgetEvent::left_press(row));
    combo.popup_event(&mut WidgetEvent::left_release(row));
    println!("Picked:");
    print_frame(&combo);

    let picked = combo.current_model_index();
    println!(
        "current model index: {:?} ({})",
        picked,
        model.display_text(&picked).unwrap_or_default()
    );

    Ok(())
}
