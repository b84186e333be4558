//! Button Components

use dioxus::prelude::*;

/// Button style variants
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ButtonVariant {
    /// Main action
    #[default]
    Primary,
    /// Secondary action
    Ghost,
    /// Destructive or state-stopping action
    Danger,
    /// Small inline toggle
    Chip,
}

impl ButtonVariant {
    /// Returns the CSS class for this variant
    pub fn class(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "btn-primary",
            ButtonVariant::Ghost => "btn-ghost",
            ButtonVariant::Danger => "btn-danger",
            ButtonVariant::Chip => "btn-chip",
        }
    }
}

#[derive(Clone, PartialEq, Props)]
pub struct ButtonProps {
    #[props(default)]
    pub variant: ButtonVariant,
    pub children: Element,
    #[props(default)]
    pub onclick: Option<EventHandler<()>>,
    #[props(default = false)]
    pub disabled: bool,
    /// Shows a spinner and disables the button
    #[props(default = false)]
    pub busy: bool,
    #[props(default)]
    pub class: Option<String>,
}

/// Styled button
///
/// # Example
///
/// ```rust,ignore
/// rsx! {
///     Button {
///         variant: ButtonVariant::Primary,
///         busy: status.read().is_exporting,
///         onclick: move |_| export.run.call(()),
///         "Export Logs"
///     }
/// }
/// ```
#[component]
pub fn Button(props: ButtonProps) -> Element {
    let full_class = button_class(props.variant, props.class.as_deref());
    let disabled = props.disabled || props.busy;

    rsx! {
        button {
            class: "{full_class}",
            r#type: "button",
            disabled: disabled,
            onclick: move |_| {
                if let Some(handler) = &props.onclick {
                    handler.call(());
                }
            },
            if props.busy {
                span { class: "spinner" }
            }
            {props.children}
        }
    }
}

fn button_class(variant: ButtonVariant, extra: Option<&str>) -> String {
    match extra {
        Some(extra) if !extra.is_empty() => format!("btn {} {}", variant.class(), extra),
        _ => format!("btn {}", variant.class()),
    }
}
