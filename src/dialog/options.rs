//! Dialog creation options and their normalisation into records.

use serde::{Deserialize, Serialize};

use super::{Dialog, DialogId, DialogProperty, DialogState, Position};
use crate::config::{DialogDefaults, FallbackPolicy, ViewportConfig};

/// Everything a caller may say about a new dialog. All fields are optional.
///
/// Field names serialize in camelCase so options coming from a web frontend
/// deserialize directly. Unset fields are skipped when serializing, which
/// keeps the content hash of `{}` and of an all-`None` value identical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DialogId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StateOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximized: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resizable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub always_on_top: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl DialogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<DialogId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(PositionOptions {
            x: Some(x),
            y: Some(y),
        });
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        let property = self.property.get_or_insert_with(PropertyOptions::default);
        property.width = Some(width);
        property.height = Some(height);
        self
    }

    pub fn with_property(mut self, property: PropertyOptions) -> Self {
        self.property = Some(property);
        self
    }

    pub fn with_state(mut self, state: StateOptions) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_args(mut self, args: serde_json::Value) -> Self {
        self.args = Some(args);
        self
    }
}

impl FallbackPolicy {
    /// Returns the value if it counts as set. Non-finite numbers never do.
    pub fn number(self, value: Option<f64>) -> Option<f64> {
        let value = value.filter(|v| v.is_finite());
        match self {
            FallbackPolicy::Presence => value,
            FallbackPolicy::Falsy => value.filter(|v| *v != 0.0),
        }
    }

    /// Like [`FallbackPolicy::number`], additionally rejecting negative sizes.
    pub fn dimension(self, value: Option<f64>) -> Option<f64> {
        self.number(value).filter(|v| *v >= 0.0)
    }

    pub fn text(self, value: Option<&str>) -> Option<&str> {
        match self {
            FallbackPolicy::Presence => value,
            FallbackPolicy::Falsy => value.filter(|v| !v.is_empty()),
        }
    }

    pub fn flag(self, value: Option<bool>) -> Option<bool> {
        match self {
            FallbackPolicy::Presence => value,
            FallbackPolicy::Falsy => value.filter(|v| *v),
        }
    }
}

/// Inputs, besides the options themselves, needed to build a record.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub defaults: &'a DialogDefaults,
    pub viewport: ViewportConfig,
    pub policy: FallbackPolicy,
}

impl DialogOptions {
    /// Builds a fresh record, filling every unset field from `ctx`.
    pub fn resolve<P>(&self, id: DialogId, payload: P, ctx: ResolveContext<'_>) -> Dialog<P> {
        let policy = ctx.policy;
        let property = self.property.unwrap_or_default();
        let state = self.state.unwrap_or_default();
        let position = self.position.unwrap_or_default();

        let width = policy.dimension(property.width).unwrap_or(ctx.defaults.width);
        let height = policy.dimension(property.height).unwrap_or(ctx.defaults.height);
        let centered = Position {
            x: (ctx.viewport.width - width) / 2.0,
            y: (ctx.viewport.height - height) / 2.0,
        };

        let flag = |value: Option<bool>, default: bool| policy.flag(value).unwrap_or(default);
        let bound = |value: Option<f64>, default: f64| policy.dimension(value).unwrap_or(default);
        let defaults = DialogProperty::default();

        Dialog {
            name: policy
                .text(self.name.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| id.clone()),
            title: policy
                .text(self.title.as_deref())
                .unwrap_or(&ctx.defaults.title)
                .to_string(),
            icon: policy
                .text(self.icon.as_deref())
                .unwrap_or(&ctx.defaults.icon)
                .to_string(),
            position: Position {
                x: policy.number(position.x).unwrap_or(centered.x),
                y: policy.number(position.y).unwrap_or(centered.y),
            },
            payload,
            state: DialogState {
                minimized: flag(state.minimized, false),
                maximized: flag(state.maximized, false),
            },
            property: DialogProperty {
                minimizable: flag(property.minimizable, defaults.minimizable),
                maximizable: flag(property.maximizable, defaults.maximizable),
                resizable: flag(property.resizable, defaults.resizable),
                closable: flag(property.closable, defaults.closable),
                movable: flag(property.movable, defaults.movable),
                always_on_top: flag(property.always_on_top, defaults.always_on_top),
                min_width: bound(property.min_width, ctx.defaults.min_width),
                min_height: bound(property.min_height, ctx.defaults.min_height),
                max_width: bound(property.max_width, ctx.defaults.max_width),
                max_height: bound(property.max_height, ctx.defaults.max_height),
                width,
                height,
            },
            args: self.args.clone(),
            sequence: 0,
            id,
        }
    }
}
