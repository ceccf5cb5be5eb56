//! Request dispatch
//!
//! Each method takes a JSON params object and returns a JSON result. Failed
//! requests leave the session unchanged and return a `VizError`.

use linviz::{
    Entry, KernelPreset, Session, Transform, TransformPreset, TransitionMode, Vec2, Visibility, VizError,
};
use linviz_core::Kernel;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub id: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<VizError>,
}

impl Response {
    pub fn from_result(id: JsonValue, result: Result<JsonValue, VizError>) -> Self {
        match result {
            Ok(value) => Self { id, result: Some(value), error: None },
            Err(e) => Self { id, result: None, error: Some(e) },
        }
    }
}

pub const METHODS: &[&str] = &[
    "state",
    "frame",
    "set_transform",
    "set_entry",
    "preset",
    "set_kernel",
    "set_kernel_entry",
    "kernel_preset",
    "set_time",
    "set_mode",
    "set_visibility",
    "load_image",
    "export_image",
    "pointer_down",
    "pointer_move",
    "pointer_up",
    "hover",
    "presets",
];

// Params
#[derive(Debug, Deserialize)]
struct EntryParams {
    entry: String,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct NameParams {
    name: String,
}

#[derive(Debug, Deserialize)]
struct KernelParams {
    weights: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct KernelEntryParams {
    row: usize,
    col: usize,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct TimeParams {
    time: f64,
}

#[derive(Debug, Deserialize)]
struct ModeParams {
    mode: String,
}

/// Any field left out keeps its current value
#[derive(Debug, Deserialize)]
struct VisibilityParams {
    image: Option<bool>,
    eigenvectors: Option<bool>,
    unit_circle: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct PathParams {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PointerParams {
    x: f64,
    y: f64,
}

impl PointerParams {
    fn vec(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

fn params<T: DeserializeOwned>(method: &str, value: Option<JsonValue>) -> Result<T, VizError> {
    let value = value.unwrap_or_else(|| json!({}));
    serde_json::from_value(value)
        .map_err(|e| VizError::protocol(format!("invalid params for '{}': {}", method, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<JsonValue, VizError> {
    serde_json::to_value(value).map_err(|e| VizError::internal(format!("serialization failed: {}", e)))
}

pub fn handle(session: &mut Session, method: &str, raw: Option<JsonValue>) -> Result<JsonValue, VizError> {
    match method {
        "state" => to_json(&session.state()),
        "frame" => to_json(&session.frame()),
        "presets" => Ok(json!({
            "transform": TransformPreset::ALL.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "kernel": KernelPreset::ALL.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "modes": ["linear", "svd"],
        })),

        "set_transform" => {
            let t: Transform = params(method, raw)?;
            to_json(&session.set_transform(t)?)
        }
        "set_entry" => {
            let p: EntryParams = params(method, raw)?;
            let entry = Entry::from_str(&p.entry)
                .ok_or_else(|| VizError::protocol(format!("unknown entry '{}', expected a, b, c or d", p.entry)))?;
            to_json(&session.set_entry(entry, p.value)?)
        }
        "preset" => {
            let p: NameParams = params(method, raw)?;
            let preset = TransformPreset::parse(&p.name)?;
            to_json(&session.apply_preset(preset))
        }

        "set_kernel" => {
            let p: KernelParams = params(method, raw)?;
            let kernel = Kernel::from_rows(&p.weights)?;
            to_json(&session.set_kernel(kernel)?)
        }
        "set_kernel_entry" => {
            let p: KernelEntryParams = params(method, raw)?;
            to_json(&session.set_kernel_entry(p.row, p.col, p.value)?)
        }
        "kernel_preset" => {
            let p: NameParams = params(method, raw)?;
            let preset = KernelPreset::parse(&p.name)?;
            to_json(&session.apply_kernel_preset(preset))
        }

        "set_time" => {
            let p: TimeParams = params(method, raw)?;
            Ok(json!({ "time": session.set_time(p.time)? }))
        }
        "set_mode" => {
            let p: ModeParams = params(method, raw)?;
            let mode = TransitionMode::parse(&p.mode)?;
            session.set_mode(mode);
            Ok(json!({ "mode": mode }))
        }
        "set_visibility" => {
            let p: VisibilityParams = params(method, raw)?;
            let current = *session.visibility();
            let next = Visibility {
                image: p.image.unwrap_or(current.image),
                eigenvectors: p.eigenvectors.unwrap_or(current.eigenvectors),
                unit_circle: p.unit_circle.unwrap_or(current.unit_circle),
            };
            session.set_visibility(next);
            to_json(&next)
        }

        "load_image" => {
            let p: PathParams = params(method, raw)?;
            let (width, height) = session.load_image_file(&p.path)?;
            Ok(json!({ "width": width, "height": height }))
        }
        "export_image" => {
            let p: PathParams = params(method, raw)?;
            let bytes = session.export_image_file(&p.path)?;
            Ok(json!({ "bytes": bytes }))
        }

        "pointer_down" => {
            let p: PointerParams = params(method, raw)?;
            to_json(&session.pointer_down(p.vec()))
        }
        "pointer_move" => {
            let p: PointerParams = params(method, raw)?;
            let moved = session.pointer_move(p.vec())?;
            Ok(json!({ "transform": moved, "hovered": session.state().hovered }))
        }
        "pointer_up" => to_json(&session.pointer_up()),
        "hover" => {
            let p: PointerParams = params(method, raw)?;
            Ok(json!({ "hovered": session.hover(p.vec()) }))
        }

        _ => Err(VizError::protocol(format!("unknown method '{}'", method))
            .with_suggestion(format!("Available methods: {}", METHODS.join(", ")))),
    }
}
