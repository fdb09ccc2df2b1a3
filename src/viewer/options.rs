//=========================================================================
// Viewer Options
//=========================================================================
//
// Construction-time configuration, loadable from JSON.
//
// Every field has a default, so `{}` is a complete configuration. The
// options are validated once when loaded and then split into the
// `StateConfig` the state store keeps for resets.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::constants::{DEFAULT_KEYBOARD_STEP, DEFAULT_SCROLL_VELOCITY};
use crate::core::geometry::GeometryKind;
use crate::core::state::{Orientation, RotationSpec, StateConfig, ViewportSize};

//=== AutoRotation ========================================================

/// Interval rotations started when the viewer becomes ready.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoRotation {
    pub x: Option<RotationSpec>,
    pub y: Option<RotationSpec>,
}

//=== ViewerOptions =======================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Projection applied once the viewer is ready.
    pub projection: String,

    /// Forces a geometry instead of deriving it from the media.
    pub geometry: Option<GeometryKind>,

    /// Media uses the 3×2 cube-map layout.
    pub cube_map: bool,

    /// Media is a still image rather than video.
    pub image: bool,

    pub fov: Option<f32>,
    pub orientation: Option<Orientation>,
    pub size: Option<ViewportSize>,
    pub rotate: AutoRotation,

    pub inverted: bool,
    pub allow_wheel: bool,
    pub resizable: bool,
    pub scroll_velocity: f32,
    pub keyboard_step: f32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            projection: "equilinear".to_string(),
            geometry: None,
            cube_map: false,
            image: false,
            fov: None,
            orientation: None,
            size: None,
            rotate: AutoRotation::default(),
            inverted: false,
            allow_wheel: true,
            resizable: true,
            scroll_velocity: DEFAULT_SCROLL_VELOCITY,
            keyboard_step: DEFAULT_KEYBOARD_STEP,
        }
    }
}

impl ViewerOptions {
    //--- Loading ----------------------------------------------------------

    /// Parses and validates options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json).map_err(ConfigError::Json)?;
        options.validate()
    }

    /// Parses and validates options from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_reader(reader).map_err(ConfigError::Json)?;
        options.validate()
    }

    /// Rejects values the viewer cannot work with.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !self.scroll_velocity.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "scroll_velocity",
                value: self.scroll_velocity,
            });
        }

        if !(self.keyboard_step.is_finite() && self.keyboard_step > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "keyboard_step",
                value: self.keyboard_step,
            });
        }

        if let Some(fov) = self.fov {
            if !(fov.is_finite() && fov > 0.0) {
                return Err(ConfigError::InvalidValue { field: "fov", value: fov });
            }
        }

        if self.projection.trim().is_empty() {
            return Err(ConfigError::EmptyProjection);
        }

        Ok(self)
    }

    //--- Conversion -------------------------------------------------------

    /// State defaults derived from these options.
    pub fn state_config(&self) -> StateConfig {
        StateConfig {
            inverted: self.inverted,
            allow_wheel: self.allow_wheel,
            resizable: self.resizable,
            cube_map: self.cube_map,
            image: self.image,
            scroll_velocity: self.scroll_velocity,
            keyboard_step: self.keyboard_step,
        }
    }

    /// Orientation applied on ready; non-finite components become zero.
    pub fn initial_orientation(&self) -> Orientation {
        match self.orientation {
            Some(Orientation { x, y }) => {
                let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
                Orientation::new(finite(x), finite(y))
            }
            None => Orientation::HORIZON,
        }
    }
}

//=== ConfigError =========================================================

/// Failure to load viewer options.
#[derive(Debug)]
pub enum ConfigError {
    /// The document is not valid JSON for [`ViewerOptions`].
    Json(serde_json::Error),

    /// A numeric option is out of range.
    InvalidValue { field: &'static str, value: f32 },

    /// The projection name is blank.
    EmptyProjection,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "Invalid options document: {}", e),
            Self::InvalidValue { field, value } => {
                write!(f, "Invalid value for {}: {}", field, value)
            }
            Self::EmptyProjection => write!(f, "Projection name must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
