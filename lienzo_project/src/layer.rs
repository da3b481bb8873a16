use serde::{Deserialize, Serialize};

/// Plain RGB color used for scene backgrounds and layer ambient light.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// One rendering layer of a scene. The unnamed base layer has the empty
/// string for a name and always exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,

    #[serde(default = "default_true")]
    pub visible: bool,

    #[serde(default)]
    pub locked: bool,

    #[serde(default)]
    pub lighting: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_color: Option<Color>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            locked: false,
            lighting: false,
            ambient_color: None,
        }
    }

    /// The unnamed base layer every scene starts with.
    pub fn base() -> Self {
        Self::new("")
    }

    #[inline]
    pub fn is_base(&self) -> bool {
        self.name.is_empty()
    }
}

fn default_true() -> bool {
    true
}
