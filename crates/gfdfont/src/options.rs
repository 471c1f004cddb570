use std::path::PathBuf;

/// Settings for building a [`crate::TextRenderer`] from files on disk.
///
/// Atlas `i` is expected at `{texture_prefix}{i:02}{texture_suffix}.png`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RendererOptions {
    pub texture_prefix: String,
    pub texture_suffix: String,
    /// Requested display size; glyph metrics scale by `font_size / nominal size`.
    pub font_size: f32,
    /// Line advance in pixels.
    pub line_height: i32,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            texture_prefix: "use_".into(),
            texture_suffix: "_AM_NOMIP".into(),
            font_size: 15.0,
            line_height: 18,
        }
    }
}

impl RendererOptions {
    pub fn new(
        texture_prefix: impl Into<String>,
        texture_suffix: impl Into<String>,
        font_size: f32,
        line_height: i32,
    ) -> Self {
        Self {
            texture_prefix: texture_prefix.into(),
            texture_suffix: texture_suffix.into(),
            font_size,
            line_height,
        }
    }

    pub fn texture_path(&self, index: usize) -> PathBuf {
        PathBuf::from(format!(
            "{}{index:02}{}.png",
            self.texture_prefix, self.texture_suffix
        ))
    }
}
