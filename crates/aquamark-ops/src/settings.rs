//! Watermark settings document.
//!
//! Settings are stored as YAML with camelCase keys. Every key is optional;
//! missing keys take the built-in defaults.
//!
//! ```yaml
//! position: top-left
//! offsetX: 5
//! offsetY: 5
//! offsetUnit: "%"
//! width: 25
//! sizeUnit: "%"
//! opacity: 60
//! blendMode: multiply
//! imageSizes: [thumbnail, large]
//! ```

use crate::placement::PlacementSettings;
use crate::{OpsError, OpsResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Full settings record: placement plus the size variants to watermark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatermarkSettings {
    /// Placement, sizing, opacity and blend mode.
    #[serde(flatten)]
    pub placement: PlacementSettings,
    /// Names of the size variants to watermark.
    pub image_sizes: Vec<String>,
}

impl WatermarkSettings {
    /// Parses a YAML document.
    pub fn from_yaml_str(text: &str) -> OpsResult<Self> {
        // An empty document means "all defaults".
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self =
            serde_yaml::from_str(text).map_err(|e| OpsError::Settings(e.to_string()))?;
        Ok(settings.sanitized())
    }

    /// Reads and parses a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> OpsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| OpsError::Settings(format!("{}: {}", path.display(), e)))?;
        let settings = Self::from_yaml_str(&text)?;
        debug!(path = %path.display(), ?settings, "loaded watermark settings");
        Ok(settings)
    }

    /// Serializes back to YAML.
    pub fn to_yaml(&self) -> OpsResult<String> {
        serde_yaml::to_string(self).map_err(|e| OpsError::Settings(e.to_string()))
    }

    /// Copy with opacity clamped to 0..=100.
    pub fn sanitized(&self) -> Self {
        Self {
            placement: self.placement.sanitized(),
            image_sizes: self.image_sizes.clone(),
        }
    }

    /// Whether the named size variant is selected.
    pub fn wants_size(&self, name: &str) -> bool {
        self.image_sizes.iter().any(|s| s == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{Anchor, Unit};

    #[test]
    fn test_defaults() {
        let s = WatermarkSettings::default();
        assert_eq!(s.placement.position, Anchor::BottomRight);
        assert_eq!((s.placement.offset_x, s.placement.offset_y), (10, 10));
        assert_eq!(s.placement.offset_unit, Unit::Px);
        assert_eq!((s.placement.width, s.placement.height), (150, 0));
        assert_eq!(s.placement.opacity, 80);
        assert_eq!(s.placement.blend_mode, "opacity");
        assert!(s.image_sizes.is_empty());
        assert_eq!(WatermarkSettings::from_yaml_str("").unwrap(), s);
    }

    #[test]
    fn test_parse_full_document() {
        let yaml = r#"
position: top-left
offsetX: 5
offsetY: 7
offsetUnit: "%"
width: 25
height: 10
sizeUnit: percent
opacity: 60
blendMode: multiply
imageSizes: [thumbnail, large]
"#;
        let s = WatermarkSettings::from_yaml_str(yaml).unwrap();
        let p = &s.placement;
        assert_eq!(p.position, Anchor::TopLeft);
        assert_eq!((p.offset_x, p.offset_y), (5, 7));
        assert_eq!(p.offset_unit, Unit::Percent);
        assert_eq!((p.width, p.height), (25, 10));
        assert_eq!(p.size_unit, Unit::Percent);
        assert_eq!(p.opacity, 60);
        assert_eq!(p.blend_mode, "multiply");
        assert!(s.wants_size("large"));
        assert!(!s.wants_size("medium"));
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let s = WatermarkSettings::from_yaml_str("opacity: 150\nposition: nowhere\n").unwrap();
        assert_eq!(s.placement.opacity, 100);
        assert_eq!(s.placement.position, Anchor::BottomRight);
        assert_eq!(s.placement.width, 150);
    }

    #[test]
    fn test_unknown_blend_mode_is_kept_for_compose_time() {
        let s = WatermarkSettings::from_yaml_str("blendMode: xyz").unwrap();
        assert_eq!(s.placement.blend_mode, "xyz");
    }

    #[test]
    fn test_malformed_yaml() {
        let err = WatermarkSettings::from_yaml_str("width: [1, 2").unwrap_err();
        assert!(matches!(err, OpsError::Settings(_)));
        let err = WatermarkSettings::from_yaml_file("/nonexistent/settings.yaml").unwrap_err();
        assert!(matches!(err, OpsError::Settings(_)));
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut s = WatermarkSettings::default();
        s.placement.position = Anchor::MiddleCenter;
        s.image_sizes = vec!["medium".into()];
        let text = s.to_yaml().unwrap();
        assert!(text.contains("blendMode"));
        assert_eq!(WatermarkSettings::from_yaml_str(&text).unwrap(), s);
    }
}
