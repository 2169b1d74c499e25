use crate::shader::ShaderFormats;

/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Shader encodings the application is able to ship.
    ///
    /// The device reports the intersection of this set with what the active
    /// backend accepts.
    pub shader_formats: ShaderFormats,

    /// Enables wgpu debug labels and API validation.
    pub debug: bool,

    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO is broadly supported and blocks until a presentable image exists.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            shader_formats: ShaderFormats::ALL,
            debug: cfg!(debug_assertions),
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Applies `TRIGON_DEBUG` and `TRIGON_SHADER_FORMATS` on top of `self`.
    ///
    /// Unparseable values are reported and ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("TRIGON_DEBUG").ok().as_deref(),
            std::env::var("TRIGON_SHADER_FORMATS").ok().as_deref(),
        )
    }

    fn with_overrides(mut self, debug: Option<&str>, formats: Option<&str>) -> Self {
        if let Some(value) = debug {
            match parse_flag(value) {
                Some(flag) => self.debug = flag,
                None => log::warn!("ignoring TRIGON_DEBUG={value:?}: expected 0/1/true/false"),
            }
        }

        if let Some(value) = formats {
            match value.parse::<ShaderFormats>() {
                Ok(set) => self.shader_formats = set,
                Err(e) => log::warn!("ignoring TRIGON_SHADER_FORMATS={value:?}: {e}"),
            }
        }

        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_override_accepts_common_spellings() {
        assert!(GpuInit::default().with_overrides(Some("on"), None).debug);
        assert!(!GpuInit::default().with_overrides(Some("0"), None).debug);
    }

    #[test]
    fn bad_debug_value_keeps_default() {
        let base = GpuInit {
            debug: true,
            ..GpuInit::default()
        };
        assert!(base.with_overrides(Some("maybe"), None).debug);
    }

    #[test]
    fn format_override_restricts_requested_set() {
        let init = GpuInit::default().with_overrides(None, Some("glsl"));
        assert_eq!(init.shader_formats, ShaderFormats::GLSL);
    }

    #[test]
    fn bad_format_list_keeps_default() {
        let init = GpuInit::default().with_overrides(None, Some("hlsl"));
        assert_eq!(init.shader_formats, ShaderFormats::ALL);
    }
}
