use std::fmt;
use std::str::FromStr;

/// On-disk shader encoding.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderFormat {
    Wgsl,
    SpirV,
    Glsl,
}

impl ShaderFormat {
    /// Selection order when a device accepts more than one encoding.
    pub const PREFERENCE: [ShaderFormat; 3] =
        [ShaderFormat::Wgsl, ShaderFormat::SpirV, ShaderFormat::Glsl];

    /// File extension appended to the shader name, including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ShaderFormat::Wgsl => ".wgsl",
            ShaderFormat::SpirV => ".spv",
            ShaderFormat::Glsl => ".glsl",
        }
    }

    /// Entry point name every shipped shader uses.
    pub fn entry_point(self) -> &'static str {
        "main"
    }
}

impl fmt::Display for ShaderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderFormat::Wgsl => f.write_str("wgsl"),
            ShaderFormat::SpirV => f.write_str("spirv"),
            ShaderFormat::Glsl => f.write_str("glsl"),
        }
    }
}

/// Set of shader encodings.
///
/// Stored as booleans rather than bitflags to keep it explicit.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ShaderFormats {
    pub wgsl: bool,
    pub spirv: bool,
    pub glsl: bool,
}

impl ShaderFormats {
    pub const NONE: ShaderFormats = ShaderFormats {
        wgsl: false,
        spirv: false,
        glsl: false,
    };
    pub const ALL: ShaderFormats = ShaderFormats {
        wgsl: true,
        spirv: true,
        glsl: true,
    };
    pub const WGSL: ShaderFormats = ShaderFormats {
        wgsl: true,
        ..Self::NONE
    };
    pub const SPIRV: ShaderFormats = ShaderFormats {
        spirv: true,
        ..Self::NONE
    };
    pub const GLSL: ShaderFormats = ShaderFormats {
        glsl: true,
        ..Self::NONE
    };

    /// Encodings wgpu can compile for `backend`.
    ///
    /// Native backends translate every supported front end through naga; the
    /// browser WebGPU backend only takes WGSL.
    pub fn for_backend(backend: wgpu::Backend) -> ShaderFormats {
        match backend {
            wgpu::Backend::BrowserWebGpu => ShaderFormats::WGSL,
            _ => ShaderFormats::ALL,
        }
    }

    pub fn contains(self, format: ShaderFormat) -> bool {
        match format {
            ShaderFormat::Wgsl => self.wgsl,
            ShaderFormat::SpirV => self.spirv,
            ShaderFormat::Glsl => self.glsl,
        }
    }

    pub fn with(mut self, format: ShaderFormat) -> ShaderFormats {
        match format {
            ShaderFormat::Wgsl => self.wgsl = true,
            ShaderFormat::SpirV => self.spirv = true,
            ShaderFormat::Glsl => self.glsl = true,
        }
        self
    }

    pub fn intersection(self, other: ShaderFormats) -> ShaderFormats {
        ShaderFormats {
            wgsl: self.wgsl && other.wgsl,
            spirv: self.spirv && other.spirv,
            glsl: self.glsl && other.glsl,
        }
    }

    pub fn is_empty(self) -> bool {
        self == ShaderFormats::NONE
    }

    /// Picks exactly one format, following [`ShaderFormat::PREFERENCE`].
    pub fn select(self) -> Option<ShaderFormat> {
        ShaderFormat::PREFERENCE
            .into_iter()
            .find(|f| self.contains(*f))
    }

    pub fn iter(self) -> impl Iterator<Item = ShaderFormat> {
        ShaderFormat::PREFERENCE
            .into_iter()
            .filter(move |f| self.contains(*f))
    }
}

impl fmt::Display for ShaderFormats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (i, format) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{format}")?;
        }
        Ok(())
    }
}

/// Error returned when parsing a format list such as `"wgsl,spirv"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shader format {0:?} (expected wgsl, spirv or glsl)")]
pub struct UnknownShaderFormat(pub String);

impl FromStr for ShaderFormats {
    type Err = UnknownShaderFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = ShaderFormats::NONE;
        for item in s.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            let format = match item.to_ascii_lowercase().as_str() {
                "wgsl" => ShaderFormat::Wgsl,
                "spirv" | "spv" | "spir-v" => ShaderFormat::SpirV,
                "glsl" => ShaderFormat::Glsl,
                _ => return Err(UnknownShaderFormat(item.to_owned())),
            };
            set = set.with(format);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_follows_preference_order() {
        assert_eq!(ShaderFormats::ALL.select(), Some(ShaderFormat::Wgsl));
        let no_wgsl = ShaderFormats {
            wgsl: false,
            ..ShaderFormats::ALL
        };
        assert_eq!(no_wgsl.select(), Some(ShaderFormat::SpirV));
        assert_eq!(ShaderFormats::GLSL.select(), Some(ShaderFormat::Glsl));
    }

    #[test]
    fn select_on_empty_set_is_none() {
        assert_eq!(ShaderFormats::NONE.select(), None);
    }

    #[test]
    fn selected_format_is_always_supported() {
        for bits in 0u8..8 {
            let set = ShaderFormats {
                wgsl: bits & 1 != 0,
                spirv: bits & 2 != 0,
                glsl: bits & 4 != 0,
            };
            match set.select() {
                Some(f) => assert!(set.contains(f)),
                None => assert!(set.is_empty()),
            }
        }
    }

    #[test]
    fn browser_backend_takes_only_wgsl() {
        assert_eq!(
            ShaderFormats::for_backend(wgpu::Backend::BrowserWebGpu),
            ShaderFormats::WGSL
        );
        assert_eq!(
            ShaderFormats::for_backend(wgpu::Backend::Vulkan),
            ShaderFormats::ALL
        );
    }

    #[test]
    fn intersection_keeps_common_formats() {
        let requested = ShaderFormats::SPIRV.with(ShaderFormat::Glsl);
        assert_eq!(requested.intersection(ShaderFormats::WGSL), ShaderFormats::NONE);
        assert_eq!(requested.intersection(ShaderFormats::ALL), requested);
    }

    #[test]
    fn parses_comma_separated_list() {
        let set: ShaderFormats = " spv , WGSL ".parse().unwrap();
        assert_eq!(set, ShaderFormats::WGSL.with(ShaderFormat::SpirV));
        assert_eq!("".parse::<ShaderFormats>().unwrap(), ShaderFormats::NONE);
    }

    #[test]
    fn rejects_unknown_format() {
        assert_eq!(
            "wgsl,msl".parse::<ShaderFormats>(),
            Err(UnknownShaderFormat("msl".to_owned()))
        );
    }

    #[test]
    fn display_lists_in_preference_order() {
        assert_eq!(ShaderFormats::ALL.to_string(), "wgsl,spirv,glsl");
        assert_eq!(ShaderFormats::NONE.to_string(), "none");
    }
}
