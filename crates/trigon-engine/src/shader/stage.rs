use std::fmt;

use super::ShaderError;

/// Pipeline stage a shader file is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Deduces the stage from a file name such as `OnlyPosition.vert`.
    ///
    /// A name containing `.vert` is a vertex shader, one containing `.frag` a
    /// fragment shader; `.vert` wins if both appear.
    pub fn from_file_name(name: &str) -> Result<Self, ShaderError> {
        if name.contains(".vert") {
            Ok(ShaderStage::Vertex)
        } else if name.contains(".frag") {
            Ok(ShaderStage::Fragment)
        } else {
            Err(ShaderError::UnknownStage(name.to_owned()))
        }
    }

    pub(crate) fn to_naga(self) -> wgpu::naga::ShaderStage {
        match self {
            ShaderStage::Vertex => wgpu::naga::ShaderStage::Vertex,
            ShaderStage::Fragment => wgpu::naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vert_suffix_is_vertex() {
        assert_eq!(
            ShaderStage::from_file_name("OnlyPosition.vert").unwrap(),
            ShaderStage::Vertex
        );
    }

    #[test]
    fn frag_suffix_is_fragment() {
        assert_eq!(
            ShaderStage::from_file_name("SolidColor.frag").unwrap(),
            ShaderStage::Fragment
        );
    }

    #[test]
    fn substring_anywhere_counts() {
        assert_eq!(
            ShaderStage::from_file_name("lit.vert.v2").unwrap(),
            ShaderStage::Vertex
        );
        assert_eq!(
            ShaderStage::from_file_name("post.frag_hdr").unwrap(),
            ShaderStage::Fragment
        );
    }

    #[test]
    fn longer_words_containing_vert_still_match() {
        assert_eq!(
            ShaderStage::from_file_name("shader.vertex_").unwrap(),
            ShaderStage::Vertex
        );
    }

    #[test]
    fn vert_checked_before_frag() {
        assert_eq!(
            ShaderStage::from_file_name("odd.frag.vert").unwrap(),
            ShaderStage::Vertex
        );
    }

    #[test]
    fn other_names_are_rejected() {
        for name in ["SolidColor", "main.comp", "vert", "shader.vx", ""] {
            let err = ShaderStage::from_file_name(name).unwrap_err();
            assert!(matches!(err, ShaderError::UnknownStage(ref n) if n == name), "{name}");
        }
    }
}
