use std::fmt;

/// A named volume bound into a container, rendered as `name:mount_point`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeBind {
    pub volume: String,
    pub mount_point: String,
}

impl VolumeBind {
    pub fn new(volume: impl Into<String>, mount_point: impl Into<String>) -> Self {
        Self {
            volume: volume.into(),
            mount_point: mount_point.into(),
        }
    }
}

impl fmt::Display for VolumeBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.volume, self.mount_point)
    }
}
