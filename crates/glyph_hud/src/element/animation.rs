//! Animation frame selection

use serde::{Deserialize, Serialize};

/// How a frame counter maps onto a frame list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationType {
    /// Wrap around
    #[default]
    Loop,
    /// Stop at the last frame
    PlayOnce,
}

impl AnimationType {
    /// Index into a list of `count` frames, `0` for an empty list
    #[allow(clippy::cast_possible_truncation)]
    pub const fn select(self, frame: u64, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let last = (count - 1) as u64;
        match self {
            Self::Loop => (frame % count as u64) as usize,
            Self::PlayOnce => {
                if frame < last {
                    frame as usize
                } else {
                    last as usize
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_selection() {
        assert_eq!(AnimationType::Loop.select(5, 4), 1);
        assert_eq!(AnimationType::PlayOnce.select(5, 4), 3);
        assert_eq!(AnimationType::PlayOnce.select(2, 4), 2);
        assert_eq!(AnimationType::Loop.select(7, 1), 0);
        assert_eq!(AnimationType::Loop.select(7, 0), 0);
    }
}
