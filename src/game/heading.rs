use serde::{Deserialize, Serialize};

/// Direction the snake travels in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Heading {
    /// The heading pointing the other way
    pub fn opposite(&self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Heading) -> bool {
        self.opposite() == other
    }

    /// Returns the delta (dx, dy) for one step in this heading. `y` grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_headings() {
        assert!(Heading::Up.is_opposite(Heading::Down));
        assert!(Heading::Down.is_opposite(Heading::Up));
        assert!(Heading::Left.is_opposite(Heading::Right));
        assert!(Heading::Right.is_opposite(Heading::Left));

        assert!(!Heading::Up.is_opposite(Heading::Left));
        assert!(!Heading::Up.is_opposite(Heading::Right));
        assert!(!Heading::Up.is_opposite(Heading::Up));
    }

    #[test]
    fn test_opposite_is_involution() {
        for heading in Heading::ALL {
            assert_eq!(heading.opposite().opposite(), heading);
        }
    }

    #[test]
    fn test_heading_delta() {
        assert_eq!(Heading::Up.delta(), (0, -1));
        assert_eq!(Heading::Down.delta(), (0, 1));
        assert_eq!(Heading::Left.delta(), (-1, 0));
        assert_eq!(Heading::Right.delta(), (1, 0));
    }

    #[test]
    fn test_heading_serde_lowercase() {
        let json = serde_json::to_string(&Heading::Up).unwrap();
        assert_eq!(json, "\"up\"");
        let parsed: Heading = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(parsed, Heading::Left);
    }
}
