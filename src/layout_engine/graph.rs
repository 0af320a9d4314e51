use serde::{Deserialize, Serialize};

/// Which boundary-line array an operation works on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Axis {
    Rows,
    Cols,
}

impl Axis {
    pub fn cross(self) -> Axis {
        match self {
            Axis::Rows => Axis::Cols,
            Axis::Cols => Axis::Rows,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// The line array a move in this direction crosses.
    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Cols,
            Direction::Up | Direction::Down => Axis::Rows,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// True for directions pointing at lower line indices.
    pub fn toward_start(self) -> bool { matches!(self, Direction::Left | Direction::Up) }
}

/// Target of a destroy request: a neighbor in some direction, or the active
/// pane itself (`"self"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DestroyTarget {
    Up,
    Right,
    Down,
    Left,
    #[serde(rename = "self")]
    #[strum(serialize = "self")]
    Current,
}

impl DestroyTarget {
    pub fn direction(self) -> Option<Direction> {
        match self {
            DestroyTarget::Up => Some(Direction::Up),
            DestroyTarget::Right => Some(Direction::Right),
            DestroyTarget::Down => Some(Direction::Down),
            DestroyTarget::Left => Some(Direction::Left),
            DestroyTarget::Current => None,
        }
    }
}

impl From<Direction> for DestroyTarget {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => DestroyTarget::Up,
            Direction::Right => DestroyTarget::Right,
            Direction::Down => DestroyTarget::Down,
            Direction::Left => DestroyTarget::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    mod direction_operations {
        use super::*;

        #[test]
        fn direction_axis() {
            assert_eq!(Direction::Left.axis(), Axis::Cols);
            assert_eq!(Direction::Right.axis(), Axis::Cols);
            assert_eq!(Direction::Up.axis(), Axis::Rows);
            assert_eq!(Direction::Down.axis(), Axis::Rows);
        }

        #[test]
        fn direction_opposite() {
            for direction in Direction::ALL {
                assert_ne!(direction.opposite(), direction);
                assert_eq!(direction.opposite().opposite(), direction);
                assert_eq!(direction.opposite().axis(), direction.axis());
            }
        }

        #[test]
        fn direction_parses_from_snake_case() {
            assert_eq!(Direction::from_str("left").unwrap(), Direction::Left);
            assert_eq!(Direction::Down.to_string(), "down");
            assert!(Direction::from_str("sideways").is_err());
        }
    }

    mod destroy_target {
        use super::*;

        #[test]
        fn self_target_has_no_direction() {
            assert_eq!(DestroyTarget::Current.direction(), None);
            assert_eq!(DestroyTarget::from_str("self").unwrap(), DestroyTarget::Current);
            assert_eq!(
                serde_json::from_str::<DestroyTarget>("\"self\"").unwrap(),
                DestroyTarget::Current
            );
        }

        #[test]
        fn directions_round_trip_through_target() {
            for direction in Direction::ALL {
                assert_eq!(DestroyTarget::from(direction).direction(), Some(direction));
            }
        }
    }
}
