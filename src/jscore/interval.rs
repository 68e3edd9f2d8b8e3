use std::fmt;

/// Intervals a chord can be stacked with, measured upwards from its top note.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interval {
    Minor2,
    Major2,
    Minor3,
    Major3,
    Perfect4,
    Tritone,
    Perfect5,
}

impl Interval {
    pub fn semitones(&self) -> i16 {
        match self {
            Interval::Minor2 => 1,
            Interval::Major2 => 2,
            Interval::Minor3 => 3,
            Interval::Major3 => 4,
            Interval::Perfect4 => 5,
            Interval::Tritone => 6,
            Interval::Perfect5 => 7,
        }
    }

    /// The named interval spanning exactly `semitones`, if there is one.
    pub fn from_semitones(semitones: i16) -> Option<Interval> {
        match semitones {
            1 => Some(Interval::Minor2),
            2 => Some(Interval::Major2),
            3 => Some(Interval::Minor3),
            4 => Some(Interval::Major3),
            5 => Some(Interval::Perfect4),
            6 => Some(Interval::Tritone),
            7 => Some(Interval::Perfect5),
            _ => None,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Interval::Minor2 => "m2",
            Interval::Major2 => "M2",
            Interval::Minor3 => "m3",
            Interval::Major3 => "M3",
            Interval::Perfect4 => "P4",
            Interval::Tritone => "TT",
            Interval::Perfect5 => "P5",
        })
    }
}
