use std::error::Error;
use std::fmt;
use std::str::FromStr;

use log::warn;
use pest::Parser;

use crate::jscore::noteparser::{note_from_pair, NoteParser, Rule};
use crate::jscore::transform::Transpose;

/// Highest key a `Note` can hold (G9). The lowest is 0 (C-1).
pub const MIDI_KEY_MAX: u8 = 127;

pub const SEMITONES_PER_OCTAVE: i16 = 12;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stepname {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Stepname {
    /// Semitones above C within the same octave.
    pub fn offset(&self) -> i16 {
        match self {
            Stepname::C => 0,
            Stepname::D => 2,
            Stepname::E => 4,
            Stepname::F => 5,
            Stepname::G => 7,
            Stepname::A => 9,
            Stepname::B => 11,
        }
    }

    pub fn from_char(c: char) -> Option<Stepname> {
        match c {
            'C' => Some(Stepname::C),
            'D' => Some(Stepname::D),
            'E' => Some(Stepname::E),
            'F' => Some(Stepname::F),
            'G' => Some(Stepname::G),
            'A' => Some(Stepname::A),
            'B' => Some(Stepname::B),
            _ => None,
        }
    }
}

impl fmt::Display for Stepname {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Stepname::C => "C",
            Stepname::D => "D",
            Stepname::E => "E",
            Stepname::F => "F",
            Stepname::G => "G",
            Stepname::A => "A",
            Stepname::B => "B",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Accidental {
    Natural,
    Flat,
    Sharp,
}

impl Accidental {
    pub fn offset(&self) -> i16 {
        match self {
            Accidental::Natural => 0,
            Accidental::Flat => -1,
            Accidental::Sharp => 1,
        }
    }
}

// Flats are written "b" so that "B-1" stays readable as B in octave -1.
impl fmt::Display for Accidental {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PitchClass(u8);

impl PitchClass {
    pub fn of(midi_key: u8) -> PitchClass {
        PitchClass(midi_key % 12)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_natural(&self) -> bool {
        [0, 2, 4, 5, 7, 9, 11].contains(&self.0)
    }

    pub fn is_sharpable(&self) -> bool {
        [1, 6, 8].contains(&self.0)
    }

    pub fn is_flatable(&self) -> bool {
        [3, 10].contains(&self.0)
    }

    /// Spelling used for labels: sharps for C#, F#, G#; flats for Eb, Bb.
    pub fn to_step_name(&self) -> (Stepname, Accidental) {
        let step = match self.0 {
            0 | 1 => Stepname::C,
            2 => Stepname::D,
            3 | 4 => Stepname::E,
            5 | 6 => Stepname::F,
            7 | 8 => Stepname::G,
            9 => Stepname::A,
            10 | 11 => Stepname::B,
            12_u8..=u8::MAX => unreachable!("Unknown pitch class {}", self.0),
        };
        let accidental = if self.is_natural() {
            Accidental::Natural
        } else if self.is_sharpable() {
            Accidental::Sharp
        } else if self.is_flatable() {
            Accidental::Flat
        } else {
            unreachable!()
        };
        (step, accidental)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteError {
    /// The key falls outside `0..=MIDI_KEY_MAX`.
    OutOfRange(i16),
    Parse(String),
}

impl fmt::Display for NoteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NoteError::OutOfRange(key) => write!(f, "MIDI key {} is outside 0..={}", key, MIDI_KEY_MAX),
            NoteError::Parse(msg) => write!(f, "cannot parse note: {}", msg),
        }
    }
}

impl Error for NoteError {}

/// A single pitch, identified by its MIDI key.
///
/// Notes compare and sort by key, so `C4 < C#4 < D4` and enharmonic spellings
/// are the same note.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note {
    midi_key: u8,
}

impl Note {
    pub fn new(midi_key: u8) -> Result<Note, NoteError> {
        if midi_key > MIDI_KEY_MAX {
            return Err(NoteError::OutOfRange(i16::from(midi_key)));
        }
        Ok(Note { midi_key })
    }

    /// See also `Note::pitch`, which produces the label this inverts.
    pub fn from_step(step: Stepname, accidental: Accidental, octave: i8) -> Result<Note, NoteError> {
        let key = (i16::from(octave) + 1) * SEMITONES_PER_OCTAVE + step.offset() + accidental.offset();
        Note::from_key(key)
    }

    fn from_key(key: i16) -> Result<Note, NoteError> {
        match u8::try_from(key) {
            Ok(k) if k <= MIDI_KEY_MAX => Ok(Note { midi_key: k }),
            _ => Err(NoteError::OutOfRange(key)),
        }
    }

    pub fn midi_key(&self) -> u8 {
        self.midi_key
    }

    pub fn pitch_class(&self) -> PitchClass {
        PitchClass::of(self.midi_key)
    }

    /// Scientific octave number; middle C (key 60) is in octave 4.
    pub fn octave(&self) -> i8 {
        // 127 / 12 - 1 == 9, always fits
        (self.midi_key / 12) as i8 - 1
    }

    pub fn step(&self) -> (Stepname, Accidental) {
        self.pitch_class().to_step_name()
    }

    /// Human-readable label such as "C4", "F#3" or "Bb-1".
    pub fn pitch(&self) -> String {
        let (step, accidental) = self.step();
        format!("{}{}{}", step, accidental, self.octave())
    }

    /// A copy moved by `semitones`, or `None` if that leaves the MIDI range.
    pub fn checked_transposed(&self, semitones: i16) -> Option<Note> {
        Note::from_key(i16::from(self.midi_key).checked_add(semitones)?).ok()
    }

    /// A copy moved by `semitones`, clamped to the MIDI range.
    pub fn transposed(&self, semitones: i16) -> Note {
        let mut note = *self;
        note.transpose(semitones);
        note
    }
}

impl Transpose for Note {
    fn transpose(&mut self, semitones: i16) {
        let target = i16::from(self.midi_key).saturating_add(semitones);
        let clamped = target.clamp(0, i16::from(MIDI_KEY_MAX));
        if clamped != target {
            warn!("transposing {} by {} leaves the MIDI range, clamped to key {}", self, semitones, clamped);
        }
        self.midi_key = clamped as u8;
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pitch())
    }
}

impl FromStr for Note {
    type Err = NoteError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pairs = NoteParser::parse(Rule::FULL_NOTE, s).map_err(|e| NoteError::Parse(e.to_string()))?;
        match pairs.next() {
            Some(pair) => note_from_pair(pair),
            None => Err(NoteError::Parse(format!("empty input {:?}", s))),
        }
    }
}
