use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::slice;

use itertools::Itertools;
use log::debug;
use pest::Parser;

use crate::jscore::interval::Interval;
use crate::jscore::note::{Note, NoteError};
use crate::jscore::noteparser::{notes_from_chord_pair, NoteParser, Rule};
use crate::jscore::transform::Transpose;
use crate::jscore::util::iterable_to_str;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChordError {
    IndexOutOfBounds { index: usize, len: usize },
    InvalidInversion { root_note_index: usize, len: usize },
    /// A chord needs at least its root note.
    Empty,
    Parse(String),
}

impl fmt::Display for ChordError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChordError::IndexOutOfBounds { index, len } => {
                write!(f, "index {} is out of bounds for a chord of {} notes", index, len)
            }
            ChordError::InvalidInversion { root_note_index, len } => {
                write!(f, "cannot invert {} notes, the number of inversions this chord has is {}", root_note_index, len)
            }
            ChordError::Empty => write!(f, "a chord needs at least one note"),
            ChordError::Parse(msg) => write!(f, "cannot parse chord: {}", msg),
        }
    }
}

impl Error for ChordError {}

impl From<NoteError> for ChordError {
    fn from(e: NoteError) -> Self {
        ChordError::Parse(e.to_string())
    }
}

/// A chord: notes kept in the order they were stacked.
///
/// The first note is the root. Interval appenders always build on the
/// current top (last) note, so
///
/// ```
/// use jscorers::jscore::chord::Chord;
/// use jscorers::jscore::note::Note;
///
/// let mut chord = Chord::new("C4".parse::<Note>().unwrap());
/// chord.add_major3().add_minor3().add_minor3();
/// assert_eq!(chord.to_string(), "Chord: [C4, E4, G4, Bb4]");
/// ```
///
/// Every method that changes the chord does so in place and hands the chord
/// back, so calls chain. A `Chord` has no internal locking; share it across
/// threads behind the caller's own `Mutex`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    notes: Vec<Note>,
}

impl Chord {
    pub fn new(root_note: Note) -> Chord {
        Chord { notes: vec![root_note] }
    }

    /// Builds a chord keeping `notes` in the given order.
    pub fn from_notes(notes: Vec<Note>) -> Result<Chord, ChordError> {
        match notes.is_empty() {
            true => Err(ChordError::Empty),
            false => Ok(Chord { notes }),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Live view of the notes. Changes made through it are seen by every
    /// later operation on the chord; the number of notes cannot change.
    pub fn notes_mut(&mut self) -> &mut [Note] {
        &mut self.notes
    }

    /// n; number of notes
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn iter(&self) -> slice::Iter<'_, Note> {
        self.notes.iter()
    }

    pub fn root(&self) -> Note {
        match self.notes.first() {
            Some(note) => *note,
            None => unreachable!("a chord always holds its root note"),
        }
    }

    /// The last note stacked, which the interval appenders build on.
    pub fn top(&self) -> Note {
        match self.notes.last() {
            Some(note) => *note,
            None => unreachable!("a chord always holds its root note"),
        }
    }

    /// Semitone steps between consecutive notes, in stacking order.
    pub fn intervals(&self) -> Vec<i16> {
        self.notes
            .iter()
            .tuple_windows()
            .map(|(lower, upper)| i16::from(upper.midi_key()) - i16::from(lower.midi_key()))
            .collect()
    }

    /// Replaces the note at `index` with `modification(note)`.
    pub fn modify_specific_note<F>(&mut self, index: usize, modification: F) -> Result<&mut Self, ChordError>
        where
            F: FnOnce(Note) -> Note,
    {
        let len = self.notes.len();
        if index >= len {
            return Err(ChordError::IndexOutOfBounds { index, len });
        }
        self.notes[index] = modification(self.notes[index]);
        Ok(self)
    }

    pub fn add_interval(&mut self, interval: Interval) -> &mut Self {
        self.append_a_note_semitones_apart_from_last_one(interval.semitones())
    }

    pub fn add_minor2(&mut self) -> &mut Self {
        self.add_interval(Interval::Minor2)
    }

    pub fn add_major2(&mut self) -> &mut Self {
        self.add_interval(Interval::Major2)
    }

    pub fn add_minor3(&mut self) -> &mut Self {
        self.add_interval(Interval::Minor3)
    }

    pub fn add_major3(&mut self) -> &mut Self {
        self.add_interval(Interval::Major3)
    }

    pub fn add_perfect4(&mut self) -> &mut Self {
        self.add_interval(Interval::Perfect4)
    }

    /// Augmented fourth.
    pub fn add_tritone(&mut self) -> &mut Self {
        self.add_interval(Interval::Tritone)
    }

    pub fn add_perfect5(&mut self) -> &mut Self {
        self.add_interval(Interval::Perfect5)
    }

    // Keys past the MIDI range are clamped by Note.
    fn append_a_note_semitones_apart_from_last_one(&mut self, semitones: i16) -> &mut Self {
        let note = self.top().transposed(semitones);
        self.append_new_note(note)
    }

    pub fn append_new_note(&mut self, note_to_add: Note) -> &mut Self {
        self.notes.push(note_to_add);
        self
    }

    /// Stacks a major third then a minor third on the top note.
    pub fn append_major_chord(&mut self) -> &mut Self {
        self.add_major3().add_minor3()
    }

    /// Stacks a minor third then a major third on the top note.
    pub fn append_minor_chord(&mut self) -> &mut Self {
        self.add_minor3().add_major3()
    }

    /// Lifts the first `root_note_index` notes by an octave, making the note
    /// at `root_note_index` the new bass. `root_note_index == len` lifts all.
    pub fn invert_chord(&mut self, root_note_index: usize) -> Result<&mut Self, ChordError> {
        let len = self.notes.len();
        if root_note_index > len {
            return Err(ChordError::InvalidInversion { root_note_index, len });
        }
        debug!("inverting {} of {} notes", root_note_index, len);
        self.notes[..root_note_index].iter_mut().for_each(|note| note.octave_shift(1));
        Ok(self)
    }

    /// Appends every note of `top_chord`, in order, onto `bottom_chord` and
    /// returns `bottom_chord`. Notes are copied, so the chords stay independent.
    pub fn stack_chords<'a>(bottom_chord: &'a mut Chord, top_chord: &Chord) -> &'a mut Chord {
        debug!("stacking {} notes onto {}", top_chord.len(), bottom_chord.len());
        bottom_chord.extend(top_chord.iter().copied());
        bottom_chord
    }

    /// Reorders the notes by ascending pitch. Equal pitches keep their order.
    pub fn sort_by_pitch(&mut self) -> &mut Self {
        debug!("sorting {} notes by pitch", self.notes.len());
        self.notes.sort();
        self
    }
}

impl Transpose for Chord {
    fn transpose(&mut self, semitones: i16) {
        self.notes.iter_mut().for_each(|note| note.transpose(semitones));
    }
}

impl From<Note> for Chord {
    fn from(root_note: Note) -> Self {
        Chord::new(root_note)
    }
}

impl TryFrom<Vec<Note>> for Chord {
    type Error = ChordError;
    fn try_from(notes: Vec<Note>) -> Result<Self, Self::Error> {
        Chord::from_notes(notes)
    }
}

impl Extend<Note> for Chord {
    fn extend<T: IntoIterator<Item = Note>>(&mut self, iter: T) {
        self.notes.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Chord {
    type Item = &'a Note;
    type IntoIter = slice::Iter<'a, Note>;
    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

/// Renders in pitch order without touching the stored order; call
/// `sort_by_pitch` first to make the two agree.
impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Chord: {}", iterable_to_str(self.notes.iter().sorted()))
    }
}

impl FromStr for Chord {
    type Err = ChordError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pairs = NoteParser::parse(Rule::FULL_CHORD, s).map_err(|e| ChordError::Parse(e.to_string()))?;
        match pairs.next() {
            Some(pair) => Chord::from_notes(notes_from_chord_pair(pair)?),
            None => Err(ChordError::Parse(format!("{:?}", pairs))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(s: &str) -> Note {
        Note::from_str(s).unwrap()
    }

    fn keys(chord: &Chord) -> Vec<u8> {
        chord.iter().map(|n| n.midi_key()).collect()
    }

    #[test]
    fn new1() {
        let chord = Chord::new(note("C4"));
        assert_eq!(chord.notes(), &[note("C4")]);
        assert_eq!(chord.len(), 1);
        assert_eq!(chord.root(), chord.top());
    }

    #[test]
    fn from_notes1() {
        assert_eq!(Chord::from_notes(vec![]), Err(ChordError::Empty));
        let chord = Chord::try_from(vec![note("G4"), note("C4")]).unwrap();
        assert_eq!(keys(&chord), vec![67, 60]);
        assert_eq!(Chord::from(note("D4")), Chord::new(note("D4")));
    }

    #[test]
    fn parsing1() {
        let chord = Chord::from_str("E4 C4 G4").unwrap();
        assert_eq!(keys(&chord), vec![64, 60, 67]);
        let rendered = Chord::from_str("Chord: [C4, E4, G4]").unwrap();
        assert_eq!(rendered.to_string(), "Chord: [C4, E4, G4]");
    }

    #[test]
    fn parsing2() {
        assert!(matches!(Chord::from_str(""), Err(ChordError::Parse(_))));
        assert!(matches!(Chord::from_str("C4 Q4"), Err(ChordError::Parse(_))));
        assert!(matches!(Chord::from_str("C4 G10"), Err(ChordError::Parse(_))));
    }

    type Appender = fn(&mut Chord) -> &mut Chord;

    #[test]
    fn interval_appenders1() {
        let appenders: [(Appender, u8); 7] = [
            (Chord::add_minor2, 1),
            (Chord::add_major2, 2),
            (Chord::add_minor3, 3),
            (Chord::add_major3, 4),
            (Chord::add_perfect4, 5),
            (Chord::add_tritone, 6),
            (Chord::add_perfect5, 7),
        ];
        for (append, semitones) in appenders {
            let mut chord = Chord::from_str("C4 E4").unwrap();
            append(&mut chord);
            assert_eq!(chord.len(), 3);
            assert_eq!(chord.top().midi_key(), 64 + semitones);
            assert_eq!(&chord.notes()[..2], &[note("C4"), note("E4")]);
        }
    }

    #[test]
    fn interval_appenders2() {
        let mut chord = Chord::new(note("G9"));
        chord.add_perfect5();
        assert_eq!(chord.top().midi_key(), 127);
        assert_eq!(chord.len(), 2);
    }

    #[test]
    fn append_major_chord1() {
        let mut chord = Chord::new(note("C4"));
        chord.append_major_chord();
        assert_eq!(keys(&chord), vec![60, 64, 67]);
        assert_eq!(chord.to_string(), "Chord: [C4, E4, G4]");

        chord.transpose(12);
        assert_eq!(keys(&chord), vec![72, 76, 79]);
        assert_eq!(chord.len(), 3);
    }

    #[test]
    fn append_major_chord2() {
        let mut by_triad = Chord::from_str("D4 F#4").unwrap();
        by_triad.append_major_chord();
        let mut by_intervals = Chord::from_str("D4 F#4").unwrap();
        by_intervals.add_major3().add_minor3();
        assert_eq!(by_triad, by_intervals);
        // built on the top note, not the root
        assert_eq!(by_triad.to_string(), "Chord: [D4, F#4, Bb4, C#5]");
    }

    #[test]
    fn append_minor_chord1() {
        let mut chord = Chord::new(note("A3"));
        chord.append_minor_chord();
        assert_eq!(chord.to_string(), "Chord: [A3, C4, E4]");
        let mut by_intervals = Chord::new(note("A3"));
        by_intervals.add_minor3().add_major3();
        assert_eq!(chord, by_intervals);
    }

    #[test]
    fn append_new_note1() {
        let mut chord = Chord::new(note("C4"));
        chord.append_new_note(note("B3")).add_major2();
        assert_eq!(keys(&chord), vec![60, 59, 61]);
    }

    #[test]
    fn intervals1() {
        let chord = Chord::from_str("C4 E4 G4 C4").unwrap();
        assert_eq!(chord.intervals(), vec![4, 3, -7]);
        assert!(Chord::new(note("C4")).intervals().is_empty());
    }

    #[test]
    fn modify_specific_note1() {
        let mut chord = Chord::from_str("C4 E4 G4").unwrap();
        chord.modify_specific_note(1, |n| n.transposed(-1)).unwrap();
        assert_eq!(keys(&chord), vec![60, 63, 67]);
    }

    #[test]
    fn modify_specific_note2() {
        let mut chord = Chord::from_str("C4 E4 G4").unwrap();
        assert_eq!(
            chord.modify_specific_note(3, |n| n.transposed(1)).unwrap_err(),
            ChordError::IndexOutOfBounds { index: 3, len: 3 }
        );
        assert_eq!(keys(&chord), vec![60, 64, 67]);
    }

    #[test]
    fn invert_chord1() {
        let mut chord = Chord::from_str("C4 E4 G4").unwrap();
        chord.invert_chord(1).unwrap();
        assert_eq!(keys(&chord), vec![72, 64, 67]);
        assert_eq!(chord.to_string(), "Chord: [E4, G4, C5]");
    }

    #[test]
    fn invert_chord2() {
        let mut none = Chord::from_str("C4 E4 G4").unwrap();
        none.invert_chord(0).unwrap();
        assert_eq!(keys(&none), vec![60, 64, 67]);

        let mut all = Chord::from_str("C4 E4 G4").unwrap();
        all.invert_chord(3).unwrap().add_minor3();
        assert_eq!(keys(&all), vec![72, 76, 79, 82]);
    }

    #[test]
    fn invert_chord3() {
        let mut chord = Chord::from_str("C4 E4 G4").unwrap();
        assert_eq!(
            chord.invert_chord(4).unwrap_err(),
            ChordError::InvalidInversion { root_note_index: 4, len: 3 }
        );
        assert_eq!(keys(&chord), vec![60, 64, 67]);
    }

    #[test]
    fn stack_chords1() {
        let mut bottom = Chord::from_str("C4 E4 G4").unwrap();
        let top = Chord::from_str("D5 B4").unwrap();
        let bottom_ptr: *const Chord = &bottom;
        let stacked = Chord::stack_chords(&mut bottom, &top);
        assert!(std::ptr::eq(&*stacked, bottom_ptr));
        assert_eq!(keys(stacked), vec![60, 64, 67, 74, 71]);
        assert_eq!(keys(&top), vec![74, 71]);
    }

    #[test]
    fn stack_chords2() {
        let mut bottom = Chord::new(note("C4"));
        let mut top = Chord::new(note("G4"));
        Chord::stack_chords(&mut bottom, &top);
        top.transpose(1);
        assert_eq!(keys(&bottom), vec![60, 67]);
    }

    #[test]
    fn formatting1() {
        let chord = Chord::from_notes(vec![Note::new(4).unwrap(), Note::new(0).unwrap(), Note::new(7).unwrap()]).unwrap();
        assert_eq!(chord.to_string(), "Chord: [C-1, E-1, G-1]");
        assert_eq!(keys(&chord), vec![4, 0, 7]);
    }

    #[test]
    fn sort_by_pitch1() {
        let mut chord = Chord::from_str("G4 C4 E4").unwrap();
        chord.sort_by_pitch().add_major2();
        assert_eq!(keys(&chord), vec![60, 64, 67, 69]);
    }

    #[test]
    fn transpose1() {
        let mut chord = Chord::from_str("C4 E4 G4").unwrap();
        chord.transpose(-3);
        assert_eq!(chord.to_string(), "Chord: [A3, C#4, E4]");
        chord.octave_shift(2);
        assert_eq!(chord.to_string(), "Chord: [A5, C#6, E6]");
    }

    #[test]
    fn notes_mut1() {
        let mut chord = Chord::from_str("C4 E4 G4").unwrap();
        chord.notes_mut()[2] = note("Bb4");
        chord.add_minor3();
        assert_eq!(chord.top(), note("C#5"));
        chord.notes_mut()[0].transpose(-12);
        chord.invert_chord(1).unwrap();
        assert_eq!(chord.root(), note("C4"));
    }

    #[test]
    fn errors_display1() {
        assert_eq!(
            ChordError::InvalidInversion { root_note_index: 5, len: 3 }.to_string(),
            "cannot invert 5 notes, the number of inversions this chord has is 3"
        );
        assert_eq!(ChordError::Empty.to_string(), "a chord needs at least one note");
    }
}
