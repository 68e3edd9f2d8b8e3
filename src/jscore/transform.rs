use crate::jscore::note::SEMITONES_PER_OCTAVE;

/// Anything whose pitch can be moved: a single note, or a whole chord.
pub trait Transpose {
    /// Move by `semitones`, in place. Negative values move down.
    fn transpose(&mut self, semitones: i16);

    /// Move by whole octaves, in place.
    fn octave_shift(&mut self, octaves: i8) {
        self.transpose(i16::from(octaves) * SEMITONES_PER_OCTAVE)
    }
}
