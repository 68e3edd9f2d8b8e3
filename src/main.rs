use std::str::FromStr;

use itertools::Itertools;
use log::info;

use jscorers::jscore::chord::{Chord, ChordError};
use jscorers::jscore::interval::Interval;
use jscorers::jscore::note::Note;
use jscorers::jscore::transform::Transpose;

fn main() -> Result<(), ChordError> {
    env_logger::init();

    let mut c_major = Chord::new(Note::from_str("C4")?);
    c_major.append_major_chord();
    println!("{}", c_major);

    c_major.invert_chord(1)?;
    let steps = c_major
        .intervals()
        .into_iter()
        .map(|s| Interval::from_semitones(s).map_or_else(|| s.to_string(), |i| i.to_string()))
        .join(" ");
    info!("first inversion steps: {}", steps);
    println!("{}", c_major);

    let mut a_minor = Chord::from_str("A3")?;
    a_minor.append_minor_chord().transpose(12);
    println!("{}", Chord::stack_chords(&mut c_major, &a_minor));

    Ok(())
}
